//! Domain entities - Scenarios, scheduled failures and call records

mod failure_scenario;
mod tool_call_event;
mod tool_failure;

pub use failure_scenario::{FailureScenario, FailureScenarioBuilder, ScenarioDefinition};
pub use tool_call_event::ToolCallEvent;
pub use tool_failure::ToolFailure;

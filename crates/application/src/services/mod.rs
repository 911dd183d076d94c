//! Application services - Observation and aggregation of tool calls

mod monkey_observer;
mod tool_metrics;

pub use monkey_observer::MonkeyObserver;
pub use tool_metrics::{ToolBreakdown, ToolMetrics};

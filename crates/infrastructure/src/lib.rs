//! Infrastructure layer - Failure injection machinery
//!
//! Implements the injection engine and the call-lifecycle wrapper on top of
//! the domain scenarios, plus the retry helper, configuration loading and
//! logging setup used by test harnesses and the CLI.

pub mod chaos;
pub mod config;
pub mod retry;
pub mod telemetry;

pub use chaos::{
    CANCELLED_MESSAGE, ChaosStats, ChaosTool, InjectionEngine, ScheduledCall, ToolCallError,
    with_monkey,
};
pub use config::{AppConfig, ConfigLoadError};
pub use retry::{
    RetryConfig, RetryResult, Retryable, retry_tool_call, retry_tool_call_async, with_retry,
    with_retry_blocking,
};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_logging};

//! Record of one completed invocation attempt

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::CallId;

/// One completed tool invocation attempt
///
/// Produced exactly once per attempt, whether it succeeded, failed for real,
/// or was failed by the injection engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallEvent {
    pub tool_name: String,
    pub call_id: CallId,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub latency_ms: f64,
    pub retry_attempt: u32,
}

impl ToolCallEvent {
    /// Whether this attempt followed at least one failed attempt
    pub const fn is_retry(&self) -> bool {
        self.retry_attempt > 0
    }
}

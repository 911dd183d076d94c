//! Port for observing tool call lifecycles
//!
//! The call wrapper reports every invocation attempt through this port; the
//! default implementation is [`crate::MonkeyObserver`].

use domain::CallId;

/// Receives start/end notifications for tool invocation attempts
pub trait ToolCallObserver: Send + Sync {
    /// Record the start of the attempt identified by `call_id`
    ///
    /// Starting the same unconsumed id twice keeps the later timestamp.
    fn start_call(&self, call_id: &CallId);

    /// Record the outcome of the attempt identified by `call_id`
    ///
    /// Consumes the start entry for `call_id`; a missing start counts as zero latency.
    fn end_call(
        &self,
        tool_name: &str,
        call_id: &CallId,
        success: bool,
        error: Option<String>,
        retry_attempt: u32,
    );
}

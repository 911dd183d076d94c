//! In-memory observer for chaos runs
//!
//! Keeps an append-only log of [`ToolCallEvent`]s and aggregates it on demand.
//! Each test or run owns its own observer and shares it with wrappers via `Arc`.

use std::{collections::HashMap, time::Instant};

use chrono::Utc;
use domain::{CallId, ToolCallEvent};
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::ToolMetrics;
use crate::ports::ToolCallObserver;

#[derive(Debug, Default)]
struct ObserverState {
    events: Vec<ToolCallEvent>,
    start_times: HashMap<CallId, Instant>,
}

/// Tracks tool execution metrics during chaos tests
#[derive(Debug, Default)]
pub struct MonkeyObserver {
    state: Mutex<ObserverState>,
}

impl MonkeyObserver {
    /// Create an observer with an empty event log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start time of `call_id`
    pub fn start_call(&self, call_id: &CallId) {
        trace!(call_id = %call_id, "Tool call started");
        self.state
            .lock()
            .start_times
            .insert(call_id.clone(), Instant::now());
    }

    /// Append an event for `call_id` and drop its start entry
    pub fn end_call(
        &self,
        tool_name: &str,
        call_id: &CallId,
        success: bool,
        error: Option<String>,
        retry_attempt: u32,
    ) {
        let mut state = self.state.lock();
        let latency_ms = state
            .start_times
            .remove(call_id)
            .map_or(0.0, |started| started.elapsed().as_secs_f64() * 1000.0);

        debug!(
            tool = tool_name,
            call_id = %call_id,
            success,
            latency_ms,
            retry_attempt,
            "Tool call finished"
        );

        state.events.push(ToolCallEvent {
            tool_name: tool_name.to_string(),
            call_id: call_id.clone(),
            timestamp: Utc::now(),
            success,
            error_message: error,
            latency_ms,
            retry_attempt,
        });
    }

    /// Snapshot of the event log in recording order
    pub fn events(&self) -> Vec<ToolCallEvent> {
        self.state.lock().events.clone()
    }

    /// Number of recorded events
    pub fn event_count(&self) -> usize {
        self.state.lock().events.len()
    }

    /// Calls started but not yet ended
    pub fn in_flight(&self) -> usize {
        self.state.lock().start_times.len()
    }

    /// Aggregate metrics, `None` when no call has completed
    pub fn metrics(&self) -> Option<ToolMetrics> {
        ToolMetrics::from_events(&self.state.lock().events)
    }

    /// Metrics as a JSON object; `{}` when no call has completed
    pub fn metrics_json(&self) -> serde_json::Value {
        self.metrics()
            .and_then(|metrics| serde_json::to_value(metrics).ok())
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()))
    }

    /// Human-readable summary of the metrics
    pub fn summary(&self) -> String {
        ToolMetrics::render_summary(self.metrics().as_ref())
    }
}

impl ToolCallObserver for MonkeyObserver {
    fn start_call(&self, call_id: &CallId) {
        Self::start_call(self, call_id);
    }

    fn end_call(
        &self,
        tool_name: &str,
        call_id: &CallId,
        success: bool,
        error: Option<String>,
        retry_attempt: u32,
    ) {
        Self::end_call(self, tool_name, call_id, success, error, retry_attempt);
    }
}

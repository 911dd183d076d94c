//! Aggregated metrics over recorded tool call events

use std::{collections::BTreeMap, fmt::Write as _};

use domain::ToolCallEvent;
use serde::{Deserialize, Serialize};

/// Per-tool subset of the aggregate metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolBreakdown {
    /// Events recorded for the tool
    pub call_count: u64,
    /// Events with `success == false`
    pub failures: u64,
    /// Events with `retry_attempt > 0`
    pub retries: u64,
}

/// Summary metrics over a non-empty event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMetrics {
    pub total_calls: u64,
    pub successes: u64,
    pub failures: u64,
    /// `successes / total_calls`
    pub success_rate: f64,
    /// Mean latency over all events
    pub avg_latency_ms: f64,
    /// Sum of `retry_attempt` over all events (attempt numbers, not retry events)
    pub total_retries: u64,
    pub breakdown: BTreeMap<String, ToolBreakdown>,
}

impl ToolMetrics {
    /// Aggregate `events`; `None` when there is nothing to aggregate
    #[allow(clippy::cast_precision_loss)]
    pub fn from_events(events: &[ToolCallEvent]) -> Option<Self> {
        if events.is_empty() {
            return None;
        }

        let mut successes = 0u64;
        let mut total_latency_ms = 0.0;
        let mut total_retries = 0u64;
        let mut breakdown: BTreeMap<String, ToolBreakdown> = BTreeMap::new();

        for event in events {
            total_latency_ms += event.latency_ms;
            total_retries += u64::from(event.retry_attempt);

            let entry = breakdown.entry(event.tool_name.clone()).or_default();
            entry.call_count += 1;
            if event.success {
                successes += 1;
            } else {
                entry.failures += 1;
            }
            if event.is_retry() {
                entry.retries += 1;
            }
        }

        let total_calls = events.len() as u64;
        Some(Self {
            total_calls,
            successes,
            failures: total_calls - successes,
            success_rate: successes as f64 / total_calls as f64,
            avg_latency_ms: total_latency_ms / total_calls as f64,
            total_retries,
            breakdown,
        })
    }

    /// Human-readable rendering; zero-valued when `metrics` is `None`
    pub fn render_summary(metrics: Option<&Self>) -> String {
        let (total_calls, success_rate, failures, total_retries, avg_latency_ms) = metrics
            .map_or((0, 0.0, 0, 0, 0.0), |m| {
                (
                    m.total_calls,
                    m.success_rate,
                    m.failures,
                    m.total_retries,
                    m.avg_latency_ms,
                )
            });

        let mut out = String::new();
        out.push_str("Tool Monkey Execution Summary\n");
        out.push_str("==============================\n");
        let _ = writeln!(out, "Total Calls: {total_calls}");
        let _ = writeln!(out, "Success Rate: {:.1}%", success_rate * 100.0);
        let _ = writeln!(out, "Failures: {failures}");
        let _ = writeln!(out, "Total Retries: {total_retries}");
        let _ = write!(out, "Avg Latency: {avg_latency_ms:.1}ms");
        out
    }
}

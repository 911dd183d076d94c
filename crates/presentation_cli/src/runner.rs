//! Runs a failure scenario against a mock lookup tool

use std::fmt;
use std::sync::Arc;

use application::MonkeyObserver;
use domain::FailureScenario;
use infrastructure::{ChaosStats, RetryConfig, ToolCallError, retry_tool_call_async, with_monkey};
use serde::Serialize;
use tracing::info;

/// How a demo run invokes the tool
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Logical calls to make
    pub calls: u32,
    /// Name the tool is reported under
    pub tool_name: String,
    /// Retry each logical call with this config, if set
    pub retry: Option<RetryConfig>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            calls: 5,
            tool_name: "lookup".to_string(),
            retry: None,
        }
    }
}

/// Result of one logical call
#[derive(Debug, Clone, Serialize)]
pub struct CallOutcome {
    /// 1-based logical call number
    pub call: u32,
    /// Invocation attempts spent on this call
    pub attempts: u32,
    pub success: bool,
    /// Tool output on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Kind of the injected failure, `None` for genuine errors and successes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injected: Option<String>,
}

impl CallOutcome {
    fn new(call: u32, attempts: u32, result: Result<String, ToolCallError<String>>) -> Self {
        match result {
            Ok(output) => Self {
                call,
                attempts,
                success: true,
                output: Some(output),
                error: None,
                injected: None,
            },
            Err(err) => Self {
                call,
                attempts,
                success: false,
                output: None,
                error: Some(err.to_string()),
                injected: err.injected().map(|e| e.kind().to_string()),
            },
        }
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call {}", self.call)?;
        if self.attempts > 1 {
            write!(f, " ({} attempts)", self.attempts)?;
        }
        match (&self.output, &self.error, &self.injected) {
            (Some(output), _, _) => write!(f, ": ok, {output}"),
            (_, Some(error), Some(kind)) => write!(f, ": injected {kind}, {error}"),
            (_, Some(error), None) => write!(f, ": failed, {error}"),
            _ => write!(f, ": no result"),
        }
    }
}

/// Everything a run produced
#[derive(Debug)]
pub struct RunReport {
    pub scenario: String,
    pub outcomes: Vec<CallOutcome>,
    pub stats: ChaosStats,
    pub observer: Arc<MonkeyObserver>,
}

impl RunReport {
    /// JSON document with outcomes, observer metrics and injection stats
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "scenario": self.scenario,
            "outcomes": self.outcomes,
            "metrics": self.observer.metrics_json(),
            "chaos": self.stats,
        })
    }
}

/// Stand-in for a real record lookup service
pub async fn lookup_record(id: u32) -> Result<String, String> {
    if id == 0 {
        return Err("record 0 does not exist".to_string());
    }
    Ok(format!("record #{id} (status: active)"))
}

/// Wrap the mock tool with `scenario` and make `options.calls` logical calls
pub async fn run_scenario(scenario: FailureScenario, options: &RunOptions) -> RunReport {
    let name = scenario.name().to_string();
    let observer = Arc::new(MonkeyObserver::new());
    let tool = with_monkey(
        options.tool_name.clone(),
        scenario,
        Some(observer.clone()),
        lookup_record,
    );

    info!(scenario = %name, calls = options.calls, "Starting chaos run");

    let mut outcomes = Vec::new();
    for call in 1..=options.calls {
        let outcome = match &options.retry {
            Some(config) => {
                let retried = retry_tool_call_async(config, &tool, call).await;
                CallOutcome::new(call, retried.attempts, retried.result)
            },
            None => CallOutcome::new(call, 1, tool.call_async(call).await),
        };
        outcomes.push(outcome);
    }

    RunReport {
        scenario: name,
        outcomes,
        stats: tool.stats(),
        observer,
    }
}

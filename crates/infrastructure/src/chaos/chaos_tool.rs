//! Call-lifecycle wrapper around a tool.
//!
//! [`ChaosTool`] gives each invocation attempt an identity, reports its start
//! and outcome to an optional observer, and consults its own
//! [`InjectionEngine`] before running the tool. Injected and genuine failures
//! are recorded the same way and both reach the caller; the wrapper never
//! retries on its own. An attempt dropped before it finishes is recorded as a
//! failure with [`CANCELLED_MESSAGE`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use application::ToolCallObserver;
use domain::{CallId, FailureScenario, InjectedError};
use thiserror::Error;
use tracing::{debug, warn};

use super::{ChaosStats, InjectionEngine};

/// Error message recorded for attempts dropped before they finished
pub const CANCELLED_MESSAGE: &str = "cancelled";

/// Error returned by a wrapped tool call
#[derive(Debug, Error)]
pub enum ToolCallError<E> {
    /// Failure manufactured by the injection engine
    #[error(transparent)]
    Injected(InjectedError),

    /// Failure raised by the tool itself
    #[error("{0}")]
    Tool(E),
}

impl<E> ToolCallError<E> {
    pub const fn is_injected(&self) -> bool {
        matches!(self, Self::Injected(_))
    }

    pub const fn injected(&self) -> Option<&InjectedError> {
        match self {
            Self::Injected(err) => Some(err),
            Self::Tool(_) => None,
        }
    }

    pub const fn tool_error(&self) -> Option<&E> {
        match self {
            Self::Tool(err) => Some(err),
            Self::Injected(_) => None,
        }
    }

    pub fn into_tool_error(self) -> Option<E> {
        match self {
            Self::Tool(err) => Some(err),
            Self::Injected(_) => None,
        }
    }
}

/// A tool wrapped with scheduled failure injection
pub struct ChaosTool<F> {
    name: String,
    engine: InjectionEngine,
    observer: Option<Arc<dyn ToolCallObserver>>,
    retry_attempt: AtomicU32,
    tool: F,
}

impl<F> fmt::Debug for ChaosTool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaosTool")
            .field("name", &self.name)
            .field("engine", &self.engine)
            .field("has_observer", &self.observer.is_some())
            .field("retry_attempt", &self.retry_attempt)
            .finish_non_exhaustive()
    }
}

/// Wrap `tool` with `scenario`, reporting to `observer` when given
pub fn with_monkey<F>(
    name: impl Into<String>,
    scenario: FailureScenario,
    observer: Option<Arc<dyn ToolCallObserver>>,
    tool: F,
) -> ChaosTool<F> {
    let wrapped = ChaosTool::new(name, scenario, tool);
    match observer {
        Some(observer) => wrapped.with_observer(observer),
        None => wrapped,
    }
}

impl<F> ChaosTool<F> {
    /// Wrap `tool` with its own engine for `scenario`
    pub fn new(name: impl Into<String>, scenario: FailureScenario, tool: F) -> Self {
        Self {
            name: name.into(),
            engine: InjectionEngine::new(scenario),
            observer: None,
            retry_attempt: AtomicU32::new(0),
            tool,
        }
    }

    /// Report call lifecycles to `observer`
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ToolCallObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn engine(&self) -> &InjectionEngine {
        &self.engine
    }

    pub fn stats(&self) -> ChaosStats {
        self.engine.stats()
    }

    /// Attempt number the next inferred call will report
    pub fn retry_attempt(&self) -> u32 {
        self.retry_attempt.load(Ordering::SeqCst)
    }

    /// Invoke the tool, inferring the retry attempt from prior outcomes
    pub fn call<A, T, E>(&self, args: A) -> Result<T, ToolCallError<E>>
    where
        F: Fn(A) -> Result<T, E>,
        E: fmt::Display,
    {
        self.call_with_attempt(args, self.retry_attempt())
    }

    /// Invoke the tool, reporting the caller-supplied retry attempt
    pub fn call_with_attempt<A, T, E>(&self, args: A, attempt: u32) -> Result<T, ToolCallError<E>>
    where
        F: Fn(A) -> Result<T, E>,
        E: fmt::Display,
    {
        let pending = self.begin(attempt);
        let outcome = match self.engine.should_fail() {
            Some(injected) => Err(ToolCallError::Injected(injected)),
            None => (self.tool)(args).map_err(ToolCallError::Tool),
        };
        pending.settle(&outcome);
        outcome
    }

    /// Async form of [`Self::call`]
    pub async fn call_async<A, T, E, Fut>(&self, args: A) -> Result<T, ToolCallError<E>>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        self.call_with_attempt_async(args, self.retry_attempt())
            .await
    }

    /// Async form of [`Self::call_with_attempt`]
    pub async fn call_with_attempt_async<A, T, E, Fut>(
        &self,
        args: A,
        attempt: u32,
    ) -> Result<T, ToolCallError<E>>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let pending = self.begin(attempt);
        let outcome = match self.engine.should_fail_async().await {
            Some(injected) => Err(ToolCallError::Injected(injected)),
            None => (self.tool)(args).await.map_err(ToolCallError::Tool),
        };
        pending.settle(&outcome);
        outcome
    }

    fn begin(&self, attempt: u32) -> PendingAttempt<'_, F> {
        let call_id = CallId::generate(&self.name);
        if let Some(observer) = &self.observer {
            observer.start_call(&call_id);
        }
        PendingAttempt {
            tool: self,
            call_id,
            attempt,
            settled: false,
        }
    }

    /// Record an attempt that never produced an outcome
    fn abandon(&self, call_id: &CallId, attempt: u32) {
        self.retry_attempt
            .store(attempt.saturating_add(1), Ordering::SeqCst);
        warn!(tool = %self.name, call_id = %call_id, attempt, "Tool call dropped before completion");
        if let Some(observer) = &self.observer {
            observer.end_call(
                &self.name,
                call_id,
                false,
                Some(CANCELLED_MESSAGE.to_string()),
                attempt,
            );
        }
    }

    fn finish<T, E: fmt::Display>(
        &self,
        call_id: &CallId,
        outcome: &Result<T, ToolCallError<E>>,
        attempt: u32,
    ) {
        let error = match outcome {
            Ok(_) => {
                self.retry_attempt.store(0, Ordering::SeqCst);
                None
            },
            Err(err) => {
                self.retry_attempt
                    .store(attempt.saturating_add(1), Ordering::SeqCst);
                if let ToolCallError::Tool(_) = err {
                    debug!(tool = %self.name, call_id = %call_id, error = %err, "Tool call failed");
                }
                Some(err.to_string())
            },
        };

        if let Some(observer) = &self.observer {
            observer.end_call(&self.name, call_id, error.is_none(), error, attempt);
        }
    }
}

/// Attempt between its start and its recorded outcome
///
/// Dropping it unsettled, as happens when an async call is cancelled or a
/// sync tool panics, records the attempt as a failure.
struct PendingAttempt<'a, F> {
    tool: &'a ChaosTool<F>,
    call_id: CallId,
    attempt: u32,
    settled: bool,
}

impl<F> PendingAttempt<'_, F> {
    fn settle<T, E: fmt::Display>(mut self, outcome: &Result<T, ToolCallError<E>>) {
        self.settled = true;
        self.tool.finish(&self.call_id, outcome, self.attempt);
    }
}

impl<F> Drop for PendingAttempt<'_, F> {
    fn drop(&mut self) {
        if !self.settled {
            self.tool.abandon(&self.call_id, self.attempt);
        }
    }
}

//! Retry logic with exponential backoff for wrapped tools
//!
//! Plays the part of the calling agent that re-invokes a tool after a
//! transient failure. Only retryable errors are retried, a rate limit's
//! `retry_after` hint replaces the computed backoff, and every re-invocation
//! of a [`ChaosTool`] reports its attempt number to the observer.
//!
//! # Example
//!
//! ```rust,ignore
//! use infrastructure::retry::{RetryConfig, retry_tool_call};
//!
//! let config = RetryConfig::fast();
//! let outcome = retry_tool_call(&config, &tool, "query");
//! println!("{} attempts", outcome.attempts);
//! ```

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use domain::InjectedError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chaos::{ChaosTool, ToolCallError};

/// Configuration for retry behavior with exponential backoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Initial delay before first retry in milliseconds (default: 100ms)
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds (default: 10000ms = 10s)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Maximum number of retry attempts (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Whether to add jitter to prevent thundering herd (default: true)
    #[serde(default = "default_true")]
    pub jitter_enabled: bool,

    /// Maximum jitter factor (0.0 to 1.0, default: 0.1 = 10%)
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,

    /// Wait for a rate limit's `retry_after` hint, capped at `max_delay_ms` (default: true)
    #[serde(default = "default_true")]
    pub honor_retry_after: bool,
}

const fn default_initial_delay() -> u64 {
    100
}

const fn default_max_delay() -> u64 {
    10_000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_true() -> bool {
    true
}

const fn default_jitter_factor() -> f64 {
    0.1
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            max_retries: default_max_retries(),
            jitter_enabled: default_true(),
            jitter_factor: default_jitter_factor(),
            honor_retry_after: default_true(),
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom parameters
    #[must_use]
    pub const fn new(
        initial_delay_ms: u64,
        max_delay_ms: u64,
        multiplier: f64,
        max_retries: u32,
    ) -> Self {
        Self {
            initial_delay_ms,
            max_delay_ms,
            multiplier,
            max_retries,
            jitter_enabled: true,
            jitter_factor: 0.1,
            honor_retry_after: true,
        }
    }

    /// Short delays, for demos and tests
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            initial_delay_ms: 50,
            max_delay_ms: 1000,
            multiplier: 2.0,
            max_retries: 3,
            jitter_enabled: true,
            jitter_factor: 0.1,
            honor_retry_after: true,
        }
    }

    /// Disable jitter
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter_enabled = false;
        self
    }

    /// Set the number of retries after the first attempt
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Calculate the delay for a given attempt number (0-indexed)
    ///
    /// Uses exponential backoff: delay = initial_delay * multiplier^attempt
    /// Capped at max_delay, with optional jitter.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_delay = (self.initial_delay_ms as f64) * self.multiplier.powi(attempt as i32);
        let capped_delay = base_delay.min(self.max_delay_ms as f64);

        let final_delay = if self.jitter_enabled && self.jitter_factor > 0.0 {
            let jitter_range = capped_delay * self.jitter_factor;
            let jitter = rand::rng().random_range(-jitter_range..=jitter_range);
            (capped_delay + jitter).max(0.0)
        } else {
            capped_delay
        };

        Duration::from_millis(final_delay as u64)
    }

    /// Delay before retrying after `err`, preferring its own hint
    pub fn delay_after<E: Retryable>(&self, attempt: u32, err: &E) -> Duration {
        match err.retry_after() {
            Some(hint) if self.honor_retry_after => {
                hint.min(Duration::from_millis(self.max_delay_ms))
            },
            _ => self.delay_for_attempt(attempt),
        }
    }
}

/// Trait for errors that can be checked for retryability
pub trait Retryable {
    /// Returns true if this error is retryable
    fn is_retryable(&self) -> bool;

    /// Server-supplied back-off hint, if any
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl Retryable for InjectedError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }

    fn retry_after(&self) -> Option<Duration> {
        Self::retry_after(self)
    }
}

/// Genuine tool errors are never retried
impl<E> Retryable for ToolCallError<E> {
    fn is_retryable(&self) -> bool {
        self.injected().is_some_and(InjectedError::is_retryable)
    }

    fn retry_after(&self) -> Option<Duration> {
        self.injected().and_then(InjectedError::retry_after)
    }
}

/// Retry result containing either success or the last error
#[derive(Debug)]
pub struct RetryResult<T, E> {
    /// The result of the operation
    pub result: Result<T, E>,
    /// Number of attempts made (1 = no retries, 2 = one retry, etc.)
    pub attempts: u32,
    /// Total time spent including retries
    pub total_duration: Duration,
}

impl<T, E> RetryResult<T, E> {
    /// Check if the operation succeeded
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Check if the operation failed
    #[must_use]
    pub const fn is_err(&self) -> bool {
        self.result.is_err()
    }

    /// Convert to standard Result, discarding metadata
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

enum Step<E> {
    Stop(E),
    Wait(Duration),
}

#[allow(clippy::cast_possible_truncation)]
fn next_step<E: Retryable + fmt::Display>(
    config: &RetryConfig,
    attempts: u32,
    err: E,
) -> Step<E> {
    let retry_attempt = attempts - 1;

    if !err.is_retryable() {
        debug!(attempts, error = %err, "Operation failed with non-retryable error");
        return Step::Stop(err);
    }

    if retry_attempt >= config.max_retries {
        warn!(
            attempts,
            max_retries = config.max_retries,
            error = %err,
            "Operation failed after max retries"
        );
        return Step::Stop(err);
    }

    let delay = config.delay_after(retry_attempt, &err);
    warn!(
        attempt = attempts,
        max_retries = config.max_retries,
        delay_ms = delay.as_millis() as u64,
        error = %err,
        "Operation failed, retrying"
    );
    Step::Wait(delay)
}

/// Execute an async operation with retry logic
///
/// The operation receives the 0-based attempt number.
#[allow(clippy::cast_possible_truncation)]
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> RetryResult<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + fmt::Display,
{
    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        let result = operation(attempts).await;
        attempts += 1;

        match result {
            Ok(value) => {
                if attempts > 1 {
                    debug!(
                        attempts,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Operation succeeded after retries"
                    );
                }
                return RetryResult {
                    result: Ok(value),
                    attempts,
                    total_duration: start.elapsed(),
                };
            },
            Err(err) => match next_step(config, attempts, err) {
                Step::Stop(err) => {
                    return RetryResult {
                        result: Err(err),
                        attempts,
                        total_duration: start.elapsed(),
                    };
                },
                Step::Wait(delay) => tokio::time::sleep(delay).await,
            },
        }
    }
}

/// Blocking form of [`with_retry`]
#[allow(clippy::cast_possible_truncation)]
pub fn with_retry_blocking<F, T, E>(config: &RetryConfig, mut operation: F) -> RetryResult<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
    E: Retryable + fmt::Display,
{
    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        let result = operation(attempts);
        attempts += 1;

        match result {
            Ok(value) => {
                if attempts > 1 {
                    debug!(
                        attempts,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Operation succeeded after retries"
                    );
                }
                return RetryResult {
                    result: Ok(value),
                    attempts,
                    total_duration: start.elapsed(),
                };
            },
            Err(err) => match next_step(config, attempts, err) {
                Step::Stop(err) => {
                    return RetryResult {
                        result: Err(err),
                        attempts,
                        total_duration: start.elapsed(),
                    };
                },
                Step::Wait(delay) => std::thread::sleep(delay),
            },
        }
    }
}

/// Call `tool` until it succeeds, fails for good, or retries run out
///
/// Each attempt is reported with its attempt number, so the observer's
/// retry counts reflect this loop.
pub fn retry_tool_call<F, A, T, E>(
    config: &RetryConfig,
    tool: &ChaosTool<F>,
    args: A,
) -> RetryResult<T, ToolCallError<E>>
where
    F: Fn(A) -> Result<T, E>,
    A: Clone,
    E: fmt::Display,
{
    with_retry_blocking(config, |attempt| {
        tool.call_with_attempt(args.clone(), attempt)
    })
}

/// Async form of [`retry_tool_call`]
pub async fn retry_tool_call_async<F, Fut, A, T, E>(
    config: &RetryConfig,
    tool: &ChaosTool<F>,
    args: A,
) -> RetryResult<T, ToolCallError<E>>
where
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    A: Clone,
    E: fmt::Display,
{
    with_retry(config, |attempt| {
        tool.call_with_attempt_async(args.clone(), attempt)
    })
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use application::MonkeyObserver;
    use domain::{AuthFailureType, FailureConfig, FailureScenario, LimitType};

    use super::*;
    use crate::chaos::with_monkey;

    type LookupError = ToolCallError<String>;

    fn injected_timeout() -> LookupError {
        ToolCallError::Injected(InjectedError::from_config(&FailureConfig::timeout(0.0)))
    }

    fn instant() -> RetryConfig {
        RetryConfig::new(0, 0, 2.0, 3).without_jitter()
    }

    fn echo(x: u32) -> Result<u32, String> {
        Ok(x)
    }

    #[test]
    fn config_default_values() {
        let config = RetryConfig::default();
        assert_eq!(config.initial_delay_ms, 100);
        assert_eq!(config.max_delay_ms, 10_000);
        assert!((config.multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.max_retries, 3);
        assert!(config.jitter_enabled);
        assert!(config.honor_retry_after);
    }

    #[test]
    fn config_deserialization() {
        let json = r#"{"initial_delay_ms":200,"max_retries":5}"#;
        let config: RetryConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.initial_delay_ms, 200);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.max_delay_ms, 10_000);
    }

    #[test]
    fn delay_calculation_without_jitter() {
        let config = RetryConfig::default().without_jitter();

        assert_eq!(config.delay_for_attempt(0).as_millis(), 100);
        assert_eq!(config.delay_for_attempt(1).as_millis(), 200);
        assert_eq!(config.delay_for_attempt(2).as_millis(), 400);
        assert_eq!(config.delay_for_attempt(3).as_millis(), 800);
    }

    #[test]
    fn delay_capped_at_max() {
        let config = RetryConfig::new(1000, 2000, 2.0, 5).without_jitter();

        assert_eq!(config.delay_for_attempt(0).as_millis(), 1000);
        assert_eq!(config.delay_for_attempt(1).as_millis(), 2000);
        assert_eq!(config.delay_for_attempt(10).as_millis(), 2000);
    }

    #[test]
    fn delay_with_jitter_in_range() {
        let config = RetryConfig {
            initial_delay_ms: 1000,
            max_delay_ms: 1000,
            multiplier: 1.0,
            ..RetryConfig::default()
        };

        for _ in 0..20 {
            let delay_ms = config.delay_for_attempt(0).as_millis();
            assert!(
                (900..=1100).contains(&delay_ms),
                "delay_ms={delay_ms} out of range"
            );
        }
    }

    #[test]
    fn rate_limit_hint_replaces_backoff() {
        let config = RetryConfig::new(100, 10_000, 2.0, 3).without_jitter();
        let err = InjectedError::from_config(&FailureConfig::rate_limit(2.5, LimitType::Burst, 0));
        assert_eq!(config.delay_after(0, &err), Duration::from_millis(2500));

        let timeout = InjectedError::from_config(&FailureConfig::timeout(1.0));
        assert_eq!(config.delay_after(1, &timeout), Duration::from_millis(200));
    }

    #[test]
    fn rate_limit_hint_is_capped() {
        let config = RetryConfig::new(100, 1000, 2.0, 3).without_jitter();
        let err = InjectedError::from_config(&FailureConfig::rate_limit(60.0, LimitType::PerMinute, 0));
        assert_eq!(config.delay_after(0, &err), Duration::from_secs(1));
    }

    #[test]
    fn rate_limit_hint_can_be_ignored() {
        let config = RetryConfig {
            honor_retry_after: false,
            ..RetryConfig::new(100, 10_000, 2.0, 3).without_jitter()
        };
        let err = InjectedError::from_config(&FailureConfig::rate_limit(5.0, LimitType::Burst, 0));
        assert_eq!(config.delay_after(0, &err), Duration::from_millis(100));
    }

    #[test]
    fn tool_errors_are_not_retryable() {
        let genuine: ToolCallError<String> = ToolCallError::Tool("boom".to_string());
        assert!(!genuine.is_retryable());

        let auth: ToolCallError<String> = ToolCallError::Injected(InjectedError::from_config(
            &FailureConfig::auth_failure(AuthFailureType::Unauthorized, "expired"),
        ));
        assert!(!auth.is_retryable());

        let timeout: ToolCallError<String> =
            ToolCallError::Injected(InjectedError::from_config(&FailureConfig::timeout(0.0)));
        assert!(timeout.is_retryable());
    }

    #[test]
    fn blocking_retry_gives_up_on_genuine_errors() {
        let calls = AtomicU32::new(0);
        let result = with_retry_blocking(&instant(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<i32, LookupError>(ToolCallError::Tool("record not found".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(result.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn blocking_retry_stops_after_max_retries() {
        let result = with_retry_blocking(&instant().with_max_retries(2), |_| {
            Err::<i32, _>(injected_timeout())
        });

        assert!(result.is_err());
        // 1 initial + 2 retries
        assert_eq!(result.attempts, 3);
    }

    #[tokio::test]
    async fn async_retry_passes_attempt_numbers() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let result = with_retry(&instant(), |attempt| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().push(attempt);
                if attempt < 2 { Err(injected_timeout()) } else { Ok(42) }
            }
        })
        .await;

        assert_eq!(result.into_result().unwrap(), 42);
        assert_eq!(*seen.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn retries_through_injected_timeouts() {
        let scenario = FailureScenario::builder("flaky")
            .then(FailureConfig::timeout(0.0))
            .then(FailureConfig::timeout(0.0))
            .build()
            .unwrap();
        let observer = Arc::new(MonkeyObserver::new());
        let tool = with_monkey("echo", scenario, Some(observer.clone()), echo);

        let outcome = retry_tool_call(&instant(), &tool, 7);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.into_result().unwrap(), 7);

        let attempts: Vec<u32> = observer.events().iter().map(|e| e.retry_attempt).collect();
        assert_eq!(attempts, vec![0, 1, 2]);
        let metrics = observer.metrics().unwrap();
        assert_eq!(metrics.total_retries, 3);
        assert_eq!(metrics.breakdown["echo"].retries, 2);
    }

    #[test]
    fn does_not_retry_auth_failures() {
        let scenario = FailureScenario::builder("denied")
            .then(FailureConfig::auth_failure(AuthFailureType::Forbidden, "no"))
            .build()
            .unwrap();
        let tool = with_monkey("echo", scenario, None, echo);

        let outcome = retry_tool_call(&instant(), &tool, 1);
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.into_result().unwrap_err().is_injected());
    }

    #[test]
    fn retry_exhaustion_surfaces_last_error() {
        let scenario = FailureScenario::builder("exhaust")
            .then(FailureConfig::timeout(0.0))
            .then(FailureConfig::timeout(0.0))
            .then(FailureConfig::timeout(0.0))
            .build()
            .unwrap();
        let tool = with_monkey("echo", scenario, None, echo);

        let outcome = retry_tool_call(&instant().with_max_retries(2), &tool, 1);
        assert_eq!(outcome.attempts, 3);
        let err = outcome.into_result().unwrap_err();
        assert!(matches!(err.injected(), Some(InjectedError::Timeout(_))));
    }

    #[tokio::test]
    async fn async_tool_retry() {
        let scenario = FailureScenario::builder("limited")
            .then(FailureConfig::rate_limit(0.0, LimitType::Burst, 0))
            .build()
            .unwrap();
        let observer = Arc::new(MonkeyObserver::new());
        let tool = with_monkey("fetch", scenario, Some(observer.clone()), |x: u32| async move {
            Ok::<_, String>(x * 10)
        });

        let outcome = retry_tool_call_async(&instant(), &tool, 4).await;
        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.into_result().unwrap(), 40);
        assert_eq!(observer.metrics().unwrap().total_retries, 1);
    }
}

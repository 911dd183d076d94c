//! Injection engine for scheduled tool failures.
//!
//! An engine owns one monotonic call counter and one [`FailureScenario`].
//! Every invocation attempt advances the counter by exactly one; when the new
//! count matches a trigger the engine manufactures the scheduled
//! [`InjectedError`]. Timeouts cost real wall-clock time before they are
//! returned, every other kind is returned immediately.
//!
//! Create one engine per wrapped tool. Sharing an engine between unrelated
//! tools merges their call counts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use domain::{FailureConfig, FailureScenario, InjectedError};
use tracing::{debug, warn};

use super::{ChaosStats, chaos_stats::StatsRecorder};

/// Outcome of advancing the call counter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledCall<'a> {
    /// 1-based ordinal of this attempt
    pub call_number: u64,
    /// Failure scheduled for this attempt, if any
    pub failure: Option<&'a FailureConfig>,
}

impl ScheduledCall<'_> {
    /// Delay to emulate before the failure surfaces
    pub fn delay(&self) -> Option<Duration> {
        match self.failure? {
            FailureConfig::Timeout(cfg) => Duration::try_from_secs_f64(cfg.seconds).ok(),
            _ => None,
        }
    }

    /// Error the scheduled failure produces
    pub fn error(&self) -> Option<InjectedError> {
        self.failure.map(InjectedError::from_config)
    }
}

/// Decides per invocation attempt whether to fail, and how
#[derive(Debug)]
pub struct InjectionEngine {
    scenario: FailureScenario,
    call_count: AtomicU64,
    stats: StatsRecorder,
}

impl InjectionEngine {
    /// Create an engine with a fresh counter
    pub fn new(scenario: FailureScenario) -> Self {
        Self {
            scenario,
            call_count: AtomicU64::new(0),
            stats: StatsRecorder::default(),
        }
    }

    pub fn scenario(&self) -> &FailureScenario {
        &self.scenario
    }

    /// Number of attempts seen so far
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Advance the counter and look up the schedule without sleeping
    pub fn next_call(&self) -> ScheduledCall<'_> {
        let call_number = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.record_call();

        let failure = self
            .scenario
            .failure_at(call_number)
            .map(|failure| &failure.config);

        match failure {
            Some(config) => {
                self.stats.record_injection(config.kind());
                warn!(
                    scenario = %self.scenario.name(),
                    call_number,
                    error_kind = %config.kind(),
                    "Injecting tool failure"
                );
            },
            None => debug!(
                scenario = %self.scenario.name(),
                call_number,
                "No failure scheduled, passing through"
            ),
        }

        ScheduledCall {
            call_number,
            failure,
        }
    }

    /// Advance the counter and return the scheduled error, if any
    ///
    /// Blocks the calling thread for the configured delay of a timeout.
    pub fn should_fail(&self) -> Option<InjectedError> {
        let scheduled = self.next_call();
        if let Some(delay) = scheduled.delay() {
            std::thread::sleep(delay);
            self.stats.record_delay(delay);
        }
        scheduled.error()
    }

    /// Async form of [`Self::should_fail`]; the timeout delay yields to the runtime
    pub async fn should_fail_async(&self) -> Option<InjectedError> {
        let scheduled = self.next_call();
        if let Some(delay) = scheduled.delay() {
            tokio::time::sleep(delay).await;
            self.stats.record_delay(delay);
        }
        scheduled.error()
    }

    /// Snapshot of the injection statistics
    pub fn stats(&self) -> ChaosStats {
        self.stats.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread, time::Instant};

    use domain::{AuthFailureType, ErrorKind, LimitType};

    use super::*;

    fn engine(scenario: FailureScenario) -> InjectionEngine {
        InjectionEngine::new(scenario)
    }

    #[test]
    fn passthrough_never_fails() {
        let engine = engine(FailureScenario::passthrough("quiet").unwrap());
        for _ in 0..10 {
            assert!(engine.should_fail().is_none());
        }
        assert_eq!(engine.call_count(), 10);
        assert_eq!(engine.stats().faults_injected, 0);
    }

    #[test]
    fn fails_only_on_trigger() {
        let scenario = FailureScenario::builder("second")
            .on_call(2, FailureConfig::rate_limit(1.0, LimitType::Burst, 0))
            .build()
            .unwrap();
        let engine = engine(scenario);

        assert!(engine.should_fail().is_none());
        let err = engine.should_fail().unwrap();
        assert_eq!(err.kind(), ErrorKind::RateLimit);
        assert!(engine.should_fail().is_none());
    }

    #[test]
    fn next_call_reports_ordinal_and_schedule() {
        let scenario = FailureScenario::builder("first")
            .then(FailureConfig::auth_failure(AuthFailureType::Forbidden, "no"))
            .build()
            .unwrap();
        let engine = engine(scenario);

        let first = engine.next_call();
        assert_eq!(first.call_number, 1);
        assert_eq!(first.failure.map(FailureConfig::kind), Some(ErrorKind::AuthFailure));
        assert!(first.delay().is_none());

        let second = engine.next_call();
        assert_eq!(second.call_number, 2);
        assert!(second.failure.is_none());
    }

    #[test]
    fn timeout_blocks_for_configured_delay() {
        let scenario = FailureScenario::builder("slow")
            .then(FailureConfig::timeout(0.1))
            .build()
            .unwrap();
        let engine = engine(scenario);

        let start = Instant::now();
        let err = engine.should_fail().unwrap();
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert!(matches!(err, InjectedError::Timeout(_)));
        assert_eq!(engine.stats().total_delay_ms, 100);
    }

    #[test]
    fn non_timeout_kinds_return_immediately() {
        let scenario = FailureScenario::builder("fast")
            .then(FailureConfig::rate_limit(30.0, LimitType::PerHour, 0))
            .then(FailureConfig::content_moderation("violence", None))
            .build()
            .unwrap();
        let engine = engine(scenario);

        let start = Instant::now();
        assert!(engine.should_fail().is_some());
        assert!(engine.should_fail().is_some());
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(engine.stats().total_delay_ms, 0);
    }

    #[tokio::test]
    async fn async_timeout_waits() {
        let scenario = FailureScenario::builder("slow")
            .then(FailureConfig::timeout(0.05))
            .build()
            .unwrap();
        let engine = engine(scenario);

        let start = Instant::now();
        let err = engine.should_fail_async().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(engine.should_fail_async().await.is_none());
    }

    #[test]
    fn stats_track_kinds() {
        let scenario = FailureScenario::builder("mixed")
            .then(FailureConfig::timeout(0.0))
            .on_call(3, FailureConfig::rate_limit(0.0, LimitType::Burst, 0))
            .build()
            .unwrap();
        let engine = engine(scenario);
        for _ in 0..4 {
            let _ = engine.should_fail();
        }

        let stats = engine.stats();
        assert_eq!(stats.total_calls, 4);
        assert_eq!(stats.faults_injected, 2);
        assert_eq!(stats.calls_passed, 2);
        assert_eq!(stats.timeouts_injected, 1);
        assert_eq!(stats.rate_limits_injected, 1);
        assert!((stats.actual_fault_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn concurrent_callers_get_distinct_ordinals() {
        let scenario = FailureScenario::builder("tenth")
            .on_call(10, FailureConfig::content_moderation("spam", None))
            .build()
            .unwrap();
        let engine = Arc::new(engine(scenario));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    (0..25)
                        .filter(|_| engine.should_fail().is_some())
                        .count()
                })
            })
            .collect();
        let injected: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(injected, 1);
        assert_eq!(engine.call_count(), 100);
    }
}

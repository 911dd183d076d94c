//! Per-engine injection statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use domain::ErrorKind;
use serde::{Deserialize, Serialize};

/// Statistics about failure injection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaosStats {
    /// Total number of invocation attempts seen by the engine
    pub total_calls: u64,
    /// Number of failures injected
    pub faults_injected: u64,
    /// Number of attempts passed through to the tool
    pub calls_passed: u64,
    /// Number of timeouts injected
    pub timeouts_injected: u64,
    /// Number of rate limit errors injected
    pub rate_limits_injected: u64,
    /// Number of authentication failures injected
    pub auth_failures_injected: u64,
    /// Number of moderation rejections injected
    pub moderations_injected: u64,
    /// Total delay spent emulating timeouts (milliseconds)
    pub total_delay_ms: u64,
}

impl ChaosStats {
    /// Calculate the actual fault rate
    #[allow(clippy::cast_precision_loss)]
    pub fn actual_fault_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.faults_injected as f64 / self.total_calls as f64
        }
    }

    /// Injection count for a single error kind
    pub const fn injected_of(&self, kind: ErrorKind) -> u64 {
        match kind {
            ErrorKind::Timeout => self.timeouts_injected,
            ErrorKind::RateLimit => self.rate_limits_injected,
            ErrorKind::AuthFailure => self.auth_failures_injected,
            ErrorKind::ContentModeration => self.moderations_injected,
        }
    }
}

/// Lock-free counters behind [`ChaosStats`]
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    total_calls: AtomicU64,
    faults_injected: AtomicU64,
    timeouts_injected: AtomicU64,
    rate_limits_injected: AtomicU64,
    auth_failures_injected: AtomicU64,
    moderations_injected: AtomicU64,
    total_delay_ms: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_call(&self) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_injection(&self, kind: ErrorKind) {
        self.faults_injected.fetch_add(1, Ordering::Relaxed);
        let counter = match kind {
            ErrorKind::Timeout => &self.timeouts_injected,
            ErrorKind::RateLimit => &self.rate_limits_injected,
            ErrorKind::AuthFailure => &self.auth_failures_injected,
            ErrorKind::ContentModeration => &self.moderations_injected,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn record_delay(&self, delay: Duration) {
        self.total_delay_ms
            .fetch_add(delay.as_millis() as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ChaosStats {
        let total_calls = self.total_calls.load(Ordering::Relaxed);
        let faults_injected = self.faults_injected.load(Ordering::Relaxed);
        ChaosStats {
            total_calls,
            faults_injected,
            calls_passed: total_calls.saturating_sub(faults_injected),
            timeouts_injected: self.timeouts_injected.load(Ordering::Relaxed),
            rate_limits_injected: self.rate_limits_injected.load(Ordering::Relaxed),
            auth_failures_injected: self.auth_failures_injected.load(Ordering::Relaxed),
            moderations_injected: self.moderations_injected.load(Ordering::Relaxed),
            total_delay_ms: self.total_delay_ms.load(Ordering::Relaxed),
        }
    }
}

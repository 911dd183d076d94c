//! Errors manufactured by the injection engine
//!
//! Each variant carries the full payload of its kind, so callers can assert on
//! `retry_after_seconds` or `status_code` rather than parsing messages.

use std::time::Duration;

use thiserror::Error;

use crate::value_objects::{
    AuthFailureConfig, ContentModerationConfig, ErrorKind, FailureConfig, RateLimitConfig,
    TimeoutConfig,
};

/// A chaos-injected tool failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InjectedError {
    #[error("Request timed out after {}s", .0.seconds)]
    Timeout(TimeoutConfig),

    #[error(
        "Rate limit exceeded ({}): retry after {}s, {} remaining",
        .0.limit_type,
        .0.retry_after_seconds,
        .0.remaining
    )]
    RateLimit(RateLimitConfig),

    #[error(
        "Authentication failed ({} {}): {}",
        .0.effective_status_code(),
        .0.failure_type,
        .0.effective_message()
    )]
    AuthFailure(AuthFailureConfig),

    #[error("Content policy violation: {}", moderation_reason(.0))]
    ContentModeration(ContentModerationConfig),
}

fn moderation_reason(config: &ContentModerationConfig) -> String {
    if let Some(reason) = &config.reason {
        return reason.clone();
    }
    let flagged: Vec<&str> = config.flagged_categories().collect();
    if flagged.is_empty() {
        "content rejected".to_string()
    } else {
        flagged.join(", ")
    }
}

impl InjectedError {
    /// Construct the error a scheduled failure produces
    pub fn from_config(config: &FailureConfig) -> Self {
        match config {
            FailureConfig::Timeout(cfg) => Self::Timeout(cfg.clone()),
            FailureConfig::RateLimit(cfg) => Self::RateLimit(cfg.clone()),
            FailureConfig::AuthFailure(cfg) => Self::AuthFailure(cfg.clone()),
            FailureConfig::ContentModeration(cfg) => Self::ContentModeration(cfg.clone()),
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::RateLimit(_) => ErrorKind::RateLimit,
            Self::AuthFailure(_) => ErrorKind::AuthFailure,
            Self::ContentModeration(_) => ErrorKind::ContentModeration,
        }
    }

    /// Payload this error was built from
    pub fn config(&self) -> FailureConfig {
        match self {
            Self::Timeout(cfg) => FailureConfig::Timeout(cfg.clone()),
            Self::RateLimit(cfg) => FailureConfig::RateLimit(cfg.clone()),
            Self::AuthFailure(cfg) => FailureConfig::AuthFailure(cfg.clone()),
            Self::ContentModeration(cfg) => FailureConfig::ContentModeration(cfg.clone()),
        }
    }

    /// Timeouts and rate limits may succeed on a later attempt
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::RateLimit(_))
    }

    /// Back-off hint carried by rate limit errors
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit(cfg) => Duration::try_from_secs_f64(cfg.retry_after_seconds).ok(),
            _ => None,
        }
    }

    /// Status code carried by authentication failures
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthFailure(cfg) => Some(cfg.effective_status_code()),
            _ => None,
        }
    }
}

//! Kind-specific failure payloads
//!
//! `FailureConfig` is a tagged union keyed by `error_kind`: each variant carries
//! exactly the fields its kind needs, so a payload can never have the wrong
//! shape for its kind.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AuthFailureType, ErrorKind, LimitType};
use crate::errors::ConfigurationError;

/// Timeout payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Delay emulated before the timeout is raised
    #[serde(default, alias = "n_seconds")]
    pub seconds: f64,
}

/// Rate limit payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Hint for how long the caller should back off
    #[serde(default)]
    pub retry_after_seconds: f64,
    /// Quota window that was exceeded
    #[serde(default)]
    pub limit_type: LimitType,
    /// Requests left in the window (0 = exhausted)
    #[serde(default)]
    pub remaining: u32,
}

/// Authentication failure payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFailureConfig {
    #[serde(default)]
    pub failure_type: AuthFailureType,
    /// HTTP-style status code; derived from `failure_type` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AuthFailureConfig {
    /// Status code after applying the per-type default
    pub fn effective_status_code(&self) -> u16 {
        self.status_code
            .unwrap_or_else(|| self.failure_type.default_status_code())
    }

    /// Message after applying the per-type default
    pub fn effective_message(&self) -> &str {
        self.error_message
            .as_deref()
            .unwrap_or_else(|| self.failure_type.default_message())
    }
}

/// Content moderation payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentModerationConfig {
    /// Category name to flagged
    #[serde(default)]
    pub content_categories: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ContentModerationConfig {
    /// Names of the categories flagged `true`
    pub fn flagged_categories(&self) -> impl Iterator<Item = &str> {
        self.content_categories
            .iter()
            .filter(|(_, flagged)| **flagged)
            .map(|(name, _)| name.as_str())
    }
}

/// Failure payload keyed by error kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "error_kind", rename_all = "snake_case")]
pub enum FailureConfig {
    Timeout(TimeoutConfig),
    RateLimit(RateLimitConfig),
    AuthFailure(AuthFailureConfig),
    ContentModeration(ContentModerationConfig),
}

impl FailureConfig {
    /// Timeout after `seconds`
    pub const fn timeout(seconds: f64) -> Self {
        Self::Timeout(TimeoutConfig { seconds })
    }

    /// Rate limit rejection
    pub const fn rate_limit(retry_after_seconds: f64, limit_type: LimitType, remaining: u32) -> Self {
        Self::RateLimit(RateLimitConfig {
            retry_after_seconds,
            limit_type,
            remaining,
        })
    }

    /// Authentication failure with the default status code for its type
    pub fn auth_failure(failure_type: AuthFailureType, error_message: impl Into<String>) -> Self {
        Self::AuthFailure(AuthFailureConfig {
            failure_type,
            status_code: None,
            error_message: Some(error_message.into()),
        })
    }

    /// Content moderation rejection flagging a single category
    pub fn content_moderation(category: impl Into<String>, reason: Option<String>) -> Self {
        let mut content_categories = BTreeMap::new();
        content_categories.insert(category.into(), true);
        Self::ContentModeration(ContentModerationConfig {
            content_categories,
            reason,
        })
    }

    /// Kind this payload belongs to
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::RateLimit(_) => ErrorKind::RateLimit,
            Self::AuthFailure(_) => ErrorKind::AuthFailure,
            Self::ContentModeration(_) => ErrorKind::ContentModeration,
        }
    }

    /// Check field ranges; `scenario` names the owner in error messages
    pub fn validate(&self, scenario: &str) -> Result<(), ConfigurationError> {
        match self {
            Self::Timeout(cfg) => check_seconds(scenario, "seconds", cfg.seconds),
            Self::RateLimit(cfg) => {
                check_seconds(scenario, "retry_after_seconds", cfg.retry_after_seconds)
            },
            Self::AuthFailure(cfg) => match cfg.status_code {
                Some(code) if !(100..=599).contains(&code) => Err(
                    ConfigurationError::invalid_field(
                        scenario,
                        "status_code",
                        format!("{code} is not an HTTP status code"),
                    ),
                ),
                _ => Ok(()),
            },
            Self::ContentModeration(_) => Ok(()),
        }
    }
}

fn check_seconds(scenario: &str, field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if !value.is_finite() {
        return Err(ConfigurationError::invalid_field(
            scenario,
            field,
            "must be finite",
        ));
    }
    if value < 0.0 {
        return Err(ConfigurationError::invalid_field(
            scenario,
            field,
            format!("{value} is negative"),
        ));
    }
    if Duration::try_from_secs_f64(value).is_err() {
        return Err(ConfigurationError::invalid_field(
            scenario,
            field,
            format!("{value} exceeds the longest representable duration"),
        ));
    }
    Ok(())
}

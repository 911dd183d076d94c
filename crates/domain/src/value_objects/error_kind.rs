//! Closed set of failure kinds and their enumerated fields

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;

/// Kind of failure the injection engine can manufacture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The call runs out of time
    Timeout,
    /// The upstream rejects the call for exceeding a quota
    RateLimit,
    /// Credentials are rejected
    AuthFailure,
    /// Content policy rejects the request
    ContentModeration,
}

impl ErrorKind {
    /// All kinds, in declaration order
    pub const ALL: [Self; 4] = [
        Self::Timeout,
        Self::RateLimit,
        Self::AuthFailure,
        Self::ContentModeration,
    ];

    /// Snake-case name used in configuration files
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::RateLimit => "rate_limit",
            Self::AuthFailure => "auth_failure",
            Self::ContentModeration => "content_moderation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownErrorKind(s.to_string()))
    }
}

/// Which quota window a rate limit applies to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitType {
    /// Short burst of rapid requests
    #[default]
    Burst,
    /// Per-minute quota
    PerMinute,
    /// Per-hour quota
    PerHour,
}

impl fmt::Display for LimitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Burst => write!(f, "burst"),
            Self::PerMinute => write!(f, "per_minute"),
            Self::PerHour => write!(f, "per_hour"),
        }
    }
}

/// Flavour of authentication failure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailureType {
    /// Missing or expired credentials (401)
    #[default]
    Unauthorized,
    /// Valid credentials without permission (403)
    Forbidden,
    /// Revoked or malformed API key (401)
    InvalidKey,
}

impl AuthFailureType {
    /// HTTP status code used when none is configured
    pub const fn default_status_code(&self) -> u16 {
        match self {
            Self::Unauthorized | Self::InvalidKey => 401,
            Self::Forbidden => 403,
        }
    }

    /// Message used when none is configured
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::InvalidKey => "Invalid API key",
        }
    }
}

impl fmt::Display for AuthFailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::InvalidKey => write!(f, "invalid_key"),
        }
    }
}

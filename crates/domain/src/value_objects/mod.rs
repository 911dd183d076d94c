//! Value objects - Immutable types identified by their values

pub mod call_id;
pub mod error_kind;
pub mod failure_config;

pub use call_id::CallId;
pub use error_kind::{AuthFailureType, ErrorKind, LimitType};
pub use failure_config::{
    AuthFailureConfig, ContentModerationConfig, FailureConfig, RateLimitConfig, TimeoutConfig,
};

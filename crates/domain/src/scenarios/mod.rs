//! Ready-made failure scenarios
//!
//! Each builder models a failure pattern seen against real APIs. [`preset`]
//! looks them up by name with their default parameters.

mod auth_failures;
mod content_moderation;
mod rate_limits;
mod timeouts;

pub use auth_failures::{expired_token, forbidden_access, invalid_api_key};
pub use content_moderation::content_policy_violation;
pub use rate_limits::{QUOTA_EXHAUSTION_WINDOW, burst_rate_limit, progressive_rate_limit};
pub use timeouts::{intermittent_timeout, progressive_timeout, retry_exhaustion, single_timeout};

use crate::{entities::FailureScenario, errors::ConfigurationError};

/// Names accepted by [`preset`]
pub const PRESET_NAMES: [&str; 10] = [
    "single_timeout",
    "retry_exhaustion",
    "intermittent_timeout",
    "progressive_timeout",
    "burst_rate_limit",
    "progressive_rate_limit",
    "expired_token",
    "forbidden_access",
    "invalid_api_key",
    "content_policy_violation",
];

/// Build a named scenario with its default parameters
///
/// Returns `None` for an unknown name.
pub fn preset(name: &str) -> Option<Result<FailureScenario, ConfigurationError>> {
    let scenario = match name {
        "single_timeout" => single_timeout(3.0),
        "retry_exhaustion" => retry_exhaustion(3, 2.0),
        "intermittent_timeout" => intermittent_timeout(3, 2.0),
        "progressive_timeout" => progressive_timeout(&[1.0, 2.0, 5.0, 10.0]),
        "burst_rate_limit" => burst_rate_limit(3, 5.0),
        "progressive_rate_limit" => progressive_rate_limit(5, 60.0),
        "expired_token" => expired_token(3),
        "forbidden_access" => forbidden_access(),
        "invalid_api_key" => invalid_api_key(),
        "content_policy_violation" => content_policy_violation("nsfw_content"),
        _ => return None,
    };
    Some(scenario)
}

//! Rate limit scenarios

use crate::{
    entities::FailureScenario,
    errors::ConfigurationError,
    value_objects::{FailureConfig, LimitType},
};

/// Number of consecutive calls rejected once a quota is exhausted
pub const QUOTA_EXHAUSTION_WINDOW: u32 = 19;

/// Burst rate limit on call `on_call`
///
/// Models an API that accepts a few rapid requests and then answers 429.
pub fn burst_rate_limit(
    on_call: u32,
    retry_after: f64,
) -> Result<FailureScenario, ConfigurationError> {
    FailureScenario::builder("burst_rate_limit")
        .on_call(
            on_call,
            FailureConfig::rate_limit(retry_after, LimitType::Burst, 0),
        )
        .build()
}

/// The first `quota` calls succeed, then every call in the following
/// [`QUOTA_EXHAUSTION_WINDOW`] fails with a per-minute rate limit
pub fn progressive_rate_limit(
    quota: u32,
    retry_after: f64,
) -> Result<FailureScenario, ConfigurationError> {
    (1..=QUOTA_EXHAUSTION_WINDOW)
        .fold(FailureScenario::builder("progressive_rate_limit"), |builder, offset| {
            builder.on_call(
                quota.saturating_add(offset),
                FailureConfig::rate_limit(retry_after, LimitType::PerMinute, 0),
            )
        })
        .build()
}

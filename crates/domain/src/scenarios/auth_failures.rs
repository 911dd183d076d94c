//! Authentication failure scenarios

use crate::{
    entities::FailureScenario,
    errors::ConfigurationError,
    value_objects::{AuthFailureType, FailureConfig},
};

/// Token expires mid-session: call `on_call` gets a 401
pub fn expired_token(on_call: u32) -> Result<FailureScenario, ConfigurationError> {
    FailureScenario::builder("expired_token")
        .on_call(
            on_call,
            FailureConfig::auth_failure(AuthFailureType::Unauthorized, "Access token expired"),
        )
        .build()
}

/// First call is rejected with 403
pub fn forbidden_access() -> Result<FailureScenario, ConfigurationError> {
    FailureScenario::builder("forbidden_access")
        .on_call(
            1,
            FailureConfig::auth_failure(AuthFailureType::Forbidden, "Insufficient permissions"),
        )
        .build()
}

/// First call is rejected because the API key was revoked
pub fn invalid_api_key() -> Result<FailureScenario, ConfigurationError> {
    FailureScenario::builder("invalid_api_key")
        .on_call(
            1,
            FailureConfig::auth_failure(AuthFailureType::InvalidKey, "Invalid API key"),
        )
        .build()
}

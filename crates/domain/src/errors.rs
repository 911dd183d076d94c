//! Domain-level errors

use thiserror::Error;

/// Errors raised while building a failure scenario
///
/// These always surface at construction time, never when a wrapped tool is called.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Two failures resolve to the same trigger call count
    #[error("Scenario '{scenario}' has more than one failure on call {call_count}")]
    DuplicateTrigger { scenario: String, call_count: u32 },

    /// Trigger call counts are 1-based
    #[error("Scenario '{scenario}' has a failure on call 0; call counts start at 1")]
    ZeroTrigger { scenario: String },

    /// Scenario without a name
    #[error("Scenario name must not be empty")]
    EmptyName,

    /// A failure payload field is out of range
    #[error("Invalid {field} in scenario '{scenario}': {reason}")]
    InvalidField {
        scenario: String,
        field: &'static str,
        reason: String,
    },

    /// Unrecognized error kind name
    #[error("Unknown error kind: {0}")]
    UnknownErrorKind(String),
}

impl ConfigurationError {
    /// Create an invalid field error
    pub fn invalid_field(
        scenario: impl Into<String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            scenario: scenario.into(),
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_trigger_message() {
        let err = ConfigurationError::DuplicateTrigger {
            scenario: "flaky".to_string(),
            call_count: 2,
        };
        assert_eq!(
            err.to_string(),
            "Scenario 'flaky' has more than one failure on call 2"
        );
    }

    #[test]
    fn invalid_field_builds_variant() {
        let err = ConfigurationError::invalid_field("slow", "seconds", "must be finite");
        match err {
            ConfigurationError::InvalidField {
                scenario,
                field,
                reason,
            } => {
                assert_eq!(scenario, "slow");
                assert_eq!(field, "seconds");
                assert_eq!(reason, "must be finite");
            },
            _ => unreachable!("Expected InvalidField error"),
        }
    }

    #[test]
    fn unknown_error_kind_message() {
        let err = ConfigurationError::UnknownErrorKind("explode".to_string());
        assert_eq!(err.to_string(), "Unknown error kind: explode");
    }
}

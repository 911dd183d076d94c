//! Content moderation scenarios

use crate::{
    entities::FailureScenario, errors::ConfigurationError, value_objects::FailureConfig,
};

/// First call is rejected for violating content policy
///
/// `reason` is both the flagged category and the reported reason, e.g. an image
/// API refusing a prompt with `nsfw_content`.
pub fn content_policy_violation(reason: &str) -> Result<FailureScenario, ConfigurationError> {
    FailureScenario::builder("content_policy_violation")
        .on_call(
            1,
            FailureConfig::content_moderation(reason, Some(reason.to_string())),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::ErrorKind;

    #[test]
    fn flags_reason_as_category() {
        let scenario = content_policy_violation("nsfw_content").unwrap();
        let failure = scenario.failure_at(1).unwrap();
        assert_eq!(failure.error_kind(), ErrorKind::ContentModeration);
        match &failure.config {
            FailureConfig::ContentModeration(cfg) => {
                assert_eq!(cfg.content_categories.get("nsfw_content"), Some(&true));
                assert_eq!(cfg.reason.as_deref(), Some("nsfw_content"));
            },
            other => unreachable!("unexpected config {other:?}"),
        }
    }
}

//! A single scheduled failure

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value_objects::{ErrorKind, FailureConfig};

const TRIGGER_FIELD: &str = "trigger_call_count";
const KIND_FIELD: &str = "error_kind";

const TIMEOUT_FIELDS: &[&str] = &[TRIGGER_FIELD, KIND_FIELD, "seconds", "n_seconds"];
const RATE_LIMIT_FIELDS: &[&str] = &[
    TRIGGER_FIELD,
    KIND_FIELD,
    "retry_after_seconds",
    "limit_type",
    "remaining",
];
const AUTH_FAILURE_FIELDS: &[&str] = &[
    TRIGGER_FIELD,
    KIND_FIELD,
    "failure_type",
    "status_code",
    "error_message",
];
const CONTENT_MODERATION_FIELDS: &[&str] =
    &[TRIGGER_FIELD, KIND_FIELD, "content_categories", "reason"];

/// Keys a failure of `kind` may carry
const fn accepted_fields(kind: ErrorKind) -> &'static [&'static str] {
    match kind {
        ErrorKind::Timeout => TIMEOUT_FIELDS,
        ErrorKind::RateLimit => RATE_LIMIT_FIELDS,
        ErrorKind::AuthFailure => AUTH_FAILURE_FIELDS,
        ErrorKind::ContentModeration => CONTENT_MODERATION_FIELDS,
    }
}

/// One failure in a scenario, optionally pinned to a call count
///
/// Without `trigger_call_count` the failure fires on the call matching its
/// 1-based position in the scenario. Keys the failure's kind does not accept
/// are rejected when parsing, so a misspelled trigger cannot silently turn
/// into a positional failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_call_count: Option<u32>,
    #[serde(flatten)]
    pub config: FailureConfig,
}

impl ToolFailure {
    /// Failure placed by its position in the scenario
    pub const fn positional(config: FailureConfig) -> Self {
        Self {
            trigger_call_count: None,
            config,
        }
    }

    /// Failure that fires on call `call_count`
    pub const fn on_call(call_count: u32, config: FailureConfig) -> Self {
        Self {
            trigger_call_count: Some(call_count),
            config,
        }
    }

    /// Kind of error this failure produces
    pub const fn error_kind(&self) -> ErrorKind {
        self.config.kind()
    }

    /// Trigger after positional assignment, `position` being 1-based
    pub fn effective_trigger(&self, position: u32) -> u32 {
        self.trigger_call_count.unwrap_or(position)
    }
}

impl<'de> Deserialize<'de> for ToolFailure {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = Map::deserialize(deserializer)?;

        // Unknown kinds are reported by the payload parse below
        let kind = fields
            .get(KIND_FIELD)
            .and_then(Value::as_str)
            .and_then(|kind| kind.parse::<ErrorKind>().ok());
        if let Some(kind) = kind {
            let expected = accepted_fields(kind);
            if let Some(unknown) = fields.keys().find(|key| !expected.contains(&key.as_str())) {
                return Err(de::Error::unknown_field(unknown, expected));
            }
        }

        let trigger_call_count = fields
            .remove(TRIGGER_FIELD)
            .map(serde_json::from_value::<Option<u32>>)
            .transpose()
            .map_err(de::Error::custom)?
            .flatten();
        let config = serde_json::from_value(Value::Object(fields)).map_err(de::Error::custom)?;

        Ok(Self {
            trigger_call_count,
            config,
        })
    }
}

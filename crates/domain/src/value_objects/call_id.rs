//! Identity of a single tool invocation attempt

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one invocation attempt between `start_call` and `end_call`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Wrap a caller-chosen identity
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identity for a call to `tool_name`
    ///
    /// UUID v7 values are time-ordered, so ids sort by creation time within a tool.
    pub fn generate(tool_name: &str) -> Self {
        Self(format!("{tool_name}-{}", Uuid::now_v7()))
    }

    /// Borrow the identity as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CallId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

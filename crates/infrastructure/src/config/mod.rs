//! Application configuration
//!
//! Layered with the `config` crate, later sources winning:
//! - built-in defaults
//! - `tool-monkey.toml` in the working directory (optional)
//! - `TOOL_MONKEY_*` environment variables, `__` separating nested keys
//!   (e.g. `TOOL_MONKEY_RETRY__MAX_RETRIES=5`)
//!
//! `[[scenarios]]` tables deserialize into validated [`FailureScenario`]s, so
//! a malformed schedule fails the load rather than a later tool call.

use std::collections::HashSet;
use std::path::Path;

use domain::FailureScenario;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::retry::RetryConfig;
use crate::telemetry::TelemetryConfig;

/// Base name of the optional configuration file
pub const CONFIG_FILE_NAME: &str = "tool-monkey";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "TOOL_MONKEY";

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// Reading or deserializing a source failed, including scenario validation
    #[error("Failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),

    /// Two `[[scenarios]]` entries share a name
    #[error("Scenario '{0}' is defined more than once")]
    DuplicateScenario(String),
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Defaults for the retry helper
    #[serde(default)]
    pub retry: RetryConfig,

    /// Named failure scenarios
    #[serde(default)]
    pub scenarios: Vec<FailureScenario>,
}

impl AppConfig {
    /// Load from `tool-monkey.toml` (if present) and the environment
    pub fn load() -> Result<Self, ConfigLoadError> {
        let builder = Self::defaults()?
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false));
        Self::finish(builder)
    }

    /// Load from an explicit file plus the environment
    ///
    /// The format follows the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration file");
        let builder = Self::defaults()?.add_source(config::File::from(path).required(true));
        Self::finish(builder)
    }

    /// Parse TOML text without consulting the environment
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigLoadError> {
        let config = Self::defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        Self::validated(config.try_deserialize()?)
    }

    /// Scenario with the given name
    pub fn scenario(&self, name: &str) -> Option<&FailureScenario> {
        self.scenarios.iter().find(|s| s.name() == name)
    }

    /// Names of the configured scenarios, in file order
    pub fn scenario_names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(FailureScenario::name)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigLoadError>
    {
        let defaults = TelemetryConfig::default();
        Ok(config::Config::builder()
            .set_default("telemetry.log_filter", defaults.log_filter)?
            .set_default("retry.max_retries", i64::from(RetryConfig::default().max_retries))?)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigLoadError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Self::validated(config.try_deserialize()?)
    }

    fn validated(config: Self) -> Result<Self, ConfigLoadError> {
        let mut seen = HashSet::new();
        for name in config.scenario_names() {
            if !seen.insert(name) {
                return Err(ConfigLoadError::DuplicateScenario(name.to_string()));
            }
        }
        debug!(scenarios = config.scenarios.len(), "Configuration loaded");
        Ok(config)
    }
}

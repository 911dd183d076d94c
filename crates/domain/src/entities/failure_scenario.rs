//! Failure scenario - an immutable schedule of failures keyed by call count

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ToolFailure;
use crate::{errors::ConfigurationError, value_objects::FailureConfig};

/// Serialized form of a scenario, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioDefinition {
    pub name: String,
    #[serde(default)]
    pub failures: Vec<ToolFailure>,
}

/// A named, validated schedule of failures
///
/// Every trigger is resolved and checked for collisions when the scenario is
/// built; a `FailureScenario` value is always consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScenarioDefinition", into = "ScenarioDefinition")]
pub struct FailureScenario {
    name: String,
    failures: Vec<ToolFailure>,
    /// Effective trigger -> index into `failures`
    triggers: BTreeMap<u32, usize>,
}

impl FailureScenario {
    /// Build a scenario, resolving positional triggers and rejecting collisions
    pub fn new(
        name: impl Into<String>,
        failures: Vec<ToolFailure>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName);
        }

        let mut triggers = BTreeMap::new();
        for (index, failure) in failures.iter().enumerate() {
            let position = u32::try_from(index + 1).unwrap_or(u32::MAX);
            let trigger = failure.effective_trigger(position);
            if trigger == 0 {
                return Err(ConfigurationError::ZeroTrigger { scenario: name });
            }
            failure.config.validate(&name)?;
            if triggers.insert(trigger, index).is_some() {
                return Err(ConfigurationError::DuplicateTrigger {
                    scenario: name,
                    call_count: trigger,
                });
            }
        }

        Ok(Self {
            name,
            failures,
            triggers,
        })
    }

    /// Start building a scenario
    pub fn builder(name: impl Into<String>) -> FailureScenarioBuilder {
        FailureScenarioBuilder {
            name: name.into(),
            failures: Vec::new(),
        }
    }

    /// Scenario without any failures
    pub fn passthrough(name: impl Into<String>) -> Result<Self, ConfigurationError> {
        Self::new(name, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Failures in declaration order, as supplied
    pub fn failures(&self) -> &[ToolFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failure scheduled for the given 1-based call count
    pub fn failure_at(&self, call_count: u64) -> Option<&ToolFailure> {
        let call_count = u32::try_from(call_count).ok()?;
        self.triggers
            .get(&call_count)
            .map(|&index| &self.failures[index])
    }

    /// Effective triggers in ascending call order
    pub fn triggers(&self) -> impl Iterator<Item = (u32, &ToolFailure)> {
        self.triggers
            .iter()
            .map(|(&trigger, &index)| (trigger, &self.failures[index]))
    }

    /// Highest call count with a scheduled failure
    pub fn last_trigger(&self) -> Option<u32> {
        self.triggers.keys().next_back().copied()
    }
}

impl TryFrom<ScenarioDefinition> for FailureScenario {
    type Error = ConfigurationError;

    fn try_from(definition: ScenarioDefinition) -> Result<Self, Self::Error> {
        Self::new(definition.name, definition.failures)
    }
}

impl From<FailureScenario> for ScenarioDefinition {
    fn from(scenario: FailureScenario) -> Self {
        Self {
            name: scenario.name,
            failures: scenario.failures,
        }
    }
}

/// Incremental builder for [`FailureScenario`]
#[derive(Debug, Clone)]
pub struct FailureScenarioBuilder {
    name: String,
    failures: Vec<ToolFailure>,
}

impl FailureScenarioBuilder {
    /// Append a failure placed by position
    #[must_use]
    pub fn then(mut self, config: FailureConfig) -> Self {
        self.failures.push(ToolFailure::positional(config));
        self
    }

    /// Append a failure pinned to `call_count`
    #[must_use]
    pub fn on_call(mut self, call_count: u32, config: FailureConfig) -> Self {
        self.failures.push(ToolFailure::on_call(call_count, config));
        self
    }

    /// Append an already-built failure
    #[must_use]
    pub fn failure(mut self, failure: ToolFailure) -> Self {
        self.failures.push(failure);
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<FailureScenario, ConfigurationError> {
        FailureScenario::new(self.name, self.failures)
    }
}

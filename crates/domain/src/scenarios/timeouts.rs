//! Timeout scenarios

use crate::{
    entities::FailureScenario, errors::ConfigurationError, value_objects::FailureConfig,
};

/// First call times out after `seconds`, the rest succeed
pub fn single_timeout(seconds: f64) -> Result<FailureScenario, ConfigurationError> {
    FailureScenario::builder("single_timeout")
        .then(FailureConfig::timeout(seconds))
        .build()
}

/// First `num_failures` calls time out back to back
///
/// Exercises retry limits: a caller retrying fewer than `num_failures` times
/// never sees a success.
pub fn retry_exhaustion(
    num_failures: u32,
    seconds: f64,
) -> Result<FailureScenario, ConfigurationError> {
    (0..num_failures)
        .fold(FailureScenario::builder("retry_exhaustion"), |builder, _| {
            builder.then(FailureConfig::timeout(seconds))
        })
        .build()
}

/// Timeout on odd calls (1, 3, 5, ...) for `num_cycles` cycles
pub fn intermittent_timeout(
    num_cycles: u32,
    seconds: f64,
) -> Result<FailureScenario, ConfigurationError> {
    (0..num_cycles)
        .fold(FailureScenario::builder("intermittent_timeout"), |builder, i| {
            builder.on_call(i * 2 + 1, FailureConfig::timeout(seconds))
        })
        .build()
}

/// Consecutive timeouts with growing delays, modelling service degradation
pub fn progressive_timeout(delays: &[f64]) -> Result<FailureScenario, ConfigurationError> {
    delays
        .iter()
        .fold(FailureScenario::builder("progressive_timeout"), |builder, &delay| {
            builder.then(FailureConfig::timeout(delay))
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triggers(scenario: &FailureScenario) -> Vec<u32> {
        scenario.triggers().map(|(t, _)| t).collect()
    }

    #[test]
    fn single_timeout_fires_on_first_call() {
        let scenario = single_timeout(3.0).unwrap();
        assert_eq!(scenario.name(), "single_timeout");
        assert_eq!(triggers(&scenario), vec![1]);
        assert_eq!(
            scenario.failure_at(1).map(|f| f.config.clone()),
            Some(FailureConfig::timeout(3.0))
        );
    }

    #[test]
    fn retry_exhaustion_fails_leading_calls() {
        assert_eq!(triggers(&retry_exhaustion(3, 0.0).unwrap()), vec![1, 2, 3]);
    }

    #[test]
    fn intermittent_timeout_alternates() {
        assert_eq!(
            triggers(&intermittent_timeout(3, 0.0).unwrap()),
            vec![1, 3, 5]
        );
    }

    #[test]
    fn progressive_timeout_keeps_delay_order() {
        let scenario = progressive_timeout(&[1.0, 2.0, 5.0]).unwrap();
        let delays: Vec<FailureConfig> = scenario
            .triggers()
            .map(|(_, failure)| failure.config.clone())
            .collect();
        assert_eq!(
            delays,
            vec![
                FailureConfig::timeout(1.0),
                FailureConfig::timeout(2.0),
                FailureConfig::timeout(5.0),
            ]
        );
    }

    #[test]
    fn negative_delay_is_rejected() {
        assert!(single_timeout(-1.0).is_err());
    }
}

//! Simulation configuration.

use chainrisk_types::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Number of Monte Carlo runs when the caller does not choose one.
pub const DEFAULT_RUN_COUNT: u64 = 1000;

/// When a healthy node is taken down by its suppliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadePolicy {
    /// Any failed direct supplier is enough.
    #[default]
    AnyUpstream,
    /// Every distinct direct supplier must have failed. Nodes without
    /// suppliers never cascade; a self-loop does not count as a supplier.
    AllUpstream,
}

/// Monte Carlo parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of independent runs. Must be at least 1.
    pub run_count: u64,
    /// Master seed. When `None`, one is drawn from OS entropy and reported.
    pub seed: Option<u64>,
    /// Cascade rule.
    pub policy: CascadePolicy,
    /// Worker threads. When `None`, the global rayon pool is used.
    pub threads: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            run_count: DEFAULT_RUN_COUNT,
            seed: None,
            policy: CascadePolicy::default(),
            threads: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_run_count(mut self, run_count: u64) -> Self {
        self.run_count = run_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: CascadePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.run_count == 0 {
            return Err(ConfigurationError::ZeroRunCount);
        }
        if self.threads == Some(0) {
            return Err(ConfigurationError::ZeroThreads);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.run_count, 1000);
        assert_eq!(config.policy, CascadePolicy::AnyUpstream);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            SimulationConfig::default().with_run_count(0).validate(),
            Err(ConfigurationError::ZeroRunCount)
        );
        assert_eq!(
            SimulationConfig::default().with_threads(0).validate(),
            Err(ConfigurationError::ZeroThreads)
        );
    }

    #[test]
    fn test_policy_serialization() {
        let json = serde_json::to_string(&CascadePolicy::AllUpstream).unwrap();
        assert_eq!(json, "\"all_upstream\"");
    }
}

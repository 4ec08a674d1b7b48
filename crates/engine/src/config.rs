//! Engine configuration.

use chainrisk_analysis::{AnalysisConfig, Threshold};
use chainrisk_risk::DampingModel;
use chainrisk_simulation::{CascadePolicy, SimulationConfig, DEFAULT_RUN_COUNT};
use chainrisk_types::{ConfigurationError, NodeId};
use serde::{Deserialize, Serialize};

fn default_run_count() -> u64 {
    DEFAULT_RUN_COUNT
}

/// Everything one engine invocation needs besides the graph.
///
/// There is no `Default`: the endpoint, buffer threshold and classification
/// thresholds are always chosen by the caller. `run_count` falls back to
/// [`DEFAULT_RUN_COUNT`] when omitted from serialized input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Node whose disruption probability is estimated.
    pub endpoint: NodeId,
    /// Buffer (days) at which local risk is fully damped. Must be > 0.
    pub buffer_threshold: f64,
    /// Monte Carlo runs. Must be at least 1.
    #[serde(default = "default_run_count")]
    pub run_count: u64,
    /// Master seed. `None` draws one from OS entropy; the report records it.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Hub cutoff on normalized in-degree.
    pub hub_threshold: Threshold,
    /// Bottleneck cutoff on betweenness.
    pub bottleneck_threshold: Threshold,
    /// Cascade rule for the simulation.
    #[serde(default)]
    pub cascade_policy: CascadePolicy,
    /// Worker threads. `None` uses the global pool.
    #[serde(default)]
    pub threads: Option<usize>,
    /// Truncate rankings in the report. `None` keeps every node.
    #[serde(default)]
    pub top_n: Option<usize>,
}

impl EngineConfig {
    /// Create a configuration with the required fields and defaults for
    /// the rest.
    pub fn new(
        endpoint: impl Into<NodeId>,
        buffer_threshold: f64,
        hub_threshold: Threshold,
        bottleneck_threshold: Threshold,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            buffer_threshold,
            run_count: DEFAULT_RUN_COUNT,
            random_seed: None,
            hub_threshold,
            bottleneck_threshold,
            cascade_policy: CascadePolicy::default(),
            threads: None,
            top_n: None,
        }
    }

    /// Set the number of Monte Carlo runs.
    pub fn with_run_count(mut self, run_count: u64) -> Self {
        self.run_count = run_count;
        self
    }

    /// Fix the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Set the cascade rule.
    pub fn with_cascade_policy(mut self, policy: CascadePolicy) -> Self {
        self.cascade_policy = policy;
        self
    }

    /// Bound the worker pool.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Keep only the top `n` entries of each ranking.
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Check every value without touching a graph.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.damping_model()?;
        self.analysis_config().validate()?;
        self.simulation_config().validate()
    }

    pub(crate) fn damping_model(&self) -> Result<DampingModel, ConfigurationError> {
        DampingModel::new(self.buffer_threshold)
    }

    pub(crate) fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig::new(self.hub_threshold, self.bottleneck_threshold)
    }

    pub(crate) fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            run_count: self.run_count,
            seed: self.random_seed,
            policy: self.cascade_policy,
            threads: self.threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::new("dc", 30.0, Threshold::Percentile(90.0), Threshold::Fixed(0.1))
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
        assert_eq!(config().run_count, 1000);
    }

    #[test]
    fn test_each_field_validated() {
        assert_eq!(
            EngineConfig {
                buffer_threshold: 0.0,
                ..config()
            }
            .validate(),
            Err(ConfigurationError::NonPositiveBufferThreshold(0.0))
        );
        assert_eq!(
            config().with_run_count(0).validate(),
            Err(ConfigurationError::ZeroRunCount)
        );
        assert!(matches!(
            EngineConfig {
                hub_threshold: Threshold::Percentile(-1.0),
                ..config()
            }
            .validate(),
            Err(ConfigurationError::InvalidThreshold { name: "hub", .. })
        ));
        assert_eq!(
            config().with_threads(0).validate(),
            Err(ConfigurationError::ZeroThreads)
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "endpoint": "dc",
            "buffer_threshold": 14.0,
            "hub_threshold": {"mode": "percentile", "value": 90.0},
            "bottleneck_threshold": {"mode": "fixed", "value": 0.2}
        }"#;
        let parsed: EngineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.run_count, DEFAULT_RUN_COUNT);
        assert_eq!(parsed.cascade_policy, CascadePolicy::AnyUpstream);
        assert_eq!(parsed.hub_threshold, Threshold::Percentile(90.0));
        assert!(parsed.random_seed.is_none());
    }
}

//! The risk engine.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::report::{DisruptionReport, RiskReport};
use chainrisk_analysis::{ranked_scores, PathResult, StructuralAnalyzer};
use chainrisk_risk::propagated_risk;
use chainrisk_simulation::MonteCarloSimulator;
use chainrisk_types::{Graph, GraphData, NodeId};
use std::time::Instant;
use tracing::{info, warn};

/// Runs the full pipeline over one validated graph.
///
/// The graph is borrowed immutably; every report is built fresh per call
/// and owned by the caller.
pub struct RiskEngine<'g> {
    graph: &'g Graph,
    config: EngineConfig,
}

impl<'g> RiskEngine<'g> {
    /// Validate the configuration against the graph.
    ///
    /// Fails if any setting is out of range or the endpoint is not a node.
    pub fn new(graph: &'g Graph, config: EngineConfig) -> Result<Self, EngineError> {
        if let Err(err) = Self::check(graph, &config) {
            chainrisk_metrics::record_validation_failure(err.kind());
            warn!(error = %err, "Rejected engine configuration");
            return Err(err);
        }
        chainrisk_metrics::record_graph_loaded(graph.len(), graph.edge_count());
        Ok(Self { graph, config })
    }

    fn check(graph: &Graph, config: &EngineConfig) -> Result<(), EngineError> {
        config.validate()?;
        graph.require(config.endpoint.as_str())?;
        Ok(())
    }

    /// The graph under analysis.
    pub fn graph(&self) -> &Graph {
        self.graph
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run structural analysis, damping, propagation and simulation.
    pub fn analyze(&self) -> Result<DisruptionReport, EngineError> {
        let started = Instant::now();
        let analyzer = StructuralAnalyzer::new(self.graph);
        let endpoint = self.config.endpoint.as_str();

        let mut structural = analyzer.analyze(&self.config.analysis_config())?;
        let endpoint_upstream = analyzer.upstream_audit(endpoint)?;

        let stage = Instant::now();
        let profiles = self.config.damping_model()?.apply(self.graph);
        let propagated = propagated_risk(self.graph, &profiles);
        chainrisk_metrics::record_stage_latency("risk_model", stage.elapsed().as_secs_f64());

        let simulator = MonteCarloSimulator::new(self.graph, self.config.simulation_config())?;
        let simulation = simulator.run(&profiles.effective_risks(), endpoint)?;

        let mut propagated = ranked_scores(self.graph, &propagated);
        if let Some(n) = self.config.top_n {
            structural.truncate_rankings(n);
            propagated.truncate(n);
        }

        info!(
            endpoint,
            probability = simulation.endpoint_disruption_probability,
            upstream = endpoint_upstream.len(),
            master_seed = simulation.master_seed,
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Disruption analysis complete"
        );

        Ok(DisruptionReport {
            endpoint: self.config.endpoint.clone(),
            endpoint_upstream,
            structural,
            risk: RiskReport {
                profiles,
                propagated,
                simulation,
            },
        })
    }

    /// Minimum-hop path between two nodes.
    pub fn shortest_path(&self, from: &str, to: &str) -> Result<PathResult, EngineError> {
        Ok(StructuralAnalyzer::new(self.graph).shortest_path(from, to)?)
    }

    /// All ancestors of a node.
    pub fn upstream_audit(&self, id: &str) -> Result<Vec<NodeId>, EngineError> {
        Ok(StructuralAnalyzer::new(self.graph).upstream_audit(id)?)
    }

    /// All descendants of a node.
    pub fn downstream_impact(&self, id: &str) -> Result<Vec<NodeId>, EngineError> {
        Ok(StructuralAnalyzer::new(self.graph).downstream_impact(id)?)
    }
}

/// Validate serialized graph data into a [`Graph`].
pub fn load_graph(data: GraphData) -> Result<Graph, EngineError> {
    Graph::try_from(data).map_err(|err| {
        chainrisk_metrics::record_validation_failure("invalid_graph");
        EngineError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainrisk_analysis::Threshold;
    use chainrisk_test_helpers::fixtures;
    use chainrisk_types::{ConfigurationError, UnknownNodeError};

    fn config(endpoint: &str) -> EngineConfig {
        EngineConfig::new(endpoint, 10.0, Threshold::Percentile(90.0), Threshold::Percentile(90.0))
            .with_seed(42)
    }

    #[test]
    fn test_unknown_endpoint_rejected_up_front() {
        let graph = fixtures::abc_chain(0.5);
        assert_eq!(
            RiskEngine::new(&graph, config("nope")).err(),
            Some(EngineError::UnknownNode(UnknownNodeError(NodeId::from("nope"))))
        );
    }

    #[test]
    fn test_bad_buffer_threshold_rejected() {
        let graph = fixtures::abc_chain(0.5);
        let bad = EngineConfig {
            buffer_threshold: -1.0,
            ..config("C")
        };
        assert_eq!(
            RiskEngine::new(&graph, bad).err(),
            Some(EngineError::Configuration(
                ConfigurationError::NonPositiveBufferThreshold(-1.0)
            ))
        );
    }

    #[test]
    fn test_load_graph_rejects_dangling_edge() {
        let data: GraphData = serde_json::from_str(
            r#"{"nodes": [{"id": "a", "kind": "facility"}],
                "edges": [{"source": "a", "target": "b", "relation": "SUPPLIES"}]}"#,
        )
        .unwrap();
        assert!(matches!(load_graph(data), Err(EngineError::InvalidGraph(_))));
    }
}

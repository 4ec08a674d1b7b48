//! Buffer damping of local risk.

use chainrisk_types::{ConfigurationError, Graph, Node, NodeId, NodeIndex};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Damped risk for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub node: NodeId,
    /// Fraction of local risk absorbed by inventory, in [0, 1].
    pub damping_factor: f64,
    /// `local_risk * (1 - damping_factor)`, in [0, 1].
    pub effective_risk: f64,
}

/// Converts inventory buffers into damping factors.
///
/// A buffer at or above `buffer_threshold` days absorbs all local risk;
/// smaller buffers absorb proportionally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampingModel {
    buffer_threshold: f64,
}

impl DampingModel {
    /// Fails unless `buffer_threshold` is finite and strictly positive.
    pub fn new(buffer_threshold: f64) -> Result<Self, ConfigurationError> {
        if !buffer_threshold.is_finite() || buffer_threshold <= 0.0 {
            return Err(ConfigurationError::NonPositiveBufferThreshold(buffer_threshold));
        }
        Ok(Self { buffer_threshold })
    }

    pub fn buffer_threshold(&self) -> f64 {
        self.buffer_threshold
    }

    /// `min(1, buffer / buffer_threshold)`.
    pub fn damping_factor(&self, inventory_buffer: f64) -> f64 {
        (inventory_buffer / self.buffer_threshold).clamp(0.0, 1.0)
    }

    /// Damped profile for a single node.
    pub fn profile(&self, node: &Node) -> RiskProfile {
        let damping_factor = self.damping_factor(node.inventory_buffer);
        RiskProfile {
            node: node.id.clone(),
            damping_factor,
            effective_risk: node.local_risk * (1.0 - damping_factor),
        }
    }

    /// Profiles for every node, in canonical order.
    pub fn apply(&self, graph: &Graph) -> RiskTable {
        let profiles: Vec<RiskProfile> = graph.nodes().iter().map(|n| self.profile(n)).collect();
        let fully_damped = profiles.iter().filter(|p| p.damping_factor >= 1.0).count();
        debug!(
            nodes = profiles.len(),
            fully_damped,
            buffer_threshold = self.buffer_threshold,
            "Computed risk profiles"
        );
        RiskTable { profiles }
    }
}

/// Per-node risk profiles, indexed by [`NodeIndex`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskTable {
    profiles: Vec<RiskProfile>,
}

impl RiskTable {
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile at a canonical index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn profile(&self, idx: NodeIndex) -> &RiskProfile {
        &self.profiles[idx]
    }

    /// Profile by node id.
    pub fn get(&self, id: &str) -> Option<&RiskProfile> {
        self.profiles.iter().find(|p| p.node.as_str() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RiskProfile> {
        self.profiles.iter()
    }

    /// Effective risks in canonical order, ready for simulation.
    pub fn effective_risks(&self) -> Vec<f64> {
        self.profiles.iter().map(|p| p.effective_risk).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainrisk_types::NodeKind;

    #[test]
    fn test_threshold_must_be_positive() {
        assert_eq!(
            DampingModel::new(0.0),
            Err(ConfigurationError::NonPositiveBufferThreshold(0.0))
        );
        assert!(DampingModel::new(-3.0).is_err());
        assert!(DampingModel::new(f64::NAN).is_err());
        assert!(DampingModel::new(f64::INFINITY).is_err());
        assert!(DampingModel::new(0.5).is_ok());
    }

    #[test]
    fn test_full_buffer_absorbs_all_risk() {
        let model = DampingModel::new(10.0).unwrap();
        let node = Node::new("mill", NodeKind::Facility)
            .with_local_risk(0.8)
            .with_inventory_buffer(10.0);
        let profile = model.profile(&node);

        assert_eq!(profile.damping_factor, 1.0);
        assert_eq!(profile.effective_risk, 0.0);
    }

    #[test]
    fn test_partial_and_excess_buffer() {
        let model = DampingModel::new(10.0).unwrap();
        assert_eq!(model.damping_factor(0.0), 0.0);
        assert_eq!(model.damping_factor(2.5), 0.25);
        assert_eq!(model.damping_factor(40.0), 1.0);

        let node = Node::new("n", NodeKind::Facility)
            .with_local_risk(0.8)
            .with_inventory_buffer(5.0);
        assert!((model.profile(&node).effective_risk - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_effective_risk_bounded_and_non_increasing_in_buffer() {
        let model = DampingModel::new(7.0).unwrap();
        for risk in [0.0, 0.1, 0.5, 0.99, 1.0] {
            let mut previous = f64::INFINITY;
            for step in 0..20 {
                let node = Node::new("n", NodeKind::Facility)
                    .with_local_risk(risk)
                    .with_inventory_buffer(step as f64);
                let effective = model.profile(&node).effective_risk;
                assert!((0.0..=1.0).contains(&effective));
                assert!(effective <= previous);
                previous = effective;
            }
        }
    }

    #[test]
    fn test_table_is_indexed_canonically() {
        let graph = chainrisk_test_helpers::TestGraph::new()
            .node("b", 0.5)
            .buffered("a", 0.4, 5.0)
            .build();
        let table = DampingModel::new(10.0).unwrap().apply(&graph);

        assert_eq!(table.len(), 2);
        assert_eq!(table.profile(0).node.as_str(), "b");
        assert_eq!(table.effective_risks(), vec![0.5, 0.2]);
        assert_eq!(table.get("a").map(|p| p.damping_factor), Some(0.5));
        assert!(table.get("zzz").is_none());
    }
}

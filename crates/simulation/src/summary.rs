//! Aggregated simulation results.

use crate::config::CascadePolicy;
use chainrisk_types::NodeId;
use serde::{Deserialize, Serialize};

/// z-score of a two-sided 95% normal interval.
const Z_95: f64 = 1.96;

/// Normal-approximation confidence interval, clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// 95% interval `p ± 1.96 · se`.
    pub fn normal_95(probability: f64, standard_error: f64) -> Self {
        Self {
            lower: (probability - Z_95 * standard_error).clamp(0.0, 1.0),
            upper: (probability + Z_95 * standard_error).clamp(0.0, 1.0),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }
}

/// Observed failure frequencies for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeFrequency {
    pub node: NodeId,
    /// Fraction of runs in which the node failed for any reason.
    pub disruption_probability: f64,
    /// Fraction of runs in which the node failed on its own draw.
    pub local_failure_probability: f64,
}

/// Outcome of a full Monte Carlo simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub endpoint: NodeId,
    pub runs: u64,
    pub endpoint_failures: u64,
    /// `endpoint_failures / runs`.
    pub endpoint_disruption_probability: f64,
    /// `sqrt(p (1 - p) / runs)`.
    pub standard_error: f64,
    pub confidence_interval: ConfidenceInterval,
    /// Per-node frequencies in canonical order.
    pub nodes: Vec<NodeFrequency>,
    /// Seed every run was derived from. Feed it back to replay.
    pub master_seed: u64,
    pub policy: CascadePolicy,
}

impl SimulationSummary {
    /// Frequencies for one node.
    pub fn node(&self, id: &str) -> Option<&NodeFrequency> {
        self.nodes.iter().find(|f| f.node.as_str() == id)
    }

    /// Per-node frequencies, most disrupted first.
    pub fn ranked_nodes(&self) -> Vec<&NodeFrequency> {
        let mut ranked: Vec<&NodeFrequency> = self.nodes.iter().collect();
        // Stable sort keeps canonical order among ties.
        ranked.sort_by(|a, b| b.disruption_probability.total_cmp(&a.disruption_probability));
        ranked
    }
}

/// Integer partial sums, merged by addition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) runs: u64,
    pub(crate) endpoint_failures: u64,
    pub(crate) disrupted: Vec<u64>,
    pub(crate) local: Vec<u64>,
}

impl Tally {
    pub(crate) fn new(nodes: usize) -> Self {
        Self {
            runs: 0,
            endpoint_failures: 0,
            disrupted: vec![0; nodes],
            local: vec![0; nodes],
        }
    }

    pub(crate) fn record(&mut self, outcome: &crate::RunOutcome) {
        self.runs += 1;
        self.endpoint_failures += u64::from(outcome.endpoint_failed);
        for (count, &failed) in self.disrupted.iter_mut().zip(&outcome.failed) {
            *count += u64::from(failed);
        }
        for (count, &failed) in self.local.iter_mut().zip(&outcome.local) {
            *count += u64::from(failed);
        }
    }

    pub(crate) fn merge(mut self, other: Tally) -> Tally {
        self.runs += other.runs;
        self.endpoint_failures += other.endpoint_failures;
        for (a, b) in self.disrupted.iter_mut().zip(other.disrupted) {
            *a += b;
        }
        for (a, b) in self.local.iter_mut().zip(other.local) {
            *a += b;
        }
        self
    }
}

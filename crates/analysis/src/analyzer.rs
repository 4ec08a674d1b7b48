//! Structural analyzer: runs every structural measure over one graph.

use crate::centrality::{betweenness, normalized_in_degree};
use crate::community::{greedy_modularity, CommunityPartition};
use crate::threshold::Threshold;
use crate::traceability::{downstream_impact, shortest_path, upstream_audit, PathResult};
use chainrisk_types::{ConfigurationError, Graph, NodeId, UnknownNodeError};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Classification cutoffs. Both are caller-supplied; there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Cutoff on normalized in-degree for hub classification.
    pub hub_threshold: Threshold,
    /// Cutoff on betweenness for bottleneck classification.
    pub bottleneck_threshold: Threshold,
}

impl AnalysisConfig {
    pub fn new(hub_threshold: Threshold, bottleneck_threshold: Threshold) -> Self {
        Self {
            hub_threshold,
            bottleneck_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.hub_threshold.validate("hub")?;
        self.bottleneck_threshold.validate("bottleneck")
    }
}

/// A node with a real-valued score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeScore {
    pub node: NodeId,
    pub score: f64,
}

/// A node's in-degree, raw and normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InDegreeScore {
    pub node: NodeId,
    pub in_degree: usize,
    pub normalized: f64,
}

/// Output of [`StructuralAnalyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralReport {
    /// Betweenness, highest first.
    pub betweenness: Vec<NodeScore>,
    /// In-degree, highest first.
    pub in_degree: Vec<InDegreeScore>,
    /// Nodes whose betweenness passes the bottleneck threshold, highest first.
    pub bottlenecks: Vec<NodeId>,
    /// Nodes whose normalized in-degree passes the hub threshold, highest first.
    pub hubs: Vec<NodeId>,
    /// Community partition.
    pub communities: CommunityPartition,
}

impl StructuralReport {
    /// Keep only the first `n` entries of each ranking.
    pub fn truncate_rankings(&mut self, n: usize) {
        self.betweenness.truncate(n);
        self.in_degree.truncate(n);
    }
}

/// Read-only structural analysis over a borrowed graph.
#[derive(Debug, Clone, Copy)]
pub struct StructuralAnalyzer<'g> {
    graph: &'g Graph,
}

impl<'g> StructuralAnalyzer<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Betweenness per node, ranked highest first.
    pub fn betweenness(&self) -> Vec<NodeScore> {
        ranked_scores(self.graph, &betweenness(self.graph))
    }

    /// In-degree per node, ranked highest first.
    pub fn in_degree(&self) -> Vec<InDegreeScore> {
        self.ranked_in_degree(&normalized_in_degree(self.graph))
    }

    /// Community partition by greedy modularity.
    pub fn communities(&self) -> CommunityPartition {
        greedy_modularity(self.graph)
    }

    /// Minimum-hop path between two nodes.
    pub fn shortest_path(&self, from: &str, to: &str) -> Result<PathResult, UnknownNodeError> {
        shortest_path(self.graph, from, to)
    }

    /// All ancestors of a node.
    pub fn upstream_audit(&self, id: &str) -> Result<Vec<NodeId>, UnknownNodeError> {
        upstream_audit(self.graph, id)
    }

    /// All descendants of a node.
    pub fn downstream_impact(&self, id: &str) -> Result<Vec<NodeId>, UnknownNodeError> {
        downstream_impact(self.graph, id)
    }

    /// Run every structural measure and classify hubs and bottlenecks.
    ///
    /// An empty graph yields an empty report.
    pub fn analyze(&self, config: &AnalysisConfig) -> Result<StructuralReport, ConfigurationError> {
        config.validate()?;

        let started = Instant::now();
        let bc = betweenness(self.graph);
        chainrisk_metrics::record_stage_latency("betweenness", started.elapsed().as_secs_f64());

        let normalized = normalized_in_degree(self.graph);

        let started = Instant::now();
        let communities = greedy_modularity(self.graph);
        chainrisk_metrics::record_stage_latency("communities", started.elapsed().as_secs_f64());
        chainrisk_metrics::set_community_count(communities.len());

        let bottlenecks = self.classify(&bc, &config.bottleneck_threshold);
        let hubs = self.classify(&normalized, &config.hub_threshold);

        debug!(
            bottleneck_cutoff = config.bottleneck_threshold.cutoff(&bc),
            hub_cutoff = config.hub_threshold.cutoff(&normalized),
            "Classification cutoffs"
        );
        info!(
            nodes = self.graph.len(),
            edges = self.graph.edge_count(),
            isolated = (0..self.graph.len())
                .filter(|&i| self.graph.is_isolated(i))
                .count(),
            bottlenecks = bottlenecks.len(),
            hubs = hubs.len(),
            communities = communities.len(),
            modularity = communities.modularity,
            "Structural analysis complete"
        );

        Ok(StructuralReport {
            betweenness: ranked_scores(self.graph, &bc),
            in_degree: self.ranked_in_degree(&normalized),
            bottlenecks,
            hubs,
            communities,
        })
    }

    /// Raw in-degree ranking; normalized values ride along.
    fn ranked_in_degree(&self, normalized: &[f64]) -> Vec<InDegreeScore> {
        let raw: Vec<f64> = (0..self.graph.len())
            .map(|i| self.graph.in_degree(i) as f64)
            .collect();
        rank(&raw)
            .into_iter()
            .map(|i| InDegreeScore {
                node: self.graph.id(i).clone(),
                in_degree: self.graph.in_degree(i),
                normalized: normalized[i],
            })
            .collect()
    }

    /// Selected ids, highest score first.
    fn classify(&self, scores: &[f64], threshold: &Threshold) -> Vec<NodeId> {
        let selected = threshold.select(scores);
        rank(scores)
            .into_iter()
            .filter(|i| selected.binary_search(i).is_ok())
            .map(|i| self.graph.id(i).clone())
            .collect()
    }
}

/// Pair per-node scores (indexed like the graph) with their ids, highest
/// first, ties by canonical order.
pub fn ranked_scores(graph: &Graph, scores: &[f64]) -> Vec<NodeScore> {
    rank(scores)
        .into_iter()
        .map(|i| NodeScore {
            node: graph.id(i).clone(),
            score: scores[i],
        })
        .collect()
}

/// Indices sorted by score descending, ties by canonical order.
fn rank(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    order
}

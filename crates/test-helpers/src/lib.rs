//! Test helpers for chainrisk: graph builders and canned fixtures.
//!
//! # Example
//!
//! ```rust
//! use chainrisk_test_helpers::{TestGraph, fixtures};
//!
//! // Hand-built graph with explicit risks
//! let graph = TestGraph::new()
//!     .node("raw", 0.3)
//!     .node("plant", 0.1)
//!     .endpoint("dc")
//!     .edge("raw", "plant")
//!     .edge("plant", "dc")
//!     .build();
//! assert_eq!(graph.len(), 3);
//!
//! // Canned fixture
//! let chain = fixtures::abc_chain(0.5);
//! assert_eq!(chain.edge_count(), 2);
//! ```

pub mod fixtures;

use chainrisk_types::{Edge, Graph, Node, NodeKind};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Fluent builder for small test graphs.
///
/// Nodes are added in call order, which is the canonical order of the
/// resulting graph.
#[derive(Debug, Default, Clone)]
pub struct TestGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl TestGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a facility with the given local risk.
    pub fn node(mut self, id: &str, local_risk: f64) -> Self {
        self.nodes
            .push(Node::new(id, NodeKind::Facility).with_local_risk(local_risk));
        self
    }

    /// Add a facility with local risk and inventory buffer (days).
    pub fn buffered(mut self, id: &str, local_risk: f64, buffer_days: f64) -> Self {
        self.nodes.push(
            Node::new(id, NodeKind::Facility)
                .with_local_risk(local_risk)
                .with_inventory_buffer(buffer_days),
        );
        self
    }

    /// Add a zero-risk endpoint.
    pub fn endpoint(mut self, id: &str) -> Self {
        self.nodes.push(Node::new(id, NodeKind::Endpoint));
        self
    }

    /// Add a fully specified node.
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a SUPPLIES edge.
    pub fn edge(mut self, source: &str, target: &str) -> Self {
        self.edges.push(Edge::supplies(source, target));
        self
    }

    /// Add a fully specified edge.
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Build the graph.
    ///
    /// # Panics
    ///
    /// Panics if the nodes or edges are invalid.
    pub fn build(self) -> Graph {
        Graph::new(self.nodes, self.edges).expect("test graph should be valid")
    }

    /// Generate a random layered DAG with `size` nodes.
    ///
    /// Node `i` is named `n{i}`, draws a local risk in [0, `max_risk`] and
    /// supplies each later node with probability `edge_probability`. The last
    /// node is an endpoint. Same seed, same graph.
    pub fn random_dag(size: usize, edge_probability: f64, max_risk: f64, seed: u64) -> Graph {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_mul(0x517cc1b727220a95));
        let mut builder = TestGraph::new();

        for i in 0..size {
            let id = format!("n{i}");
            if i + 1 == size {
                builder = builder.endpoint(&id);
            } else {
                let risk = rng.gen::<f64>() * max_risk;
                builder = builder.node(&id, risk);
            }
        }
        for i in 0..size {
            for j in (i + 1)..size {
                if rng.gen::<f64>() < edge_probability {
                    builder = builder.edge(&format!("n{i}"), &format!("n{j}"));
                }
            }
        }

        builder.build()
    }
}

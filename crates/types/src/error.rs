//! Error taxonomy shared by every analysis stage.

use crate::NodeId;

/// Malformed graph input, raised eagerly when a [`Graph`](crate::Graph) is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidGraphError {
    /// Two nodes share one id.
    #[error("Duplicate node id `{0}`")]
    DuplicateNode(NodeId),

    /// An edge names a node that is not in the graph.
    #[error("Edge {from} -> {to} references missing node `{missing}`")]
    DanglingEdge {
        /// Edge source.
        from: NodeId,
        /// Edge target.
        to: NodeId,
        /// The endpoint that does not exist.
        missing: NodeId,
    },

    /// `local_risk` outside [0, 1].
    #[error("Node `{node}` has local_risk {value} outside [0, 1]")]
    RiskOutOfRange {
        /// Offending node.
        node: NodeId,
        /// Offending value.
        value: f64,
    },

    /// Negative `inventory_buffer`.
    #[error("Node `{node}` has negative inventory_buffer {value}")]
    NegativeBuffer {
        /// Offending node.
        node: NodeId,
        /// Offending value.
        value: f64,
    },

    /// NaN or infinite numeric field.
    #[error("Node `{node}` has non-finite {field}")]
    NonFinite {
        /// Offending node.
        node: NodeId,
        /// Name of the field.
        field: &'static str,
    },
}

/// A query referenced a node id absent from the graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown node `{0}`")]
pub struct UnknownNodeError(pub NodeId);

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("buffer_threshold must be strictly positive and finite, got {0}")]
    NonPositiveBufferThreshold(f64),

    #[error("run_count must be at least 1")]
    ZeroRunCount,

    #[error("{name} threshold {value} is out of range")]
    InvalidThreshold {
        /// Which threshold.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    #[error("Risk table has {actual} entries but the graph has {expected} nodes")]
    RiskTableMismatch {
        /// Node count of the graph.
        expected: usize,
        /// Entries supplied.
        actual: usize,
    },

    #[error("Effective risk {value} for node `{node}` is outside [0, 1]")]
    EffectiveRiskOutOfRange {
        /// Offending node.
        node: NodeId,
        /// Offending value.
        value: f64,
    },

    #[error("Thread count must be at least 1")]
    ZeroThreads,

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),
}

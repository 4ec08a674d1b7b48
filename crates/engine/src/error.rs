//! Engine error umbrella.

use chainrisk_simulation::SimulationError;
use chainrisk_types::{ConfigurationError, InvalidGraphError, UnknownNodeError};

/// Any failure surfaced by [`RiskEngine`](crate::RiskEngine).
///
/// Every variant is raised before computation starts; a failed call never
/// returns partial results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The graph is malformed.
    #[error("Invalid graph: {0}")]
    InvalidGraph(#[from] InvalidGraphError),

    /// A node id in the request does not exist.
    #[error(transparent)]
    UnknownNode(#[from] UnknownNodeError),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl From<SimulationError> for EngineError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::UnknownNode(e) => EngineError::UnknownNode(e),
            SimulationError::Configuration(e) => EngineError::Configuration(e),
        }
    }
}

impl EngineError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidGraph(_) => "invalid_graph",
            EngineError::UnknownNode(_) => "unknown_node",
            EngineError::Configuration(_) => "configuration",
        }
    }
}

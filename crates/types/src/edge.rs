//! Relationships between supply-chain entities.

use crate::node::{AttributeValue, Attributes};
use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of relationship an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    /// Source ships goods or materials to the target.
    Supplies,
    /// Source produces components consumed by the target.
    Produces,
    /// Source performs final assembly for the target.
    FinalAssembly,
    /// Unclassified relationship.
    Other,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Relation::Supplies => "SUPPLIES",
            Relation::Produces => "PRODUCES",
            Relation::FinalAssembly => "FINAL_ASSEMBLY",
            Relation::Other => "OTHER",
        };
        f.write_str(name)
    }
}

/// A directed relationship: `source` feeds `target`.
///
/// Attributes (lead time, volume, material...) are not read by any analysis
/// but are carried through the model unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Upstream entity.
    pub source: NodeId,
    /// Downstream entity.
    pub target: NodeId,
    /// Relationship kind.
    pub relation: Relation,
    /// Optional metadata.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl Edge {
    /// Create an edge without attributes.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, relation: Relation) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation,
            attributes: Attributes::new(),
        }
    }

    /// Shorthand for a `SUPPLIES` edge.
    pub fn supplies(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self::new(source, target, Relation::Supplies)
    }

    /// Attach a metadata attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

//! Supply-chain entities.

use crate::{InvalidGraphError, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Arbitrary key→value metadata attached to nodes and edges.
///
/// A `BTreeMap` keeps serialization order stable.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Role of an entity in the supply chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Raw material or component supplier.
    Supplier,
    /// Intermediate processing or manufacturing site.
    Facility,
    /// Terminal node whose disruption is measured (distribution center, brand).
    Endpoint,
    /// Anything else.
    Other,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Supplier => "supplier",
            NodeKind::Facility => "facility",
            NodeKind::Endpoint => "endpoint",
            NodeKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// A metadata value: any JSON value, so integers, nulls and nested
/// objects survive a load and save unchanged.
pub type AttributeValue = serde_json::Value;

/// A supply-chain entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Canonical identifier, unique within a graph.
    pub id: NodeId,
    /// Role in the supply chain.
    pub kind: NodeKind,
    /// Free-form metadata (location, capacity, certifications...).
    #[serde(default)]
    pub attributes: Attributes,
    /// Days of stock on hand. Must be non-negative.
    #[serde(default)]
    pub inventory_buffer: f64,
    /// Probability in [0, 1] that the node fails independently of cascades.
    #[serde(default)]
    pub local_risk: f64,
}

impl Node {
    /// Create a node with no buffer, no risk and no attributes.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            attributes: Attributes::new(),
            inventory_buffer: 0.0,
            local_risk: 0.0,
        }
    }

    /// Set the local (independent) failure probability.
    pub fn with_local_risk(mut self, local_risk: f64) -> Self {
        self.local_risk = local_risk;
        self
    }

    /// Set the inventory buffer in days.
    pub fn with_inventory_buffer(mut self, days: f64) -> Self {
        self.inventory_buffer = days;
        self
    }

    /// Attach a metadata attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Check the numeric invariants of this node.
    pub fn validate(&self) -> Result<(), InvalidGraphError> {
        if !self.local_risk.is_finite() {
            return Err(InvalidGraphError::NonFinite {
                node: self.id.clone(),
                field: "local_risk",
            });
        }
        if !self.inventory_buffer.is_finite() {
            return Err(InvalidGraphError::NonFinite {
                node: self.id.clone(),
                field: "inventory_buffer",
            });
        }
        if !(0.0..=1.0).contains(&self.local_risk) {
            return Err(InvalidGraphError::RiskOutOfRange {
                node: self.id.clone(),
                value: self.local_risk,
            });
        }
        if self.inventory_buffer < 0.0 {
            return Err(InvalidGraphError::NegativeBuffer {
                node: self.id.clone(),
                value: self.inventory_buffer,
            });
        }
        Ok(())
    }
}

//! Identifier newtypes.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Canonical identifier of a supply-chain entity.
///
/// Produced by entity resolution upstream of the engine; two raw names that
/// resolve to the same entity share one `NodeId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new node id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_node_id_borrow_lookup() {
        let mut map = HashMap::new();
        map.insert(NodeId::from("Sunrise Textiles"), 1);

        // Borrow<str> allows lookups without allocating a NodeId
        assert_eq!(map.get("Sunrise Textiles"), Some(&1));
        assert_eq!(map.get("Brand A DC"), None);
    }

    #[test]
    fn test_node_id_serializes_as_plain_string() {
        let id = NodeId::new("Foxconn Facility No. 3");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Foxconn Facility No. 3\"");

        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

//! Immutable directed multigraph.
//!
//! A [`Graph`] is validated once when it is built and never mutated
//! afterwards. Analysis code addresses nodes through dense [`NodeIndex`]
//! values; adjacency is precomputed in both directions.

use crate::{Edge, InvalidGraphError, Node, NodeId, NodeIndex, UnknownNodeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serialized form of a [`Graph`].
///
/// Deserializing a `Graph` goes through this type and then through
/// [`Graph::new`], so invalid input is rejected at load time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// A validated supply-chain graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GraphData", into = "GraphData")]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// id -> dense index.
    index: HashMap<NodeId, NodeIndex>,
    /// Distinct downstream neighbours per node, ascending.
    successors: Vec<Vec<NodeIndex>>,
    /// Distinct upstream neighbours per node, ascending.
    predecessors: Vec<Vec<NodeIndex>>,
    /// Incoming edge count per node, parallel edges counted individually.
    in_degree: Vec<usize>,
    /// Outgoing edge count per node, parallel edges counted individually.
    out_degree: Vec<usize>,
}

impl Graph {
    /// Build and validate a graph.
    ///
    /// Fails with [`InvalidGraphError`] on duplicate ids, edges referencing
    /// missing nodes, or node attributes outside their declared ranges.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, InvalidGraphError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            node.validate()?;
            if index.insert(node.id.clone(), i).is_some() {
                return Err(InvalidGraphError::DuplicateNode(node.id.clone()));
            }
        }

        let n = nodes.len();
        let mut successors = vec![Vec::new(); n];
        let mut predecessors = vec![Vec::new(); n];
        let mut in_degree = vec![0; n];
        let mut out_degree = vec![0; n];

        for edge in &edges {
            let lookup = |id: &NodeId| {
                index
                    .get(id)
                    .copied()
                    .ok_or_else(|| InvalidGraphError::DanglingEdge {
                        from: edge.source.clone(),
                        to: edge.target.clone(),
                        missing: id.clone(),
                    })
            };
            let s = lookup(&edge.source)?;
            let t = lookup(&edge.target)?;

            successors[s].push(t);
            predecessors[t].push(s);
            out_degree[s] += 1;
            in_degree[t] += 1;
        }

        for list in successors.iter_mut().chain(predecessors.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }

        Ok(Self {
            nodes,
            edges,
            index,
            successors,
            predecessors,
            in_degree,
            out_degree,
        })
    }

    /// A graph with no nodes.
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
            in_degree: Vec::new(),
            out_degree: Vec::new(),
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges, parallel edges counted individually.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes in canonical order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node at a dense index.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len()`.
    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx]
    }

    /// Id of the node at a dense index.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len()`.
    pub fn id(&self, idx: NodeIndex) -> &NodeId {
        &self.nodes[idx].id
    }

    /// Look up a node by id.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Dense index of a node id.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Dense index of a node id, failing with [`UnknownNodeError`].
    pub fn require(&self, id: &str) -> Result<NodeIndex, UnknownNodeError> {
        self.index_of(id)
            .ok_or_else(|| UnknownNodeError(NodeId::from(id)))
    }

    /// Distinct direct downstream neighbours, ascending by index.
    pub fn successors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.successors[idx]
    }

    /// Distinct direct upstream neighbours, ascending by index.
    pub fn predecessors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.predecessors[idx]
    }

    /// Incoming edge count (parallel edges counted individually).
    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.in_degree[idx]
    }

    /// Outgoing edge count (parallel edges counted individually).
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.out_degree[idx]
    }

    /// Whether a node has no incident edges at all.
    pub fn is_isolated(&self, idx: NodeIndex) -> bool {
        self.in_degree[idx] == 0 && self.out_degree[idx] == 0
    }

    /// Kahn topological order.
    ///
    /// Returns `None` if the graph has a cycle (self-loops included).
    /// Ties are broken by canonical node order.
    pub fn topological_order(&self) -> Option<Vec<NodeIndex>> {
        let n = self.len();
        let mut remaining: Vec<usize> = (0..n).map(|i| self.predecessors[i].len()).collect();
        let mut ready: std::collections::BTreeSet<NodeIndex> =
            (0..n).filter(|&i| remaining[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(next) = ready.pop_first() {
            order.push(next);
            for &succ in &self.successors[next] {
                remaining[succ] -= 1;
                if remaining[succ] == 0 {
                    ready.insert(succ);
                }
            }
        }

        (order.len() == n).then_some(order)
    }
}

impl TryFrom<GraphData> for Graph {
    type Error = InvalidGraphError;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        Graph::new(data.nodes, data.edges)
    }
}

impl From<Graph> for GraphData {
    fn from(graph: Graph) -> Self {
        GraphData {
            nodes: graph.nodes,
            edges: graph.edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeKind, Relation};

    fn node(id: &str) -> Node {
        Node::new(id, NodeKind::Facility)
    }

    #[test]
    fn test_adjacency_dedups_parallel_edges() {
        let graph = Graph::new(
            vec![node("a"), node("b")],
            vec![
                Edge::supplies("a", "b"),
                Edge::new("a", "b", Relation::Produces),
            ],
        )
        .unwrap();

        assert_eq!(graph.successors(0), &[1]);
        assert_eq!(graph.predecessors(1), &[0]);
        // Degree keeps multiplicity
        assert_eq!(graph.in_degree(1), 2);
        assert_eq!(graph.out_degree(0), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let err = Graph::new(vec![node("a"), node("a")], vec![]).unwrap_err();
        assert_eq!(err, InvalidGraphError::DuplicateNode(NodeId::from("a")));
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let err = Graph::new(vec![node("a")], vec![Edge::supplies("a", "ghost")]).unwrap_err();
        assert!(matches!(
            err,
            InvalidGraphError::DanglingEdge { ref missing, .. } if missing.as_str() == "ghost"
        ));
    }

    #[test]
    fn test_invalid_node_rejected_before_edges() {
        let err = Graph::new(
            vec![node("a").with_local_risk(-0.1)],
            vec![Edge::supplies("a", "missing")],
        )
        .unwrap_err();
        assert!(matches!(err, InvalidGraphError::RiskOutOfRange { .. }));
    }

    #[test]
    fn test_require_unknown_node() {
        let graph = Graph::new(vec![node("a")], vec![]).unwrap();
        assert_eq!(graph.require("a"), Ok(0));
        assert_eq!(
            graph.require("b"),
            Err(UnknownNodeError(NodeId::from("b")))
        );
    }

    #[test]
    fn test_topological_order_dag_and_cycle() {
        let dag = Graph::new(
            vec![node("c"), node("a"), node("b")],
            vec![Edge::supplies("a", "b"), Edge::supplies("b", "c")],
        )
        .unwrap();
        assert_eq!(dag.topological_order(), Some(vec![1, 2, 0]));

        let cyclic = Graph::new(
            vec![node("a"), node("b")],
            vec![Edge::supplies("a", "b"), Edge::supplies("b", "a")],
        )
        .unwrap();
        assert_eq!(cyclic.topological_order(), None);

        let self_loop = Graph::new(vec![node("a")], vec![Edge::supplies("a", "a")]).unwrap();
        assert_eq!(self_loop.topological_order(), None);
    }

    #[test]
    fn test_json_round_trip_preserves_edge_attributes() {
        let graph = Graph::new(
            vec![node("a"), node("b")],
            vec![Edge::supplies("a", "b")
                .with_attribute("lead_time_days", 14.0)
                .with_attribute("material", "cotton yarn")],
        )
        .unwrap();

        let json = serde_json::to_string(&graph).unwrap();
        let back: Graph = serde_json::from_str(&json).unwrap();

        assert_eq!(back.edges(), graph.edges());
        assert_eq!(back.nodes(), graph.nodes());
    }

    #[test]
    fn test_edge_attributes_round_trip_unchanged() {
        let json = r#"{"nodes":[{"id":"a","kind":"supplier"},{"id":"b","kind":"facility"}],"edges":[{"source":"a","target":"b","relation":"SUPPLIES","attributes":{"capacity":{"unit":"t","units":1200},"lead_time_days":14,"volume":null}}]}"#;
        let graph: Graph = serde_json::from_str(json).unwrap();

        let attributes = serde_json::to_string(&graph.edges()[0].attributes).unwrap();
        assert_eq!(
            attributes,
            r#"{"capacity":{"unit":"t","units":1200},"lead_time_days":14,"volume":null}"#
        );
    }

    #[test]
    fn test_json_load_validates() {
        let json = r#"{"nodes":[{"id":"a","kind":"supplier","local_risk":2.0}],"edges":[]}"#;
        let result: Result<Graph, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}

//! Community detection by greedy modularity agglomeration.
//!
//! Works on the undirected simple view of the graph: two distinct nodes are
//! adjacent if an edge runs between them in either direction, self-loops and
//! parallel edges are ignored. Starting from singletons, the pair of adjacent
//! communities with the largest modularity gain is merged until no merge
//! improves modularity (Clauset–Newman–Moore).
//!
//! Community keys are the smallest canonical index of their members and
//! candidates are scanned in ascending key order, so equal gains always
//! resolve the same way.

use chainrisk_types::{Graph, NodeId, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A partition of the graph into disjoint communities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityPartition {
    /// Communities ordered by size (largest first), then by first member.
    /// Members are in canonical node order.
    pub communities: Vec<Vec<NodeId>>,
    /// Newman modularity of the partition on the undirected view.
    pub modularity: f64,
}

impl CommunityPartition {
    /// Number of communities.
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    /// Whether the partition is empty (empty graph).
    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// Communities with more than one member.
    pub fn non_trivial(&self) -> impl Iterator<Item = &Vec<NodeId>> {
        self.communities.iter().filter(|c| c.len() > 1)
    }

    /// The community containing `id`, if any.
    pub fn community_of(&self, id: &str) -> Option<usize> {
        self.communities
            .iter()
            .position(|members| members.iter().any(|m| m.as_str() == id))
    }
}

/// Undirected simple adjacency: sorted neighbour lists, no self-loops.
fn undirected_adjacency(graph: &Graph) -> Vec<Vec<NodeIndex>> {
    (0..graph.len())
        .map(|v| {
            let mut neighbours: Vec<NodeIndex> = graph
                .successors(v)
                .iter()
                .chain(graph.predecessors(v))
                .copied()
                .filter(|&u| u != v)
                .collect();
            neighbours.sort_unstable();
            neighbours.dedup();
            neighbours
        })
        .collect()
}

/// Detect communities.
pub fn greedy_modularity(graph: &Graph) -> CommunityPartition {
    let n = graph.len();
    let adjacency = undirected_adjacency(graph);
    let degree: Vec<usize> = adjacency.iter().map(Vec::len).collect();
    let edge_ends: usize = degree.iter().sum();

    // community -> its representative index for every node
    let mut membership: Vec<NodeIndex> = (0..n).collect();

    if edge_ends > 0 {
        let two_m = edge_ends as f64;

        // e[i][j]: fraction of edge ends joining community i to community j.
        let mut e: BTreeMap<NodeIndex, BTreeMap<NodeIndex, f64>> = BTreeMap::new();
        // a[i]: fraction of edge ends attached to community i.
        let mut a: BTreeMap<NodeIndex, f64> = BTreeMap::new();
        for v in 0..n {
            a.insert(v, degree[v] as f64 / two_m);
            let row = e.entry(v).or_default();
            for &u in &adjacency[v] {
                row.insert(u, 1.0 / two_m);
            }
        }

        loop {
            let mut best: Option<(f64, NodeIndex, NodeIndex)> = None;
            for (&i, row) in &e {
                for (&j, &e_ij) in row.range(i + 1..) {
                    let gain = 2.0 * (e_ij - a[&i] * a[&j]);
                    if best.map_or(true, |(g, _, _)| gain > g) {
                        best = Some((gain, i, j));
                    }
                }
            }

            let Some((gain, keep, absorb)) = best else {
                break;
            };
            if gain <= 0.0 {
                break;
            }

            // Fold `absorb` into `keep`.
            let absorbed_row = e.remove(&absorb).unwrap_or_default();
            for (k, e_jk) in absorbed_row {
                if k == keep {
                    continue;
                }
                if let Some(row_k) = e.get_mut(&k) {
                    row_k.remove(&absorb);
                    *row_k.entry(keep).or_insert(0.0) += e_jk;
                }
                *e.entry(keep).or_default().entry(k).or_insert(0.0) += e_jk;
            }
            if let Some(row_keep) = e.get_mut(&keep) {
                row_keep.remove(&absorb);
            }
            let a_absorb = a.remove(&absorb).unwrap_or(0.0);
            *a.entry(keep).or_insert(0.0) += a_absorb;

            for m in membership.iter_mut() {
                if *m == absorb {
                    *m = keep;
                }
            }
        }
    }

    let modularity = modularity(&adjacency, &membership, edge_ends);

    let mut groups: BTreeMap<NodeIndex, Vec<NodeIndex>> = BTreeMap::new();
    for (v, &c) in membership.iter().enumerate() {
        groups.entry(c).or_default().push(v);
    }
    let mut ordered: Vec<Vec<NodeIndex>> = groups.into_values().collect();
    ordered.sort_by(|x, y| y.len().cmp(&x.len()).then(x[0].cmp(&y[0])));

    CommunityPartition {
        communities: ordered
            .into_iter()
            .map(|members| members.into_iter().map(|v| graph.id(v).clone()).collect())
            .collect(),
        modularity,
    }
}

/// Q = Σ_c [ L_c / m − (d_c / 2m)² ].
fn modularity(adjacency: &[Vec<NodeIndex>], membership: &[NodeIndex], edge_ends: usize) -> f64 {
    if edge_ends == 0 {
        return 0.0;
    }
    let two_m = edge_ends as f64;
    let mut internal_ends: BTreeMap<NodeIndex, f64> = BTreeMap::new();
    let mut degree_sum: BTreeMap<NodeIndex, f64> = BTreeMap::new();

    for (v, neighbours) in adjacency.iter().enumerate() {
        let c = membership[v];
        *degree_sum.entry(c).or_insert(0.0) += neighbours.len() as f64;
        let internal = neighbours.iter().filter(|&&u| membership[u] == c).count();
        *internal_ends.entry(c).or_insert(0.0) += internal as f64;
    }

    degree_sum
        .iter()
        .map(|(c, &d)| {
            let l = internal_ends.get(c).copied().unwrap_or(0.0);
            l / two_m - (d / two_m).powi(2)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainrisk_types::{Edge, Node, NodeKind};

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> Graph {
        Graph::new(
            ids.iter().map(|id| Node::new(*id, NodeKind::Facility)).collect(),
            edges.iter().map(|(s, t)| Edge::supplies(*s, *t)).collect(),
        )
        .unwrap()
    }

    fn names(members: &[NodeId]) -> Vec<&str> {
        members.iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn test_two_triangles_joined_by_bridge() {
        let g = graph(
            &["a1", "a2", "a3", "b1", "b2", "b3"],
            &[
                ("a1", "a2"),
                ("a2", "a3"),
                ("a3", "a1"),
                ("b1", "b2"),
                ("b2", "b3"),
                ("b3", "b1"),
                ("a3", "b1"),
            ],
        );
        let partition = greedy_modularity(&g);

        assert_eq!(partition.len(), 2);
        assert_eq!(names(&partition.communities[0]), vec!["a1", "a2", "a3"]);
        assert_eq!(names(&partition.communities[1]), vec!["b1", "b2", "b3"]);
        // 2 * (3/7 - (7/14)^2) = 6/7 - 1/2
        assert!((partition.modularity - (6.0 / 7.0 - 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_isolated_nodes_are_singletons() {
        let g = graph(&["a", "b", "lone"], &[("a", "b")]);
        let partition = greedy_modularity(&g);

        assert_eq!(partition.len(), 2);
        assert_eq!(names(&partition.communities[0]), vec!["a", "b"]);
        assert_eq!(names(&partition.communities[1]), vec!["lone"]);
        assert_eq!(partition.non_trivial().count(), 1);
    }

    #[test]
    fn test_edgeless_graph_all_singletons() {
        let g = graph(&["x", "y", "z"], &[]);
        let partition = greedy_modularity(&g);

        assert_eq!(partition.len(), 3);
        assert_eq!(partition.modularity, 0.0);
        assert!(partition.communities.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_empty_graph() {
        let partition = greedy_modularity(&Graph::empty());
        assert!(partition.is_empty());
        assert_eq!(partition.modularity, 0.0);
    }

    #[test]
    fn test_partition_covers_every_node_once() {
        let g = graph(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("d", "e"), ("e", "d"), ("c", "c")],
        );
        let partition = greedy_modularity(&g);

        let mut seen: Vec<&str> = partition
            .communities
            .iter()
            .flat_map(|c| names(c))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(partition.community_of("d"), partition.community_of("e"));
        assert_ne!(partition.community_of("a"), partition.community_of("d"));
    }

    #[test]
    fn test_deterministic_across_calls() {
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")],
        );
        assert_eq!(greedy_modularity(&g), greedy_modularity(&g));
    }
}

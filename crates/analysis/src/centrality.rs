//! Centrality measures.
//!
//! - **Betweenness**: Brandes' accumulation over breadth-first searches from
//!   every node. Edges are unweighted, so each BFS yields all shortest paths
//!   from its source; dependencies are split proportionally to path counts.
//! - **In-degree**: incoming edge count, parallel edges counted individually.

use chainrisk_types::{Graph, NodeIndex};
use std::collections::VecDeque;

/// Normalized betweenness centrality per node, indexed by [`NodeIndex`].
///
/// Scores are scaled by `1 / ((n - 1)(n - 2))`, the number of ordered pairs
/// that exclude the node itself, so every score lies in [0, 1]. Graphs with
/// two or fewer nodes have no intermediate positions and score 0 everywhere.
pub fn betweenness(graph: &Graph) -> Vec<f64> {
    let n = graph.len();
    let mut centrality = vec![0.0; n];
    if n <= 2 {
        return centrality;
    }

    // Per-source scratch space, reused across sources.
    let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);
    let mut preds: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0f64; n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut delta = vec![0.0f64; n];
    let mut queue = VecDeque::with_capacity(n);

    for s in 0..n {
        stack.clear();
        for p in preds.iter_mut() {
            p.clear();
        }
        sigma.iter_mut().for_each(|x| *x = 0.0);
        dist.iter_mut().for_each(|d| *d = None);
        delta.iter_mut().for_each(|x| *x = 0.0);

        sigma[s] = 1.0;
        dist[s] = Some(0);
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let next = dist[v].map_or(0, |d| d + 1);
            for &w in graph.successors(v) {
                if dist[w].is_none() {
                    dist[w] = Some(next);
                    queue.push_back(w);
                }
                if dist[w] == Some(next) {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        // Dependencies accumulate in reverse BFS order.
        while let Some(w) = stack.pop() {
            let coefficient = (1.0 + delta[w]) / sigma[w];
            for &v in &preds[w] {
                delta[v] += sigma[v] * coefficient;
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
    for c in centrality.iter_mut() {
        *c *= scale;
    }
    centrality
}

/// Raw in-degree per node.
pub fn in_degree(graph: &Graph) -> Vec<usize> {
    (0..graph.len()).map(|i| graph.in_degree(i)).collect()
}

/// In-degree normalized by `n - 1`; zero for graphs with at most one node.
///
/// Parallel edges can push the value above 1.
pub fn normalized_in_degree(graph: &Graph) -> Vec<f64> {
    let n = graph.len();
    if n <= 1 {
        return vec![0.0; n];
    }
    let denom = (n - 1) as f64;
    (0..n).map(|i| graph.in_degree(i) as f64 / denom).collect()
}

//! Traceability queries: shortest paths and upstream/downstream closure.

use chainrisk_types::{Graph, NodeId, NodeIndex, UnknownNodeError};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Result of a shortest-path query.
///
/// Unreachable targets produce an explicit [`PathResult::NoPath`] rather than
/// an error or an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "path", rename_all = "snake_case")]
pub enum PathResult {
    /// Node ids from source to target inclusive.
    Found(Vec<NodeId>),
    /// Target is not reachable from source.
    NoPath,
}

impl PathResult {
    /// Whether a path exists.
    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found(_))
    }

    /// Number of edges on the path.
    pub fn hops(&self) -> Option<usize> {
        match self {
            PathResult::Found(path) => Some(path.len().saturating_sub(1)),
            PathResult::NoPath => None,
        }
    }

    /// The path, if found.
    pub fn path(&self) -> Option<&[NodeId]> {
        match self {
            PathResult::Found(path) => Some(path),
            PathResult::NoPath => None,
        }
    }
}

/// Minimum-hop path from `from` to `to`.
///
/// Among equally short paths the one through lower canonical indices wins.
pub fn shortest_path(graph: &Graph, from: &str, to: &str) -> Result<PathResult, UnknownNodeError> {
    let source = graph.require(from)?;
    let target = graph.require(to)?;

    if source == target {
        return Ok(PathResult::Found(vec![graph.id(source).clone()]));
    }

    let mut parent: Vec<Option<NodeIndex>> = vec![None; graph.len()];
    let mut visited = vec![false; graph.len()];
    let mut queue = VecDeque::new();
    visited[source] = true;
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        for &w in graph.successors(v) {
            if visited[w] {
                continue;
            }
            visited[w] = true;
            parent[w] = Some(v);
            if w == target {
                return Ok(PathResult::Found(unwind(graph, &parent, target)));
            }
            queue.push_back(w);
        }
    }

    Ok(PathResult::NoPath)
}

fn unwind(graph: &Graph, parent: &[Option<NodeIndex>], target: NodeIndex) -> Vec<NodeId> {
    let mut path = vec![graph.id(target).clone()];
    let mut cursor = target;
    while let Some(p) = parent[cursor] {
        path.push(graph.id(p).clone());
        cursor = p;
    }
    path.reverse();
    path
}

/// Direction of a reachability closure.
#[derive(Debug, Clone, Copy)]
enum Direction {
    Upstream,
    Downstream,
}

/// Indices reachable from `start` (excluding `start`), ascending.
fn closure(graph: &Graph, start: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
    let mut visited = vec![false; graph.len()];
    let mut queue = VecDeque::from([start]);
    visited[start] = true;

    while let Some(v) = queue.pop_front() {
        let next = match direction {
            Direction::Upstream => graph.predecessors(v),
            Direction::Downstream => graph.successors(v),
        };
        for &w in next {
            if !visited[w] {
                visited[w] = true;
                queue.push_back(w);
            }
        }
    }

    visited[start] = false;
    visited
        .iter()
        .enumerate()
        .filter_map(|(i, &seen)| seen.then_some(i))
        .collect()
}

/// Every ancestor of `id`: the nodes that ultimately feed it.
///
/// The queried node itself is excluded, even when it sits on a cycle.
/// Results are in canonical node order.
pub fn upstream_audit(graph: &Graph, id: &str) -> Result<Vec<NodeId>, UnknownNodeError> {
    let start = graph.require(id)?;
    Ok(closure(graph, start, Direction::Upstream)
        .into_iter()
        .map(|i| graph.id(i).clone())
        .collect())
}

/// Every descendant of `id`: the nodes a failure at `id` can reach.
pub fn downstream_impact(graph: &Graph, id: &str) -> Result<Vec<NodeId>, UnknownNodeError> {
    let start = graph.require(id)?;
    Ok(closure(graph, start, Direction::Downstream)
        .into_iter()
        .map(|i| graph.id(i).clone())
        .collect())
}

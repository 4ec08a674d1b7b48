//! Propagated risk: a downstream max-propagation score.
//!
//! ```text
//! propagated[v] = max(effective[v], max_{u -> v} propagated[u] * weight(u))
//! weight(u)     = clamp(dependency(u) * (1 - 0.5 * damping(u) - elasticity(u)), 0.1, 1.0)
//! ```
//!
//! `dependency(u)` is the `dependency_weight` attribute (1.0 when absent) and
//! `elasticity(u)` is a small lead-time penalty applied to nodes holding no
//! buffer. The score is informational; the simulator does not read it.

use crate::damping::RiskTable;
use chainrisk_types::{Graph, Node};
use tracing::trace;

/// Attribute read for a node's dependency strength.
pub const DEPENDENCY_WEIGHT_ATTRIBUTE: &str = "dependency_weight";

/// Elasticity penalty for nodes without inventory.
const UNBUFFERED_ELASTICITY: f64 = 0.01;

/// Propagation weight of edges leaving `node`.
pub fn propagation_weight(node: &Node, damping_factor: f64) -> f64 {
    let dependency = node
        .attribute(DEPENDENCY_WEIGHT_ATTRIBUTE)
        .and_then(|v| v.as_f64())
        .filter(|w| w.is_finite())
        .unwrap_or(1.0);
    let elasticity = if node.inventory_buffer == 0.0 {
        UNBUFFERED_ELASTICITY
    } else {
        0.0
    };
    (dependency * (1.0 - 0.5 * damping_factor - elasticity)).clamp(0.1, 1.0)
}

/// Propagated risk per node, indexed like the graph.
///
/// Acyclic graphs settle in one topological sweep. Otherwise sweeps repeat
/// in canonical order until nothing changes, at most once per node.
pub fn propagated_risk(graph: &Graph, table: &RiskTable) -> Vec<f64> {
    let n = graph.len();
    let mut propagated = table.effective_risks();
    let weights: Vec<f64> = (0..n)
        .map(|i| propagation_weight(graph.node(i), table.profile(i).damping_factor))
        .collect();

    let (order, max_sweeps) = match graph.topological_order() {
        Some(order) => (order, 1),
        None => ((0..n).collect(), n.max(1)),
    };

    for sweep in 0..max_sweeps {
        let mut changed = false;
        for &v in &order {
            for &u in graph.predecessors(v) {
                let transferred = propagated[u] * weights[u];
                if transferred > propagated[v] {
                    propagated[v] = transferred;
                    changed = true;
                }
            }
        }
        if !changed {
            trace!(sweep, "Propagated risk converged");
            break;
        }
    }

    propagated
}

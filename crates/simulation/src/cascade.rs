//! A single cascade run.

use crate::config::CascadePolicy;
use chainrisk_types::{Graph, NodeIndex};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Per-run seed derived from the master seed.
///
/// Distinct run indices map to distinct seeds for a fixed master seed, and
/// a run's seed does not depend on which worker executes it.
pub fn derive_run_seed(master_seed: u64, run_index: u64) -> u64 {
    master_seed
        .wrapping_add(run_index)
        .wrapping_mul(0x517cc1b727220a95)
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Nodes that failed on their own draw.
    pub local: Vec<bool>,
    /// Nodes that failed locally or by cascade.
    pub failed: Vec<bool>,
    /// Whether the endpoint failed.
    pub endpoint_failed: bool,
}

/// Precomputed traversal for repeated runs over one graph.
#[derive(Debug, Clone)]
pub(crate) struct CascadePlan {
    /// Distinct upstream neighbours, self excluded.
    upstream: Vec<Vec<NodeIndex>>,
    /// Node visit order per sweep.
    order: Vec<NodeIndex>,
    /// One sweep settles acyclic graphs; cyclic ones need up to n.
    max_sweeps: usize,
    policy: CascadePolicy,
    endpoint: NodeIndex,
}

impl CascadePlan {
    pub(crate) fn new(graph: &Graph, endpoint: NodeIndex, policy: CascadePolicy) -> Self {
        let n = graph.len();
        let upstream = (0..n)
            .map(|v| {
                graph
                    .predecessors(v)
                    .iter()
                    .copied()
                    .filter(|&u| u != v)
                    .collect()
            })
            .collect();
        let (order, max_sweeps) = match graph.topological_order() {
            Some(order) => (order, 1),
            None => ((0..n).collect(), n.max(1)),
        };
        Self {
            upstream,
            order,
            max_sweeps,
            policy,
            endpoint,
        }
    }

    pub(crate) fn is_acyclic(&self) -> bool {
        self.max_sweeps == 1
    }

    /// Execute one run with its own seed.
    ///
    /// Every node draws exactly one uniform value in canonical order, so two
    /// runs with the same seed see identical draws whatever the risks are.
    pub(crate) fn run(&self, risks: &[f64], seed: u64) -> RunOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let local: Vec<bool> = risks.iter().map(|&p| rng.gen::<f64>() < p).collect();
        let mut failed = local.clone();

        for _ in 0..self.max_sweeps {
            let mut changed = false;
            for &v in &self.order {
                if failed[v] {
                    continue;
                }
                if self.cascades(v, &failed) {
                    failed[v] = true;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        let endpoint_failed = failed[self.endpoint];
        RunOutcome {
            local,
            failed,
            endpoint_failed,
        }
    }

    fn cascades(&self, v: NodeIndex, failed: &[bool]) -> bool {
        let upstream = &self.upstream[v];
        match self.policy {
            CascadePolicy::AnyUpstream => upstream.iter().any(|&u| failed[u]),
            CascadePolicy::AllUpstream => {
                !upstream.is_empty() && upstream.iter().all(|&u| failed[u])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainrisk_test_helpers::{fixtures, TestGraph};

    #[test]
    fn test_run_seeds_are_distinct() {
        let seeds: std::collections::HashSet<u64> =
            (0..10_000).map(|i| derive_run_seed(42, i)).collect();
        assert_eq!(seeds.len(), 10_000);
        assert_ne!(derive_run_seed(1, 0), derive_run_seed(2, 0));
    }

    #[test]
    fn test_certain_upstream_failure_cascades() {
        let graph = fixtures::chain(&[1.0, 0.0, 0.0]);
        let plan = CascadePlan::new(&graph, 2, CascadePolicy::AnyUpstream);
        let outcome = plan.run(&[1.0, 0.0, 0.0], 7);

        assert_eq!(outcome.local, vec![true, false, false]);
        assert_eq!(outcome.failed, vec![true, true, true]);
        assert!(outcome.endpoint_failed);
    }

    #[test]
    fn test_all_upstream_requires_every_supplier() {
        // a, b -> c
        let graph = TestGraph::new()
            .node("a", 1.0)
            .node("b", 0.0)
            .node("c", 0.0)
            .edge("a", "c")
            .edge("b", "c")
            .build();
        let any = CascadePlan::new(&graph, 2, CascadePolicy::AnyUpstream);
        let all = CascadePlan::new(&graph, 2, CascadePolicy::AllUpstream);

        assert!(any.run(&[1.0, 0.0, 0.0], 1).endpoint_failed);
        assert!(!all.run(&[1.0, 0.0, 0.0], 1).endpoint_failed);
        assert!(all.run(&[1.0, 1.0, 0.0], 1).endpoint_failed);
    }

    #[test]
    fn test_cycle_reaches_fixed_point() {
        let graph = fixtures::cycle_with_exit(0.0);
        let plan = CascadePlan::new(&graph, 3, CascadePolicy::AnyUpstream);
        assert!(!plan.is_acyclic());

        // Only `c` fails locally; the whole loop and the exit follow.
        let outcome = plan.run(&[0.0, 0.0, 1.0, 0.0], 3);
        assert_eq!(outcome.failed, vec![true, true, true, true]);
    }

    #[test]
    fn test_self_loop_alone_never_cascades_under_all_upstream() {
        let graph = TestGraph::new().node("solo", 0.0).edge("solo", "solo").build();
        let plan = CascadePlan::new(&graph, 0, CascadePolicy::AllUpstream);
        assert!(!plan.run(&[0.0], 5).endpoint_failed);
    }

    #[test]
    fn test_same_seed_same_draws() {
        let graph = fixtures::abc_chain(0.5);
        let plan = CascadePlan::new(&graph, 2, CascadePolicy::AnyUpstream);
        let risks = [0.5, 0.5, 0.5];
        assert_eq!(plan.run(&risks, 99), plan.run(&risks, 99));
    }
}

//! Deterministic risk model.
//!
//! Each node's local risk is damped by its inventory buffer:
//!
//! ```text
//! damping_factor = min(1, inventory_buffer / buffer_threshold)
//! effective_risk = local_risk * (1 - damping_factor)
//! ```
//!
//! This is a pure per-node transform; the graph is not traversed. The
//! resulting [`RiskTable`] is what the Monte Carlo simulator consumes as
//! per-node failure probabilities.
//!
//! [`propagated_risk`] adds an informational downstream score on top.

mod damping;
mod propagation;

pub use damping::{DampingModel, RiskProfile, RiskTable};
pub use propagation::{propagated_risk, propagation_weight, DEPENDENCY_WEIGHT_ATTRIBUTE};

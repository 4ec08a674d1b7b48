//! Seeded Monte Carlo cascade simulation.
//!
//! Given a graph, per-node effective risks and an endpoint, estimates the
//! probability that the endpoint is disrupted. Given the same master seed,
//! produces identical results every run, on any number of threads.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 MonteCarloSimulator                     │
//! │                                                         │
//! │  master seed ──► derive_run_seed(master, i) per run     │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  rayon: chunks of runs in parallel                 │ │
//! │  │  each run: ChaCha8Rng draws (canonical order)      │ │
//! │  │            → local failures → cascade sweeps       │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ integer partial sums        │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  SimulationSummary: p, SE, 95% CI, per-node freq   │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod cascade;
mod config;
mod runner;
mod summary;

pub use cascade::{derive_run_seed, RunOutcome};
pub use config::{CascadePolicy, SimulationConfig, DEFAULT_RUN_COUNT};
pub use runner::{MonteCarloSimulator, SimulationError};
pub use summary::{ConfidenceInterval, NodeFrequency, SimulationSummary};

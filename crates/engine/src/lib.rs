//! Supply-chain disruption risk engine.
//!
//! This crate is the seam exposed to orchestration: hand it a validated
//! [`Graph`](chainrisk_types::Graph) and an [`EngineConfig`], get back one
//! [`DisruptionReport`].
//!
//! # Architecture
//!
//! ```text
//! Graph ──┬──► StructuralAnalyzer ──► betweenness, in-degree, hubs,
//!         │                           bottlenecks, communities, audit
//!         │
//!         └──► DampingModel ──► RiskTable ──┬──► propagated risk
//!                                           │
//!                                           └──► MonteCarloSimulator
//!                                                  (effective risk as
//!                                                   failure probability)
//!                                                        │
//!                          DisruptionReport ◄────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use chainrisk_analysis::Threshold;
//! use chainrisk_engine::{EngineConfig, RiskEngine};
//!
//! let config = EngineConfig::new("Brand A Distribution Center", 90.0,
//!         Threshold::Percentile(90.0), Threshold::Percentile(90.0))
//!     .with_run_count(10_000)
//!     .with_seed(42);
//!
//! let report = RiskEngine::new(&graph, config)?.analyze()?;
//! println!("P(disrupted) = {:.3}", report.endpoint_disruption_probability());
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod report;

pub use chainrisk_simulation::DEFAULT_RUN_COUNT;
pub use config::EngineConfig;
pub use engine::{load_graph, RiskEngine};
pub use error::EngineError;
pub use report::{DisruptionReport, RiskReport};

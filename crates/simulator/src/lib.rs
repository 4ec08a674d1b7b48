//! Command-line driver for the chainrisk engine.
//!
//! Loads a supply-chain graph from one of three sources, runs the
//! [`RiskEngine`](chainrisk_engine::RiskEngine) over it and optionally
//! writes the report as JSON.
//!
//! ```text
//!   --graph graph.json ─────────┐
//!   --records records.json ─────┼──► Graph ──► RiskEngine ──► print_summary
//!     [--aliases aliases.json]  │                     │
//!   (neither) bundled sample ───┘                     └──► --json-out report.json
//! ```

mod source;

pub use source::{write_report, GraphSource, SimulatorError};

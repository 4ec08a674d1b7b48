//! Structural analysis of supply-chain graphs.
//!
//! Everything in this crate is a pure function of the graph: no randomness,
//! no mutation, and results depend only on canonical node order.
//!
//! # Measures
//!
//! ```text
//!                   ┌──────────────────────┐
//!                   │  StructuralAnalyzer  │
//!                   └──────────┬───────────┘
//!        ┌──────────────┬──────┴───────┬────────────────┐
//!        ▼              ▼              ▼                ▼
//!   betweenness     in-degree     communities      traceability
//!   (Brandes)      (multi-edge)  (greedy CNM)   (BFS path, audits)
//!        │              │
//!        ▼              ▼
//!   bottlenecks       hubs       ◄── Threshold (fixed | percentile)
//! ```

mod analyzer;
pub mod centrality;
pub mod community;
pub mod threshold;
pub mod traceability;

pub use analyzer::{
    ranked_scores, AnalysisConfig, InDegreeScore, NodeScore, StructuralAnalyzer, StructuralReport,
};
pub use community::CommunityPartition;
pub use threshold::Threshold;
pub use traceability::PathResult;

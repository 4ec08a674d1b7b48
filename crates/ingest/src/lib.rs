//! GraphBuilder: turns pre-structured source records into a validated
//! supply-chain [`Graph`](chainrisk_types::Graph).
//!
//! ```text
//!   SourceRecord ──► EntityResolver ──► merge into node ──► GraphBuilder::build
//!        │                                                        │
//!        └── RelationRecord ──► RelationTable ──► Edge ───────────┘
//! ```
//!
//! Assessment scores become local failure probabilities through a
//! [`RiskMapping`] (banded by default).
//!
//! Entity resolution is injectable: the default [`MappingTableResolver`]
//! is a plain alias table, and any other [`EntityResolver`] can replace it.

mod builder;
mod record;
mod relation;
mod resolver;
mod risk_mapping;
pub mod sample;

pub use builder::{GraphBuilder, IngestError, DEFAULT_DAYS_PER_BUFFER_UNIT};
pub use record::{RelationRecord, SourceRecord};
pub use relation::RelationTable;
pub use resolver::{normalize, EntityResolver, MappingTableResolver};
pub use risk_mapping::{RiskBand, RiskMapping};

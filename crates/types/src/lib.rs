//! Core types for supply-chain risk analysis.
//!
//! This crate provides the foundational types shared by every analysis stage:
//!
//! - **Identifiers**: [`NodeId`], the canonical key of a supply-chain entity
//! - **Graph model**: [`Node`], [`Edge`], and the immutable [`Graph`]
//! - **Errors**: the [`InvalidGraphError`], [`UnknownNodeError`] and
//!   [`ConfigurationError`] taxonomy used across the workspace
//!
//! # Design Philosophy
//!
//! This crate is self-contained with minimal dependencies. It does not depend on
//! any other workspace crates, making it the foundation layer. A [`Graph`] is
//! validated once at construction and is read-only afterwards; analysis stages
//! work on dense node indices obtained from it.

mod edge;
mod error;
mod graph;
mod identifiers;
mod node;

pub use edge::{Edge, Relation};
pub use error::{ConfigurationError, InvalidGraphError, UnknownNodeError};
pub use graph::{Graph, GraphData};
pub use identifiers::NodeId;
pub use node::{AttributeValue, Attributes, Node, NodeKind};

/// Dense index of a node inside a [`Graph`].
///
/// Indices follow node insertion order, which is the canonical ordering used
/// for deterministic tie-breaks and per-run random draws.
pub type NodeIndex = usize;

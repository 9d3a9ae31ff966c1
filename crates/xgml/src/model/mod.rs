//! Graph model types for XGML documents.
//!
//! This module contains the types produced by the builder:
//! - Documents (file metadata plus one graph)
//! - Graphs, nodes and edges (arena-indexed)
//! - Labels (free text split into lines and tags)

pub mod graph;
pub mod labeler;

pub use graph::{Ancestors, Color, Document, Edge, EdgeRef, Graph, Node, NodeRef};
pub use labeler::Labeler;

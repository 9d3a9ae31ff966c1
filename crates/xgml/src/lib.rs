//! XGML: typed graph model for state diagrams drawn in yEd.
//!
//! This crate reads XGML files (yEd's XML serialization of GML) and turns
//! them into an immutable, arena-indexed graph with dense node indices,
//! resolved edge endpoints, resolved group containment and parsed label
//! metadata.
//!
//! # Overview
//!
//! State diagrams carry their meaning in three places:
//! - **Structure**: nodes, directed edges, and nodes nested inside groups
//! - **Color**: the `fill` of an edge's graphics
//! - **Labels**: free text where lines shaped like `key: value` are tags
//!
//! # Quick Start
//!
//! ```rust
//! use xgml::tree::Section;
//!
//! let root = Section::new("xgml")
//!     .with_string("Creator", "yFiles")
//!     .with_string("Version", "2.8")
//!     .with_section("graph", |g| g
//!         .with_int("hierarchic", 1)
//!         .with_string("label", "")
//!         .with_int("directed", 1)
//!         .with_section("node", |n| n.with_int("id", 5).with_string("label", "Idle"))
//!         .with_section("node", |n| n.with_int("id", 9).with_string("label", "Running"))
//!         .with_section("edge", |e| e
//!             .with_int("source", 5)
//!             .with_int("target", 9)
//!             .with_string("label", "start\nevent: go")
//!             .with_section("graphics", |gr| gr.with_string("fill", "#FF00FF"))));
//!
//! let doc = xgml::parse(&root).unwrap();
//! let graph = doc.graph();
//! assert_eq!(graph.num_nodes(), 2);
//!
//! let edge = graph.edge(0).unwrap();
//! assert_eq!(edge.color_rgba(), (255, 0, 255, 255));
//! assert_eq!(edge.label().tag("event"), Some("go"));
//! assert_eq!(edge.src().label().text(), "Idle");
//! ```
//!
//! # Modules
//!
//! - [`tree`]: Generic section tree and typed attributes
//! - [`codec`]: XML decoding into the section tree
//! - [`build`]: Document and graph construction
//! - [`model`]: Graph, node, edge and label types
//! - [`validate`]: Invariant checks on built graphs
//! - [`error`]: Error types
//! - [`limits`]: Bounds and well-known names
//!
//! # Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger.

use std::fs;
use std::path::Path;

use log::info;

pub mod build;
pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod tree;
pub mod validate;

// Re-export commonly used types at crate root
pub use build::{
    BuildOptions, build_document, build_document_with_options, build_graph,
    build_graph_with_options,
};
pub use codec::decode_tree;
pub use error::{AttributeError, BuildError, DecodeError, Error, ErrorCode, LookupError, ValidationError};
pub use model::{Color, Document, Edge, EdgeRef, Graph, Labeler, Node, NodeRef};
pub use tree::{Attribute, AttributeType, Section};
pub use validate::validate_graph;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds a document from an already decoded section tree.
pub fn parse(root: &Section) -> Result<Document, BuildError> {
    build_document(root)
}

/// Builds a document from an already decoded section tree with options.
pub fn parse_with_options(root: &Section, options: BuildOptions) -> Result<Document, BuildError> {
    build_document_with_options(root, options)
}

/// Decodes XGML bytes and builds a document.
pub fn parse_bytes(input: &[u8]) -> Result<Document, Error> {
    parse_bytes_with_options(input, BuildOptions::default())
}

/// Decodes XGML bytes and builds a document with options.
pub fn parse_bytes_with_options(input: &[u8], options: BuildOptions) -> Result<Document, Error> {
    let root = decode_tree(input)?;
    Ok(build_document_with_options(&root, options)?)
}

/// Reads, decodes and builds an XGML file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document, Error> {
    parse_file_with_options(path, BuildOptions::default())
}

/// Reads, decodes and builds an XGML file with options.
pub fn parse_file_with_options(
    path: impl AsRef<Path>,
    options: BuildOptions,
) -> Result<Document, Error> {
    let path = path.as_ref();
    info!(path:? = path; "Reading XGML file");
    let data = fs::read(path)?;
    parse_bytes_with_options(&data, options)
}

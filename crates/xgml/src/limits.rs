//! Names and bounds used while decoding and building XGML documents.

/// Maximum accepted input size in bytes (64 MiB).
pub const MAX_INPUT_SIZE: usize = 64 * 1024 * 1024;

/// Maximum nesting depth of `<section>` elements.
pub const MAX_SECTION_DEPTH: usize = 64;

/// Default maximum number of nodes in one graph.
pub const MAX_NODES: usize = 1_000_000;

/// Default maximum number of edges in one graph.
pub const MAX_EDGES: usize = 4_000_000;

// Section names.
pub const SECTION_ROOT: &str = "xgml";
pub const SECTION_GRAPH: &str = "graph";
pub const SECTION_NODE: &str = "node";
pub const SECTION_EDGE: &str = "edge";
pub const SECTION_GRAPHICS: &str = "graphics";

// Attribute keys read by the builder.
pub const ATTR_CREATOR: &str = "Creator";
pub const ATTR_VERSION: &str = "Version";
pub const ATTR_HIERARCHIC: &str = "hierarchic";
pub const ATTR_DIRECTED: &str = "directed";
pub const ATTR_LABEL: &str = "label";
pub const ATTR_ID: &str = "id";
pub const ATTR_IS_GROUP: &str = "isGroup";
pub const ATTR_GROUP_ID: &str = "gid";
pub const ATTR_SOURCE: &str = "source";
pub const ATTR_TARGET: &str = "target";
pub const ATTR_FILL: &str = "fill";

//! Error types for XGML decoding, graph building and graph navigation.

use std::io;

use thiserror::Error;

use crate::tree::AttributeType;

/// Stable error codes shared by every error kind in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// X001: Malformed markup or unusable section tree
    MalformedInput,
    /// X002: Section of the wrong kind where a specific one was required
    InvalidSection,
    /// X003: Attribute missing, mistyped or unparseable
    InvalidAttribute,
    /// X004: Reference to a node that does not exist
    DanglingReference,
    /// X005: Inconsistent group hierarchy or node identities
    InconsistentGraph,
    /// X006: Positional or keyed lookup out of range
    LookupFailed,
    /// X007: Configured limit exceeded
    LimitExceeded,
    /// X008: I/O failure
    Io,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "X001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MalformedInput => "X001",
            ErrorCode::InvalidSection => "X002",
            ErrorCode::InvalidAttribute => "X003",
            ErrorCode::DanglingReference => "X004",
            ErrorCode::InconsistentGraph => "X005",
            ErrorCode::LookupFailed => "X006",
            ErrorCode::LimitExceeded => "X007",
            ErrorCode::Io => "X008",
        }
    }
}

/// Error raised by the typed attribute accessors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttributeError {
    #[error("[X003] attribute {key:?} has type {actual}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: AttributeType,
        actual: AttributeType,
    },

    #[error("[X003] attribute {key:?} has malformed value {raw:?}")]
    MalformedValue { key: String, raw: String },

    #[error("[X003] section {section:?} is missing required attribute {key:?}")]
    Missing { section: String, key: String },
}

/// Error while turning a section tree into a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    // === X002: Invalid section ===
    #[error("[X002] documents can only be made out of 'xgml' sections, found {found:?}")]
    InvalidRoot { found: String },

    #[error("[X002] graphs can only be made out of 'graph' sections, found {found:?}")]
    InvalidGraphSection { found: String },

    #[error("[X002] nodes can only be made out of 'node' sections, found {found:?}")]
    InvalidNodeSection { found: String },

    #[error("[X002] edges can only be made out of 'edge' sections, found {found:?}")]
    InvalidEdgeSection { found: String },

    #[error("[X002] document has no 'graph' section")]
    MissingGraph,

    // === X003: Attributes ===
    #[error(transparent)]
    Attribute(#[from] AttributeError),

    #[error("[X003] fill color {raw:?} contains invalid hex digits")]
    MalformedColor { raw: String },

    // === X004: Dangling references ===
    #[error("[X004] node {node_id} belongs to group {group_id}, which does not exist")]
    DanglingGroupReference { node_id: i64, group_id: i64 },

    #[error("[X004] edge endpoint {edge_endpoint_id} does not exist")]
    DanglingEdgeReference { edge_endpoint_id: i64 },

    // === X005: Inconsistent graph ===
    #[error("[X005] node {node_id} belongs to group {group_id}, which is not a group node")]
    GroupReferenceNotAGroup { node_id: i64, group_id: i64 },

    #[error("[X005] node id {id} is used more than once")]
    DuplicateNodeId { id: i64 },

    #[error("[X005] group hierarchy containing node {node_id} forms a cycle")]
    GroupCycle { node_id: i64 },

    // === X007: Limits ===
    #[error("[X007] {field} count {len} exceeds maximum {max}")]
    LimitExceeded {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

impl BuildError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BuildError::InvalidRoot { .. }
            | BuildError::InvalidGraphSection { .. }
            | BuildError::InvalidNodeSection { .. }
            | BuildError::InvalidEdgeSection { .. }
            | BuildError::MissingGraph => ErrorCode::InvalidSection,
            BuildError::Attribute(_) | BuildError::MalformedColor { .. } => {
                ErrorCode::InvalidAttribute
            }
            BuildError::DanglingGroupReference { .. } | BuildError::DanglingEdgeReference { .. } => {
                ErrorCode::DanglingReference
            }
            BuildError::GroupReferenceNotAGroup { .. }
            | BuildError::DuplicateNodeId { .. }
            | BuildError::GroupCycle { .. } => ErrorCode::InconsistentGraph,
            BuildError::LimitExceeded { .. } => ErrorCode::LimitExceeded,
        }
    }
}

/// Error while decoding XGML markup into a section tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("[X001] malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("[X001] invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("[X001] attribute {key:?} declares unknown type {declared:?}")]
    UnknownAttributeType { key: String, declared: String },

    #[error("[X001] <{element}> element is missing its {attribute:?} attribute")]
    MissingXmlAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("[X001] unexpected <{element}> element {context}")]
    UnexpectedElement {
        element: String,
        context: &'static str,
    },

    #[error("[X001] unbalanced closing tag </{element}>")]
    UnbalancedSection { element: String },

    #[error("[X001] input ended inside an open <section>")]
    UnexpectedEof,

    #[error("[X001] input contains no top-level <section>")]
    NoRootSection,

    #[error("[X007] section nesting exceeds maximum depth {max}")]
    DepthExceeded { max: usize },

    #[error("[X007] input length {len} exceeds maximum {max}")]
    InputTooLarge { len: usize, max: usize },
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::DepthExceeded { .. } | DecodeError::InputTooLarge { .. } => {
                ErrorCode::LimitExceeded
            }
            _ => ErrorCode::MalformedInput,
        }
    }
}

/// Error from a bounds-checked accessor on the graph model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("[X006] {what} index {index} out of range (size: {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("[X006] no {what} with id {id}")]
    NotFound { what: &'static str, id: i64 },
}

impl LookupError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::LookupFailed
    }
}

/// Violation of a relational invariant found by [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("node at position {position} reports index {index}")]
    IndexMismatch { position: usize, index: usize },

    #[error("edge {edge} refers to node {node}, but the graph has {len} nodes")]
    EdgeEndpointOutOfRange { edge: usize, node: usize, len: usize },

    #[error("edge {edge} appears {count} times in the {list} of node {node}")]
    AdjacencyMismatch {
        edge: usize,
        node: usize,
        list: &'static str,
        count: usize,
    },

    #[error("node {node} lists edge {edge}, which does not touch it")]
    ForeignEdge { node: usize, edge: usize },

    #[error("node {node} refers to group {group}, but the graph has {len} nodes")]
    GroupOutOfRange { node: usize, group: usize, len: usize },

    #[error("node {node} refers to group {group}, which is not a group node")]
    GroupNotFlagged { node: usize, group: usize },

    #[error("node {node} appears {count} times among the children of group {group}")]
    ChildMismatch { node: usize, group: usize, count: usize },

    #[error("group hierarchy above node {node} does not terminate")]
    GroupCycle { node: usize },
}

/// Top-level error for the reading entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error("[X008] failed to read input: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

impl Error {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Io(_) => ErrorCode::Io,
            Error::Decode(e) => e.code(),
            Error::Build(e) => e.code(),
        }
    }
}

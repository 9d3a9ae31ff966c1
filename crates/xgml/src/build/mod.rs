//! Construction of documents and graphs from a section tree.
//!
//! Graph construction runs in a fixed order:
//!
//! 1. **Node pass**: every `node` child becomes a node, keyed by the id it
//!    has in the file. Its dense index is its position among the distinct
//!    ids, in document order.
//! 2. **Group-link pass**: every node with a `gid` is attached to the
//!    children of its group, and the group hierarchy is checked for cycles.
//! 3. **Edge pass**: every `edge` child is resolved against the node ids and
//!    appended to the edge list and to its endpoints' adjacency lists.
//!
//! File ids are rewritten to dense indices as each reference is resolved, so
//! the finished graph never stores a file id except in
//! [`Node::original_id`](crate::model::Node::original_id).
//!
//! Any failure aborts the whole build; no partial graph is returned.

pub mod color;

use std::collections::hash_map::Entry;

use log::{debug, info, trace, warn};
use rustc_hash::FxHashMap;

use crate::error::BuildError;
use crate::limits::{
    ATTR_CREATOR, ATTR_DIRECTED, ATTR_FILL, ATTR_GROUP_ID, ATTR_HIERARCHIC, ATTR_ID,
    ATTR_IS_GROUP, ATTR_LABEL, ATTR_SOURCE, ATTR_TARGET, ATTR_VERSION, MAX_EDGES, MAX_NODES,
    SECTION_EDGE, SECTION_GRAPH, SECTION_GRAPHICS, SECTION_NODE, SECTION_ROOT,
};
use crate::model::{Color, Document, Edge, Graph, Labeler, Node};
use crate::tree::Section;

pub use color::parse_fill;

/// Options controlling how strictly a graph is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Reject a `gid` that points at a node without an `isGroup` attribute.
    pub require_group_flag: bool,

    /// Accept repeated node ids. The later node replaces the earlier one,
    /// keeping the earlier one's dense index.
    pub allow_duplicate_ids: bool,

    /// Maximum number of distinct nodes.
    pub max_nodes: usize,

    /// Maximum number of edges.
    pub max_edges: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            require_group_flag: true,
            allow_duplicate_ids: false,
            max_nodes: MAX_NODES,
            max_edges: MAX_EDGES,
        }
    }
}

impl BuildOptions {
    /// Creates the default (strict) options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options matching yEd's own leniency: groups need not be
    /// flagged, and the last node with a given id wins.
    pub fn permissive() -> Self {
        Self {
            require_group_flag: false,
            allow_duplicate_ids: true,
            ..Self::default()
        }
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// Builds a document from an `xgml` root section with default options.
pub fn build_document(root: &Section) -> Result<Document, BuildError> {
    build_document_with_options(root, BuildOptions::default())
}

/// Builds a document from an `xgml` root section.
///
/// Only the first `graph` child is used; later ones are ignored.
pub fn build_document_with_options(
    root: &Section,
    options: BuildOptions,
) -> Result<Document, BuildError> {
    if root.name() != SECTION_ROOT {
        return Err(BuildError::InvalidRoot {
            found: root.name().to_string(),
        });
    }
    let creator = root.require(ATTR_CREATOR)?.as_str()?.to_string();
    let version = root.require(ATTR_VERSION)?.as_str()?.to_string();
    info!(creator = creator.as_str(), version = version.as_str(); "Building XGML document");

    let mut graphs = root.children_named(SECTION_GRAPH);
    let graph_section = graphs.next().ok_or(BuildError::MissingGraph)?;
    let ignored = graphs.count();
    if ignored > 0 {
        warn!(ignored; "Ignoring extra graph sections");
    }

    let graph = build_graph_with_options(graph_section, options)?;
    info!(nodes = graph.num_nodes(), edges = graph.num_edges(); "Document built");

    Ok(Document {
        creator,
        version,
        graph,
    })
}

// =============================================================================
// GRAPH
// =============================================================================

/// A node as read from its section, before references are resolved.
#[derive(Debug)]
struct NodeDraft {
    id: i64,
    label: String,
    is_group: bool,
    group_id: i64,
}

/// An edge as read from its section, before endpoints are resolved.
#[derive(Debug)]
struct EdgeDraft {
    source: i64,
    target: i64,
    label: String,
    color: Color,
}

/// Builds a graph from a `graph` section with default options.
pub fn build_graph(section: &Section) -> Result<Graph, BuildError> {
    build_graph_with_options(section, BuildOptions::default())
}

/// Builds a graph from a `graph` section.
pub fn build_graph_with_options(
    section: &Section,
    options: BuildOptions,
) -> Result<Graph, BuildError> {
    if section.name() != SECTION_GRAPH {
        return Err(BuildError::InvalidGraphSection {
            found: section.name().to_string(),
        });
    }
    let hierarchic = section.require(ATTR_HIERARCHIC)?.as_int()?;
    let label = section.require(ATTR_LABEL)?.as_str()?.to_string();
    let directed = section.require(ATTR_DIRECTED)?.as_int()?;

    let (drafts, index_of) = node_pass(section, &options)?;
    debug!(nodes = drafts.len(); "Node pass complete");

    let (group_of, children) = group_pass(&drafts, &index_of, &options)?;
    debug!(grouped = group_of.iter().flatten().count(); "Group-link pass complete");

    let mut inputs = vec![Vec::new(); drafts.len()];
    let mut outputs = vec![Vec::new(); drafts.len()];
    let mut edges = Vec::new();
    for edge_section in section.children_named(SECTION_EDGE) {
        if edges.len() >= options.max_edges {
            return Err(BuildError::LimitExceeded {
                field: "edges",
                len: edges.len() + 1,
                max: options.max_edges,
            });
        }
        let draft = build_edge(edge_section)?;
        let src = resolve_endpoint(&index_of, draft.source)?;
        let dst = resolve_endpoint(&index_of, draft.target)?;
        let index = edges.len();
        trace!(index, source = draft.source, target = draft.target; "Built edge");

        outputs[src].push(index);
        inputs[dst].push(index);
        edges.push(Edge {
            index,
            src,
            dst,
            label: Labeler::new(draft.label),
            color: draft.color,
        });
    }
    debug!(edges = edges.len(); "Edge pass complete");

    let nodes = drafts
        .into_iter()
        .zip(group_of)
        .zip(children.into_iter().zip(inputs.into_iter().zip(outputs)))
        .enumerate()
        .map(|(index, ((draft, group), (children, (inputs, outputs))))| Node {
            index,
            original_id: draft.id,
            label: Labeler::new(draft.label),
            group,
            is_group: draft.is_group,
            inputs,
            outputs,
            children,
        })
        .collect();

    Ok(Graph {
        hierarchic,
        label,
        directed,
        nodes,
        edges,
        index_of,
    })
}

/// Reads every `node` child and assigns dense indices in document order.
fn node_pass(
    section: &Section,
    options: &BuildOptions,
) -> Result<(Vec<NodeDraft>, FxHashMap<i64, usize>), BuildError> {
    let mut drafts: Vec<NodeDraft> = Vec::new();
    let mut index_of = FxHashMap::default();

    for node_section in section.children_named(SECTION_NODE) {
        let draft = build_node(node_section)?;
        trace!(id = draft.id, is_group = draft.is_group, gid = draft.group_id; "Built node");
        match index_of.entry(draft.id) {
            Entry::Vacant(slot) => {
                if drafts.len() >= options.max_nodes {
                    return Err(BuildError::LimitExceeded {
                        field: "nodes",
                        len: drafts.len() + 1,
                        max: options.max_nodes,
                    });
                }
                slot.insert(drafts.len());
                drafts.push(draft);
            }
            Entry::Occupied(slot) => {
                if !options.allow_duplicate_ids {
                    return Err(BuildError::DuplicateNodeId { id: draft.id });
                }
                warn!(id = draft.id; "Duplicate node id, keeping the later node");
                drafts[*slot.get()] = draft;
            }
        }
    }

    Ok((drafts, index_of))
}

/// Resolves `gid` references into parent indices and child lists.
fn group_pass(
    drafts: &[NodeDraft],
    index_of: &FxHashMap<i64, usize>,
    options: &BuildOptions,
) -> Result<(Vec<Option<usize>>, Vec<Vec<usize>>), BuildError> {
    let mut group_of = vec![None; drafts.len()];
    let mut children = vec![Vec::new(); drafts.len()];

    for (index, draft) in drafts.iter().enumerate() {
        if draft.group_id < 0 {
            continue;
        }
        let group = *index_of
            .get(&draft.group_id)
            .ok_or(BuildError::DanglingGroupReference {
                node_id: draft.id,
                group_id: draft.group_id,
            })?;
        if options.require_group_flag && !drafts[group].is_group {
            return Err(BuildError::GroupReferenceNotAGroup {
                node_id: draft.id,
                group_id: draft.group_id,
            });
        }
        group_of[index] = Some(group);
        children[group].push(index);
    }

    check_group_cycles(drafts, &group_of)?;
    Ok((group_of, children))
}

/// Fails if following `group_of` from any node revisits a node.
fn check_group_cycles(drafts: &[NodeDraft], group_of: &[Option<usize>]) -> Result<(), BuildError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; group_of.len()];
    let mut path = Vec::new();
    for start in 0..group_of.len() {
        let mut current = Some(start);
        while let Some(index) = current {
            match marks[index] {
                Mark::Done => break,
                Mark::OnPath => {
                    return Err(BuildError::GroupCycle {
                        node_id: drafts[index].id,
                    });
                }
                Mark::Unvisited => {
                    marks[index] = Mark::OnPath;
                    path.push(index);
                    current = group_of[index];
                }
            }
        }
        for index in path.drain(..) {
            marks[index] = Mark::Done;
        }
    }
    Ok(())
}

fn resolve_endpoint(index_of: &FxHashMap<i64, usize>, id: i64) -> Result<usize, BuildError> {
    index_of
        .get(&id)
        .copied()
        .ok_or(BuildError::DanglingEdgeReference { edge_endpoint_id: id })
}

// =============================================================================
// NODES AND EDGES
// =============================================================================

fn build_node(section: &Section) -> Result<NodeDraft, BuildError> {
    if section.name() != SECTION_NODE {
        return Err(BuildError::InvalidNodeSection {
            found: section.name().to_string(),
        });
    }
    let id = section.require(ATTR_ID)?.as_int()?;
    let label = section.require(ATTR_LABEL)?.as_str()?.to_string();
    // Presence alone marks a group; the value is not read.
    let is_group = section.has_attribute(ATTR_IS_GROUP);
    let group_id = match section.attribute(ATTR_GROUP_ID) {
        Some(gid) => gid.as_int()?,
        None => -1,
    };
    Ok(NodeDraft {
        id,
        label,
        is_group,
        group_id,
    })
}

fn build_edge(section: &Section) -> Result<EdgeDraft, BuildError> {
    if section.name() != SECTION_EDGE {
        return Err(BuildError::InvalidEdgeSection {
            found: section.name().to_string(),
        });
    }
    let source = section.require(ATTR_SOURCE)?.as_int()?;
    let target = section.require(ATTR_TARGET)?.as_int()?;
    let label = match section.attribute(ATTR_LABEL) {
        Some(label) => label.as_str()?.to_string(),
        None => String::new(),
    };

    let mut color = Color::BLACK;
    for graphics in section.children_named(SECTION_GRAPHICS) {
        let Some(fill) = graphics.attribute(ATTR_FILL) else {
            continue;
        };
        if let Some(parsed) = parse_fill(fill.as_str()?)? {
            color = parsed;
        }
    }

    Ok(EdgeDraft {
        source,
        target,
        label,
        color,
    })
}

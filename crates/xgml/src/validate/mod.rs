//! Structural validation of built graphs.
//!
//! The builder establishes these invariants while it constructs a graph;
//! this module re-checks them on a finished [`Graph`]:
//!
//! - node `i` reports index `i`
//! - every edge endpoint is a valid node index
//! - every edge appears exactly once in its source's outputs and its
//!   destination's inputs, and nodes list no edges that do not touch them
//! - every group reference is valid, points at a group node (unless the
//!   options allow otherwise), and the group lists the member exactly once
//! - every group chain terminates

use crate::build::BuildOptions;
use crate::error::ValidationError;
use crate::model::Graph;

/// Validates a graph against the default (strict) build rules.
pub fn validate_graph(graph: &Graph) -> Result<(), ValidationError> {
    validate_graph_with_options(graph, &BuildOptions::default())
}

/// Validates a graph against the rules implied by `options`.
pub fn validate_graph_with_options(
    graph: &Graph,
    options: &BuildOptions,
) -> Result<(), ValidationError> {
    let len = graph.nodes.len();

    for (position, node) in graph.nodes.iter().enumerate() {
        if node.index != position {
            return Err(ValidationError::IndexMismatch {
                position,
                index: node.index,
            });
        }
    }

    validate_edges(graph)?;

    for node in &graph.nodes {
        let Some(group) = node.group else {
            continue;
        };
        if group >= len {
            return Err(ValidationError::GroupOutOfRange {
                node: node.index,
                group,
                len,
            });
        }
        if options.require_group_flag && !graph.nodes[group].is_group {
            return Err(ValidationError::GroupNotFlagged {
                node: node.index,
                group,
            });
        }
        let count = graph.nodes[group]
            .children
            .iter()
            .filter(|&&c| c == node.index)
            .count();
        if count != 1 {
            return Err(ValidationError::ChildMismatch {
                node: node.index,
                group,
                count,
            });
        }
    }

    for group in &graph.nodes {
        for &child in &group.children {
            if graph.nodes.get(child).and_then(|c| c.group) != Some(group.index) {
                return Err(ValidationError::ChildMismatch {
                    node: child,
                    group: group.index,
                    count: 0,
                });
            }
        }
    }

    // A chain longer than the node count must revisit a node.
    for node in &graph.nodes {
        let mut current = node.group;
        let mut steps = 0;
        while let Some(group) = current {
            steps += 1;
            if steps > len {
                return Err(ValidationError::GroupCycle { node: node.index });
            }
            current = graph.nodes[group].group;
        }
    }

    Ok(())
}

fn validate_edges(graph: &Graph) -> Result<(), ValidationError> {
    let len = graph.nodes.len();

    for edge in &graph.edges {
        for node in [edge.src, edge.dst] {
            if node >= len {
                return Err(ValidationError::EdgeEndpointOutOfRange {
                    edge: edge.index,
                    node,
                    len,
                });
            }
        }
        let occurrences = |list: &[usize]| list.iter().filter(|&&e| e == edge.index).count();

        let count = occurrences(&graph.nodes[edge.src].outputs);
        if count != 1 {
            return Err(ValidationError::AdjacencyMismatch {
                edge: edge.index,
                node: edge.src,
                list: "outputs",
                count,
            });
        }
        let count = occurrences(&graph.nodes[edge.dst].inputs);
        if count != 1 {
            return Err(ValidationError::AdjacencyMismatch {
                edge: edge.index,
                node: edge.dst,
                list: "inputs",
                count,
            });
        }
    }

    for node in &graph.nodes {
        let foreign_output = node
            .outputs
            .iter()
            .find(|&&e| graph.edges.get(e).map(|edge| edge.src) != Some(node.index));
        let foreign_input = node
            .inputs
            .iter()
            .find(|&&e| graph.edges.get(e).map(|edge| edge.dst) != Some(node.index));
        if let Some(&edge) = foreign_output.or(foreign_input) {
            return Err(ValidationError::ForeignEdge {
                node: node.index,
                edge,
            });
        }
    }

    Ok(())
}

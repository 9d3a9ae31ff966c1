//! Immutable graph model.
//!
//! The [`Graph`] owns every [`Node`] and [`Edge`] in two dense vectors.
//! Nodes and edges refer to each other only by index, and all navigation goes
//! through the borrowed [`NodeRef`] and [`EdgeRef`] handles, which pair an
//! element with the graph that owns it.

use std::fmt;
use std::ops::Deref;

use rustc_hash::FxHashMap;

use crate::error::LookupError;
use crate::model::Labeler;

/// A parsed XGML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) creator: String,
    pub(crate) version: String,
    pub(crate) graph: Graph,
}

impl Document {
    /// Returns the name of the tool that wrote the file.
    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Consumes the document, returning its graph.
    pub fn into_graph(self) -> Graph {
        self.graph
    }
}

/// An RGB color. Edges without a `fill` are black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the color with a fully opaque alpha channel.
    pub fn rgba(self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, 255)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A directed graph with dense node indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    pub(crate) hierarchic: i64,
    pub(crate) label: String,
    pub(crate) directed: i64,
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    /// File id to dense index.
    pub(crate) index_of: FxHashMap<i64, usize>,
}

impl Graph {
    /// Returns the `hierarchic` flag as stored in the file.
    pub fn hierarchic(&self) -> i64 {
        self.hierarchic
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the `directed` flag as stored in the file.
    pub fn directed(&self) -> i64 {
        self.directed
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns the node with dense index `index`.
    pub fn node(&self, index: usize) -> Result<NodeRef<'_>, LookupError> {
        self.nodes
            .get(index)
            .map(|node| NodeRef { graph: self, node })
            .ok_or(LookupError::IndexOutOfRange {
                what: "node",
                index,
                len: self.nodes.len(),
            })
    }

    /// Returns edge number `index`, in document order.
    pub fn edge(&self, index: usize) -> Result<EdgeRef<'_>, LookupError> {
        self.edges
            .get(index)
            .map(|edge| EdgeRef { graph: self, edge })
            .ok_or(LookupError::IndexOutOfRange {
                what: "edge",
                index,
                len: self.edges.len(),
            })
    }

    /// Finds a node by the id it had in the input file.
    pub fn node_by_original_id(&self, id: i64) -> Result<NodeRef<'_>, LookupError> {
        self.index_of
            .get(&id)
            .map(|&index| self.node_at(index))
            .ok_or(LookupError::NotFound { what: "node", id })
    }

    /// Iterates over nodes in dense index order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeRef<'_>> {
        self.nodes.iter().map(move |node| NodeRef { graph: self, node })
    }

    /// Iterates over edges in document order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = EdgeRef<'_>> {
        self.edges.iter().map(move |edge| EdgeRef { graph: self, edge })
    }

    // Indices stored in nodes and edges are checked at build time.
    fn node_at(&self, index: usize) -> NodeRef<'_> {
        NodeRef {
            graph: self,
            node: &self.nodes[index],
        }
    }

    fn edge_at(&self, index: usize) -> EdgeRef<'_> {
        EdgeRef {
            graph: self,
            edge: &self.edges[index],
        }
    }
}

/// Node data. Use [`NodeRef`] to navigate from a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) index: usize,
    pub(crate) original_id: i64,
    pub(crate) label: Labeler,
    pub(crate) group: Option<usize>,
    pub(crate) is_group: bool,
    pub(crate) inputs: Vec<usize>,
    pub(crate) outputs: Vec<usize>,
    pub(crate) children: Vec<usize>,
}

impl Node {
    /// Returns the dense index of this node.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the id this node had in the input file.
    pub fn original_id(&self) -> i64 {
        self.original_id
    }

    pub fn label(&self) -> &Labeler {
        &self.label
    }

    /// Returns true if the node is a group container.
    pub fn is_group(&self) -> bool {
        self.is_group
    }

    /// Returns the dense index of the owning group, or `-1` if the node is
    /// not in a group.
    pub fn group_id(&self) -> i64 {
        self.group.map_or(-1, |g| g as i64)
    }

    /// Returns the dense index of the owning group.
    pub fn group_index(&self) -> Option<usize> {
        self.group
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Returns the indices of incoming edges, in document order.
    pub fn input_indices(&self) -> &[usize] {
        &self.inputs
    }

    /// Returns the indices of outgoing edges, in document order.
    pub fn output_indices(&self) -> &[usize] {
        &self.outputs
    }

    /// Returns the dense indices of group members.
    pub fn child_indices(&self) -> &[usize] {
        &self.children
    }
}

/// Edge data. Use [`EdgeRef`] to reach the endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub(crate) index: usize,
    pub(crate) src: usize,
    pub(crate) dst: usize,
    pub(crate) label: Labeler,
    pub(crate) color: Color,
}

impl Edge {
    /// Returns the position of this edge in the graph's edge list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the dense index of the source node.
    pub fn src_index(&self) -> usize {
        self.src
    }

    /// Returns the dense index of the destination node.
    pub fn dst_index(&self) -> usize {
        self.dst
    }

    pub fn label(&self) -> &Labeler {
        &self.label
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns `(r, g, b, 255)`. XGML colors carry no alpha.
    pub fn color_rgba(&self) -> (u8, u8, u8, u8) {
        self.color.rgba()
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// A node borrowed together with its graph.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'g> {
    graph: &'g Graph,
    node: &'g Node,
}

impl<'g> NodeRef<'g> {
    /// Returns the plain node data with the graph's lifetime.
    pub fn node(self) -> &'g Node {
        self.node
    }

    pub fn graph(self) -> &'g Graph {
        self.graph
    }

    /// Returns incoming edge number `n`.
    pub fn input(self, n: usize) -> Result<EdgeRef<'g>, LookupError> {
        self.edge_in(&self.node.inputs, n, "input")
    }

    /// Returns outgoing edge number `n`.
    pub fn output(self, n: usize) -> Result<EdgeRef<'g>, LookupError> {
        self.edge_in(&self.node.outputs, n, "output")
    }

    /// Returns group member number `n`.
    pub fn child(self, n: usize) -> Result<NodeRef<'g>, LookupError> {
        let children = &self.node.children;
        children
            .get(n)
            .map(|&c| self.graph.node_at(c))
            .ok_or(LookupError::IndexOutOfRange {
                what: "child",
                index: n,
                len: children.len(),
            })
    }

    pub fn inputs(self) -> impl ExactSizeIterator<Item = EdgeRef<'g>> {
        let graph = self.graph;
        self.node.inputs.iter().map(move |&e| graph.edge_at(e))
    }

    pub fn outputs(self) -> impl ExactSizeIterator<Item = EdgeRef<'g>> {
        let graph = self.graph;
        self.node.outputs.iter().map(move |&e| graph.edge_at(e))
    }

    pub fn children(self) -> impl ExactSizeIterator<Item = NodeRef<'g>> {
        let graph = self.graph;
        self.node.children.iter().map(move |&c| graph.node_at(c))
    }

    /// Returns the group this node belongs to, or `None`.
    pub fn group(self) -> Option<NodeRef<'g>> {
        self.node.group.map(|g| self.graph.node_at(g))
    }

    /// Iterates over enclosing groups, nearest first.
    pub fn ancestors(self) -> Ancestors<'g> {
        Ancestors { next: self.group() }
    }

    /// Returns this node's incoming edges followed by those of every
    /// enclosing group, nearest group first.
    ///
    /// An edge into a group counts as an edge into each of its members.
    pub fn group_inputs(self) -> Vec<EdgeRef<'g>> {
        std::iter::once(self)
            .chain(self.ancestors())
            .flat_map(|n| n.inputs())
            .collect()
    }

    /// Returns this node's outgoing edges followed by those of every
    /// enclosing group, nearest group first.
    pub fn group_outputs(self) -> Vec<EdgeRef<'g>> {
        std::iter::once(self)
            .chain(self.ancestors())
            .flat_map(|n| n.outputs())
            .collect()
    }

    fn edge_in(
        &self,
        list: &[usize],
        n: usize,
        what: &'static str,
    ) -> Result<EdgeRef<'g>, LookupError> {
        list.get(n)
            .map(|&e| self.graph.edge_at(e))
            .ok_or(LookupError::IndexOutOfRange {
                what,
                index: n,
                len: list.len(),
            })
    }
}

impl Deref for NodeRef<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.node
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.node.index == other.node.index
    }
}

impl Eq for NodeRef<'_> {}

/// Iterator over the enclosing groups of a node.
#[derive(Debug, Clone)]
pub struct Ancestors<'g> {
    next: Option<NodeRef<'g>>,
}

impl<'g> Iterator for Ancestors<'g> {
    type Item = NodeRef<'g>;

    fn next(&mut self) -> Option<NodeRef<'g>> {
        // The builder rejects group cycles, so the chain always reaches a
        // node without a group.
        let current = self.next?;
        self.next = current.group();
        Some(current)
    }
}

/// An edge borrowed together with its graph.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRef<'g> {
    graph: &'g Graph,
    edge: &'g Edge,
}

impl<'g> EdgeRef<'g> {
    /// Returns the plain edge data with the graph's lifetime.
    pub fn edge(self) -> &'g Edge {
        self.edge
    }

    pub fn src(self) -> NodeRef<'g> {
        self.graph.node_at(self.edge.src)
    }

    pub fn dst(self) -> NodeRef<'g> {
        self.graph.node_at(self.edge.dst)
    }
}

impl Deref for EdgeRef<'_> {
    type Target = Edge;

    fn deref(&self) -> &Edge {
        self.edge
    }
}

impl PartialEq for EdgeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.edge.index == other.edge.index
    }
}

impl Eq for EdgeRef<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// group(0) contains group(1), which contains leaf(2). Edge 0 enters the
    /// outer group, edge 1 leaves the inner group, edge 2 leaves the leaf.
    fn nested_graph() -> Graph {
        let node = |index, group, is_group, inputs, outputs, children| Node {
            index,
            original_id: index as i64 * 10,
            label: Labeler::new(format!("n{index}")),
            group,
            is_group,
            inputs,
            outputs,
            children,
        };
        let edge = |index, src, dst| Edge {
            index,
            src,
            dst,
            label: Labeler::default(),
            color: Color::BLACK,
        };
        Graph {
            hierarchic: 1,
            label: String::new(),
            directed: 1,
            nodes: vec![
                node(0, None, true, vec![0], vec![], vec![1]),
                node(1, Some(0), true, vec![], vec![1], vec![2]),
                node(2, Some(1), false, vec![], vec![2], vec![]),
                node(3, None, false, vec![1, 2], vec![0], vec![]),
            ],
            edges: vec![edge(0, 3, 0), edge(1, 1, 3), edge(2, 2, 3)],
            index_of: (0..4).map(|i| (i as i64 * 10, i)).collect(),
        }
    }

    #[test]
    fn test_bounds_checked_access() {
        let graph = nested_graph();
        assert!(graph.node(3).is_ok());
        assert_eq!(
            graph.node(4).unwrap_err(),
            LookupError::IndexOutOfRange { what: "node", index: 4, len: 4 }
        );
        assert!(matches!(graph.edge(3), Err(LookupError::IndexOutOfRange { what: "edge", .. })));

        let leaf = graph.node(2).unwrap();
        assert!(matches!(leaf.input(0), Err(LookupError::IndexOutOfRange { what: "input", .. })));
        assert!(matches!(leaf.child(0), Err(LookupError::IndexOutOfRange { what: "child", .. })));
    }

    #[test]
    fn test_positional_access() {
        let graph = nested_graph();
        let sink = graph.node(3).unwrap();
        assert_eq!(sink.input(0).unwrap().index(), 1);
        assert_eq!(sink.input(1).unwrap().index(), 2);
        assert_eq!(sink.output(0).unwrap().index(), 0);
        assert_eq!(sink.output(0).unwrap().dst().index(), 0);
        assert!(matches!(sink.output(1), Err(LookupError::IndexOutOfRange { what: "output", len: 1, .. })));

        let outer = graph.node(0).unwrap();
        assert_eq!(outer.child(0).unwrap().index(), 1);
        assert_eq!(outer.child(0).unwrap().child(0).unwrap().index(), 2);
        assert!(outer.child(1).is_err());
    }

    #[test]
    fn test_index_slices() {
        let graph = nested_graph();
        let sink = graph.node(3).unwrap();
        assert_eq!(sink.input_indices(), &[1, 2]);
        assert_eq!(sink.output_indices(), &[0]);
        assert_eq!(graph.node(0).unwrap().child_indices(), &[1]);
        assert_eq!(graph.node(2).unwrap().group_index(), Some(1));
        assert_eq!(graph.node(0).unwrap().group_index(), None);

        let node: &Node = sink.node();
        assert_eq!(node.original_id(), 30);

        let e = graph.edge(2).unwrap();
        assert_eq!((e.src_index(), e.dst_index()), (2, 3));
    }

    #[test]
    fn test_original_id_lookup() {
        let graph = nested_graph();
        assert_eq!(graph.node_by_original_id(20).unwrap().index(), 2);
        assert_eq!(
            graph.node_by_original_id(21).unwrap_err(),
            LookupError::NotFound { what: "node", id: 21 }
        );
    }

    #[test]
    fn test_group_and_ancestors() {
        let graph = nested_graph();
        let leaf = graph.node(2).unwrap();
        assert_eq!(leaf.group_id(), 1);
        assert_eq!(leaf.group(), Some(graph.node(1).unwrap()));

        let chain: Vec<usize> = leaf.ancestors().map(|n| n.index()).collect();
        assert_eq!(chain, vec![1, 0]);

        let outer = graph.node(0).unwrap();
        assert_eq!(outer.group(), None);
        assert_eq!(outer.group_id(), -1);
        assert_eq!(outer.ancestors().count(), 0);
    }

    #[test]
    fn test_group_edges_include_ancestors() {
        let graph = nested_graph();
        let leaf = graph.node(2).unwrap();

        let inputs: Vec<usize> = leaf.group_inputs().iter().map(|e| e.index()).collect();
        assert_eq!(inputs, vec![0]);

        let outputs: Vec<usize> = leaf.group_outputs().iter().map(|e| e.index()).collect();
        assert_eq!(outputs, vec![2, 1]);

        // Ungrouped node: own edges only.
        let other = graph.node(3).unwrap();
        assert_eq!(other.group_inputs().len(), other.num_inputs());
        assert_eq!(other.group_outputs().len(), other.num_outputs());
    }

    #[test]
    fn test_edge_endpoints() {
        let graph = nested_graph();
        let e = graph.edge(1).unwrap();
        assert_eq!(e.src().index(), 1);
        assert_eq!(e.dst().index(), 3);
        assert_eq!(e.color_rgba(), (0, 0, 0, 255));
        assert!(e.src().outputs().any(|o| o == e));
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::new(255, 0, 171).to_string(), "#FF00AB");
        assert_eq!(Color::default(), Color::BLACK);
    }
}

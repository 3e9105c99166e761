//! Shared types for circlink overlap graphs.

use serde::{Deserialize, Serialize};

use crate::builder::{EdgeSearch, SortOrder};
use crate::connectivity::CycleGuard;

/// A bare coordinate pair used to name a node by location.
///
/// Points carry no radius. They only appear at the query boundary,
/// where they are resolved to graph nodes by exact coordinate match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if `node` sits at exactly this location.
    ///
    /// No tolerance is applied: only bit-for-bit equal coordinates
    /// (with `0.0 == -0.0`) match.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn matches(self, node: &Node) -> bool {
        self.x == node.x && self.y == node.y
    }

    /// Hashable identity of this location.
    ///
    /// Negative zero is folded into positive zero so the key agrees
    /// with `==` for every finite coordinate.
    pub(crate) fn key(self) -> (u64, u64) {
        ((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits())
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A circular region: center coordinates plus a radius.
///
/// Identity for every matching purpose is the `(x, y)` center alone.
/// The radius only takes part in the overlap test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Horizontal center position.
    pub x: f64,
    /// Vertical center position.
    pub y: f64,
    /// Radius, never negative.
    pub r: f64,
}

impl Node {
    /// Create a new node.
    #[must_use]
    pub const fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    /// The center of the circle.
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns `true` if both nodes share the same center.
    #[must_use]
    pub fn same_origin(&self, other: &Self) -> bool {
        self.center().matches(other)
    }

    /// Explains why this node cannot be placed in a graph, if it can't.
    #[must_use]
    pub fn defect(&self) -> Option<&'static str> {
        if !self.x.is_finite() || !self.y.is_finite() {
            Some("center coordinates must be finite")
        } else if !self.r.is_finite() || self.r < 0.0 {
            Some("radius must be finite and non-negative")
        } else {
            None
        }
    }

    /// Returns `true` if the node may be added to a graph.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.defect().is_none()
    }
}

/// Position of a node within [`Graph::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub(crate) const fn from_position(position: usize) -> Self {
        Self(position)
    }

    /// The raw position in the node list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A directed adjacency between two overlapping nodes.
///
/// `from` always precedes `to` in the sorted node order when the edge
/// was derived by [`crate::builder::build`]. The connectivity walk
/// relies on that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The leading node.
    pub from: NodeIndex,
    /// The trailing node.
    pub to: NodeIndex,
}

/// Declared field dimensions.
///
/// Carried on the graph but never checked against node coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Field width.
    pub width: f64,
    /// Field height.
    pub height: f64,
}

impl Bounds {
    /// Create new bounds.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An append-only collection of nodes and the edges between them.
///
/// Nothing is ever removed. Every edge in the graph refers to nodes that
/// exist in [`nodes`](Self::nodes); deserialization enforces the same
/// rule and rejects dangling edges and invalid nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "GraphRepr")]
pub struct Graph {
    bounds: Bounds,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Create an empty graph with the given declared bounds.
    #[must_use]
    pub const fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// The declared bounds.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// All nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by index.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.0)
    }

    /// Append a node.
    ///
    /// A node with non-finite coordinates or a negative radius is
    /// ignored: the graph is left untouched and `None` is returned.
    pub fn add_node(&mut self, node: Node) -> Option<NodeIndex> {
        if !node.is_valid() {
            return None;
        }
        self.nodes.push(node);
        Some(NodeIndex(self.nodes.len() - 1))
    }

    /// Append an edge from `from` to `to`.
    ///
    /// An edge naming a node that is not in the graph is ignored: the
    /// graph is left untouched and `None` is returned.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) -> Option<Edge> {
        if self.node(from).is_none() || self.node(to).is_none() {
            return None;
        }
        let edge = Edge { from, to };
        self.edges.push(edge);
        Some(edge)
    }

    /// The leading node of `edge`, or `None` if `edge` names a node
    /// outside this graph.
    #[must_use]
    pub fn source(&self, edge: Edge) -> Option<&Node> {
        self.node(edge.from)
    }

    /// The trailing node of `edge`, or `None` if `edge` names a node
    /// outside this graph.
    #[must_use]
    pub fn target(&self, edge: Edge) -> Option<&Node> {
        self.node(edge.to)
    }
}

/// Why a serialized graph could not be loaded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// A node cannot be placed in a graph.
    #[error("node {index} is invalid: {reason}")]
    InvalidNode {
        /// Position in the node list.
        index: usize,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// An edge names a node that is not in the graph.
    #[error("edge {index} ({} -> {}) refers to a missing node", .from.index(), .to.index())]
    DanglingEdge {
        /// Position in the edge list.
        index: usize,
        /// The leading node index.
        from: NodeIndex,
        /// The trailing node index.
        to: NodeIndex,
    },
}

/// Unchecked wire form of [`Graph`].
#[derive(Deserialize)]
struct GraphRepr {
    #[serde(default)]
    bounds: Bounds,
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl TryFrom<GraphRepr> for Graph {
    type Error = GraphError;

    fn try_from(repr: GraphRepr) -> Result<Self, Self::Error> {
        let mut graph = Self::new(repr.bounds);
        for (index, node) in repr.nodes.into_iter().enumerate() {
            if let Some(reason) = node.defect() {
                return Err(GraphError::InvalidNode { index, reason });
            }
            graph.add_node(node);
        }
        for (index, Edge { from, to }) in repr.edges.into_iter().enumerate() {
            if graph.add_edge(from, to).is_none() {
                return Err(GraphError::DanglingEdge { index, from, to });
            }
        }
        Ok(graph)
    }
}

/// Configuration for building and querying a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// How nodes are ordered before edges are derived.
    pub sort_order: SortOrder,

    /// How overlap candidates are located during edge derivation.
    pub edge_search: EdgeSearch,

    /// How the connectivity walk protects itself from cycles.
    pub cycle_guard: CycleGuard,

    /// Maximum path length for [`CycleGuard::IterationCap`].
    ///
    /// Reaching this many edges yields `false` even if the chain would
    /// eventually end at the target.
    pub safety_limit: usize,
}

impl CheckConfig {
    /// Default [`sort_order`](Self::sort_order).
    pub const DEFAULT_SORT_ORDER: SortOrder = SortOrder::XThenY;
    /// Default [`edge_search`](Self::edge_search).
    pub const DEFAULT_EDGE_SEARCH: EdgeSearch = EdgeSearch::Linear;
    /// Default [`cycle_guard`](Self::cycle_guard).
    pub const DEFAULT_CYCLE_GUARD: CycleGuard = CycleGuard::VisitedSet;
    /// Default [`safety_limit`](Self::safety_limit).
    pub const DEFAULT_SAFETY_LIMIT: usize = 10;
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            sort_order: Self::DEFAULT_SORT_ORDER,
            edge_search: Self::DEFAULT_EDGE_SEARCH,
            cycle_guard: Self::DEFAULT_CYCLE_GUARD,
            safety_limit: Self::DEFAULT_SAFETY_LIMIT,
        }
    }
}

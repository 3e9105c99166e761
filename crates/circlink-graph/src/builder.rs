//! Graph construction: order the nodes, then derive edges from overlap.
//!
//! Each node gets at most one outgoing edge: scanning forward through
//! the sorted node list from its own position, the first overlapping
//! node wins and the scan stops. The result is never a general graph,
//! only a union of disjoint directed chains, and the connectivity walk
//! in [`crate::connectivity`] depends on exactly that shape.

use std::cmp::Ordering;

use rstar::RTree;
use rstar::primitives::GeomWithData;
use serde::{Deserialize, Serialize};

use crate::overlap::is_edge;
use crate::types::{Bounds, CheckConfig, Graph, Node, NodeIndex};

/// Selects the node ordering applied before edge derivation.
///
/// The ordering decides which successor wins when a node overlaps
/// several later nodes, so it changes which edges exist whenever
/// nodes share an X coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// X ascending, ties broken by Y ascending.
    #[default]
    XThenY,

    /// X ascending only. Nodes with equal X keep their input order.
    ///
    /// Matches the legacy comparator, whose Y tie-break could never
    /// fire.
    XOnly,
}

impl SortOrder {
    /// Compare two nodes under this ordering.
    #[must_use]
    pub fn compare(self, a: &Node, b: &Node) -> Ordering {
        match self {
            Self::XThenY => a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)),
            Self::XOnly => a.x.total_cmp(&b.x),
        }
    }
}

/// Selects how overlap candidates are found for each node.
///
/// Both strategies produce identical edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeSearch {
    /// Scan every later node in order. Quadratic in the node count.
    #[default]
    Linear,

    /// Query an R\*-tree of node centers for circles within reach,
    /// then pick the earliest overlapping one.
    Spatial,
}

/// Sort `nodes` in place. The sort is stable.
pub fn sort_nodes(nodes: &mut [Node], order: SortOrder) {
    nodes.sort_by(|a, b| order.compare(a, b));
}

/// Build a graph from an unordered collection of nodes.
///
/// The nodes are sorted per `config.sort_order` and appended in that
/// order (invalid nodes are skipped, see [`Graph::add_node`]), then one
/// edge at most is derived for each node.
#[must_use]
pub fn build(bounds: Bounds, nodes: &[Node], config: &CheckConfig) -> Graph {
    let mut sorted = nodes.to_vec();
    sort_nodes(&mut sorted, config.sort_order);

    let mut graph = Graph::new(bounds);
    for node in sorted {
        graph.add_node(node);
    }

    let links = match config.edge_search {
        EdgeSearch::Linear => link_linear(graph.nodes()),
        EdgeSearch::Spatial => link_spatial(graph.nodes()),
    };

    for (from, to) in links {
        if let Some(edge) = graph.add_edge(from, to)
            && let (Some(a), Some(b)) = (graph.source(edge), graph.target(edge))
        {
            tracing::debug!(from = %a.center(), to = %b.center(), "derived edge");
        }
    }

    graph
}

/// For each position, the first position at or after it that overlaps.
fn link_linear(nodes: &[Node]) -> Vec<(NodeIndex, NodeIndex)> {
    let mut links = Vec::new();
    for (i, base) in nodes.iter().enumerate() {
        // The base node itself is covered by the scan and rejected by
        // the overlap test's self-exclusion.
        if let Some(j) = (i..nodes.len()).find(|&j| is_edge(base, &nodes[j])) {
            links.push((NodeIndex::from_position(i), NodeIndex::from_position(j)));
        }
    }
    links
}

/// Same links as [`link_linear`], with candidates drawn from an R\*-tree.
fn link_spatial(nodes: &[Node]) -> Vec<(NodeIndex, NodeIndex)> {
    let max_radius = nodes.iter().map(|n| n.r).fold(0.0, f64::max);
    let centers: Vec<GeomWithData<[f64; 2], usize>> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| GeomWithData::new([n.x, n.y], i))
        .collect();
    let tree = RTree::bulk_load(centers);

    let mut links = Vec::new();
    for (i, base) in nodes.iter().enumerate() {
        // Every overlapping center lies within base.r + max_radius. The
        // padding keeps the query a superset under rounding; the exact
        // predicate below decides.
        let reach = base.r + max_radius;
        let padded = reach.mul_add(1e-9, reach) + f64::EPSILON;
        let found = tree
            .locate_within_distance([base.x, base.y], padded * padded)
            .map(|candidate| candidate.data)
            .filter(|&j| j >= i && is_edge(base, &nodes[j]))
            .min();
        if let Some(j) = found {
            links.push((NodeIndex::from_position(i), NodeIndex::from_position(j)));
        }
    }
    links
}

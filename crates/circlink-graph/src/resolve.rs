//! Query boundary: resolve two points to graph nodes, then check
//! whether the resolved nodes are transitively connected.
//!
//! A query that never reaches the chain walk fails with a
//! [`Resolution`]; one that does answers with a [`Verdict`].

use serde::{Deserialize, Serialize};

use crate::connectivity::{self, Verdict};
use crate::types::{CheckConfig, Graph, NodeIndex, Point};

/// A cheap precondition that rejects a query outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precondition {
    /// No graph was supplied.
    NoGraph,
    /// No start point was supplied.
    NoStartPoint,
    /// No end point was supplied.
    NoEndPoint,
    /// The graph holds fewer than two nodes.
    TooFewNodes,
    /// The graph holds no edges.
    NoEdges,
}

impl std::fmt::Display for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NoGraph => "no graph",
            Self::NoStartPoint => "no start point",
            Self::NoEndPoint => "no end point",
            Self::TooFewNodes => "graph has fewer than two nodes",
            Self::NoEdges => "graph has no edges",
        })
    }
}

/// Why a query never reached the chain walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Resolution {
    /// The query was rejected before any node lookup.
    #[error("query rejected: {0}")]
    MissingPrecondition(Precondition),
    /// At least one query point matches no node.
    #[error("query points not found in graph (start found: {start_found}, end found: {end_found})")]
    Unresolved {
        /// Whether a node matched the start point.
        start_found: bool,
        /// Whether a node matched the end point.
        end_found: bool,
    },
}

/// Find the nodes sitting exactly at `start` and `end`.
///
/// Scans the node list once, keeping the first match for each point
/// and stopping as soon as both are found. A node claimed by `start` is
/// not also offered to `end`, so identical query points never resolve
/// to a single node.
#[must_use]
pub fn resolve_nodes(
    graph: &Graph,
    start: Point,
    end: Point,
) -> (Option<NodeIndex>, Option<NodeIndex>) {
    let mut found_start = None;
    let mut found_end = None;

    for (i, node) in graph.nodes().iter().enumerate() {
        if found_start.is_some() && found_end.is_some() {
            break;
        }

        if found_start.is_none() && start.matches(node) {
            found_start = Some(NodeIndex::from_position(i));
        } else if found_end.is_none() && end.matches(node) {
            found_end = Some(NodeIndex::from_position(i));
        }
    }

    (found_start, found_end)
}

/// Decide whether the nodes at `start` and `end` are transitively
/// connected.
///
/// The boolean answer is `Ok(verdict)` with
/// [`Verdict::is_connected`]; any `Err` means `false`.
///
/// # Errors
///
/// Fails closed with [`Resolution::MissingPrecondition`] when an input
/// is absent or the graph is too small to hold a path, and with
/// [`Resolution::Unresolved`] when a point matches no node.
pub fn resolve_connectivity(
    graph: Option<&Graph>,
    start: Option<Point>,
    end: Option<Point>,
    config: &CheckConfig,
) -> Result<Verdict, Resolution> {
    let (graph, start, end) = match (graph, start, end) {
        (None, _, _) => return Err(Resolution::MissingPrecondition(Precondition::NoGraph)),
        (_, None, _) => return Err(Resolution::MissingPrecondition(Precondition::NoStartPoint)),
        (_, _, None) => return Err(Resolution::MissingPrecondition(Precondition::NoEndPoint)),
        (Some(graph), Some(start), Some(end)) => (graph, start, end),
    };
    if graph.nodes().len() < 2 {
        return Err(Resolution::MissingPrecondition(Precondition::TooFewNodes));
    }
    if graph.edges().is_empty() {
        return Err(Resolution::MissingPrecondition(Precondition::NoEdges));
    }

    let (found_start, found_end) = resolve_nodes(graph, start, end);
    let start_node = found_start.and_then(|i| graph.node(i));
    let end_node = found_end.and_then(|i| graph.node(i));
    let (Some(start_node), Some(end_node)) = (start_node, end_node) else {
        tracing::warn!(
            %start,
            %end,
            start_found = start_node.is_some(),
            end_found = end_node.is_some(),
            "could not find both points in graph's nodes",
        );
        return Err(Resolution::Unresolved {
            start_found: start_node.is_some(),
            end_found: end_node.is_some(),
        });
    };

    Ok(connectivity::check(graph, start_node, end_node, config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Node;

    fn graph_with(nodes: &[Node], edges: &[(usize, usize)]) -> Graph {
        let mut graph = Graph::default();
        let indices: Vec<_> = nodes.iter().map(|&n| graph.add_node(n).unwrap()).collect();
        for &(a, b) in edges {
            graph.add_edge(indices[a], indices[b]).unwrap();
        }
        graph
    }

    fn query(
        graph: Option<&Graph>,
        start: Option<Point>,
        end: Option<Point>,
    ) -> Result<Verdict, Resolution> {
        resolve_connectivity(graph, start, end, &CheckConfig::default())
    }

    #[test]
    fn no_graph() {
        let verdict = query(None, Some(Point::new(0.0, 0.0)), Some(Point::new(1.0, 1.0)));
        assert_eq!(verdict, Err(Resolution::MissingPrecondition(Precondition::NoGraph)));
    }

    #[test]
    fn no_start_point() {
        let graph = Graph::default();
        let verdict = query(Some(&graph), None, Some(Point::new(1.0, 1.0)));
        assert_eq!(
            verdict,
            Err(Resolution::MissingPrecondition(Precondition::NoStartPoint))
        );
    }

    #[test]
    fn no_end_point() {
        let graph = Graph::default();
        let verdict = query(Some(&graph), Some(Point::new(2.0, 3.0)), None);
        assert_eq!(
            verdict,
            Err(Resolution::MissingPrecondition(Precondition::NoEndPoint))
        );
    }

    #[test]
    fn empty_graph() {
        let graph = Graph::default();
        let verdict = query(
            Some(&graph),
            Some(Point::new(2.0, 3.0)),
            Some(Point::new(6.0, 3.0)),
        );
        assert_eq!(
            verdict,
            Err(Resolution::MissingPrecondition(Precondition::TooFewNodes))
        );
    }

    #[test]
    fn single_node_graph() {
        let graph = graph_with(&[Node::new(0.0, 10.0, 0.0)], &[]);
        let verdict = query(
            Some(&graph),
            Some(Point::new(0.0, 10.0)),
            Some(Point::new(0.0, 10.0)),
        );
        assert_eq!(
            verdict,
            Err(Resolution::MissingPrecondition(Precondition::TooFewNodes))
        );
    }

    #[test]
    fn graph_without_edges() {
        let graph = graph_with(&[Node::new(0.0, 10.0, 0.0), Node::new(10.0, 0.0, 0.0)], &[]);
        let verdict = query(
            Some(&graph),
            Some(Point::new(0.0, 10.0)),
            Some(Point::new(10.0, 0.0)),
        );
        assert_eq!(
            verdict,
            Err(Resolution::MissingPrecondition(Precondition::NoEdges))
        );
    }

    #[test]
    fn no_nodes_match_points() {
        let graph = graph_with(
            &[Node::new(0.0, 0.0, 3.0), Node::new(0.0, 5.0, 3.0)],
            &[(0, 1)],
        );
        let verdict = query(
            Some(&graph),
            Some(Point::new(2.0, 3.0)),
            Some(Point::new(6.0, 3.0)),
        );
        assert_eq!(
            verdict,
            Err(Resolution::Unresolved {
                start_found: false,
                end_found: false
            })
        );
    }

    #[test]
    fn only_start_matches() {
        let graph = graph_with(
            &[Node::new(0.0, 0.0, 3.0), Node::new(0.0, 5.0, 3.0)],
            &[(0, 1)],
        );
        let verdict = query(
            Some(&graph),
            Some(Point::new(0.0, 0.0)),
            Some(Point::new(6.0, 3.0)),
        );
        assert_eq!(
            verdict,
            Err(Resolution::Unresolved {
                start_found: true,
                end_found: false
            })
        );
    }

    #[test]
    fn identical_points_do_not_share_a_node() {
        let graph = graph_with(
            &[Node::new(0.0, 0.0, 3.0), Node::new(0.0, 5.0, 3.0)],
            &[(0, 1)],
        );
        let p = Point::new(0.0, 0.0);
        assert_eq!(
            query(Some(&graph), Some(p), Some(p)),
            Err(Resolution::Unresolved {
                start_found: true,
                end_found: false
            })
        );
    }

    #[test]
    fn identical_points_resolve_to_duplicate_nodes() {
        let graph = graph_with(
            &[
                Node::new(0.0, 0.0, 3.0),
                Node::new(0.0, 0.0, 1.0),
                Node::new(0.0, 5.0, 3.0),
            ],
            &[(0, 2)],
        );
        let p = Point::new(0.0, 0.0);
        let (start, end) = resolve_nodes(&graph, p, p);
        assert_eq!(start.unwrap().index(), 0);
        assert_eq!(end.unwrap().index(), 1);
    }

    #[test]
    fn resolution_keeps_first_match() {
        let graph = graph_with(
            &[
                Node::new(1.0, 1.0, 1.0),
                Node::new(4.0, 4.0, 1.0),
                Node::new(1.0, 1.0, 9.0),
            ],
            &[],
        );
        let (start, end) = resolve_nodes(&graph, Point::new(1.0, 1.0), Point::new(4.0, 4.0));
        assert_eq!(start.unwrap().index(), 0);
        assert_eq!(end.unwrap().index(), 1);
    }

    #[test]
    fn start_connected_but_end_is_not() {
        let graph = graph_with(
            &[
                Node::new(0.0, 0.0, 2.0),
                Node::new(0.0, 3.0, 2.0),
                Node::new(0.0, 10.0, 2.0),
            ],
            &[(0, 1)],
        );
        let verdict = query(
            Some(&graph),
            Some(Point::new(0.0, 0.0)),
            Some(Point::new(0.0, 10.0)),
        );
        assert_eq!(verdict, Ok(Verdict::Disconnected));
    }

    #[test]
    fn out_of_order_nodes_fully_connected() {
        let nodes = [
            Node::new(10.0, 10.0, 3.0),
            Node::new(3.0, 3.0, 2.0),
            Node::new(7.0, 5.0, 2.0),
            Node::new(5.0, 3.0, 2.0),
            Node::new(0.0, 0.0, 3.0),
            Node::new(7.0, 8.0, 2.0),
        ];
        let graph = graph_with(&nodes, &[(4, 1), (1, 3), (3, 2), (2, 5), (5, 0)]);
        let verdict = query(
            Some(&graph),
            Some(Point::new(0.0, 0.0)),
            Some(Point::new(10.0, 10.0)),
        );
        assert_eq!(verdict, Ok(Verdict::Connected));
    }

    #[test]
    fn graph_loaded_from_json_is_queried() {
        let json = r#"{
            "nodes": [{"x": 0.0, "y": 0.0, "r": 1.0}, {"x": 1.0, "y": 0.0, "r": 1.0}],
            "edges": [{"from": 0, "to": 1}]
        }"#;
        let graph: Graph = serde_json::from_str(json).unwrap();
        let verdict = query(
            Some(&graph),
            Some(Point::new(0.0, 0.0)),
            Some(Point::new(1.0, 0.0)),
        );
        assert_eq!(verdict, Ok(Verdict::Connected));
    }

    #[test]
    fn graph_with_dangling_edge_never_loads() {
        let json = r#"{
            "nodes": [{"x": 0.0, "y": 0.0, "r": 1.0}, {"x": 1.0, "y": 0.0, "r": 1.0}],
            "edges": [{"from": 0, "to": 5}]
        }"#;
        assert!(serde_json::from_str::<Graph>(json).is_err());
    }

    #[test]
    fn resolution_display() {
        assert_eq!(
            Resolution::MissingPrecondition(Precondition::NoEdges).to_string(),
            "query rejected: graph has no edges",
        );
        assert_eq!(
            Resolution::Unresolved {
                start_found: true,
                end_found: false
            }
            .to_string(),
            "query points not found in graph (start found: true, end found: false)",
        );
    }
}

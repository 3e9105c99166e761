//! Connectivity walk: follow a chain of edges from a start node and
//! report whether it ends at a target node.
//!
//! The walk treats the edge list as a singly linked chain. Starting
//! from the first edge whose leading node sits at the start location,
//! it repeatedly looks up, across the *whole* edge list, the first
//! edge leading out of the previous edge's trailing node. When no such
//! edge exists the chain is over, and the nodes are connected iff the
//! last trailing node sits at the end location.
//!
//! This only answers correctly for graphs made of disjoint simple
//! chains, which is what [`crate::builder::build`] produces. Branching
//! graphs would need a breadth- or depth-first search instead.
//!
//! Cycles would make the walk run forever, so it is guarded by either
//! an exact visited-node set or the legacy fixed iteration cap (see
//! [`CycleGuard`]).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{CheckConfig, Edge, Graph, Node, Point};

/// Selects how the walk protects itself from cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CycleGuard {
    /// Track every visited location and stop the moment one repeats.
    #[default]
    VisitedSet,

    /// Give up once the path holds [`CheckConfig::safety_limit`] edges.
    ///
    /// Approximate: long acyclic chains are rejected too, and the
    /// caller cannot tell a cycle from a disconnection.
    IterationCap,
}

/// Outcome of a connectivity query.
///
/// Only [`Connected`](Self::Connected) means `true`; every other variant
/// is a `false` answer that records why.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    /// The chain from the start node ends at the end node.
    Connected,
    /// The chain from the start node ends somewhere else.
    Disconnected,
    /// No edge leads out of the start node.
    NoStartingEdge,
    /// The path grew to the configured safety limit.
    SafetyLimitReached {
        /// Number of edges in the path when the walk gave up.
        path_len: usize,
    },
    /// The chain returned to a location it had already visited.
    CycleDetected {
        /// The repeated location.
        at: Point,
    },
}

impl Verdict {
    /// The boolean answer to the query.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected => write!(f, "connected"),
            Self::Disconnected => write!(f, "disconnected"),
            Self::NoStartingEdge => write!(f, "no edge leads out of the start node"),
            Self::SafetyLimitReached { path_len } => {
                write!(f, "safety limit reached after {path_len} edges")
            }
            Self::CycleDetected { at } => write!(f, "cycle detected at {at}"),
        }
    }
}

/// The first edge whose leading node sits at `origin`.
#[must_use]
pub fn find_edge(graph: &Graph, origin: Point) -> Option<Edge> {
    graph
        .edges()
        .iter()
        .copied()
        .find(|&edge| graph.source(edge).is_some_and(|node| origin.matches(node)))
}

/// Walk the chain leading out of `start` and report where it ends.
///
/// Both nodes are expected to be in `graph`; they are only compared by
/// location, so copies work just as well.
#[must_use]
pub fn check(graph: &Graph, start: &Node, end: &Node, config: &CheckConfig) -> Verdict {
    let Some(first) = find_edge(graph, start.center()) else {
        return Verdict::NoStartingEdge;
    };

    let mut visited = HashSet::new();
    visited.insert(start.center().key());

    let mut path = Vec::new();
    let mut last_target = None;
    let mut next = Some(first);
    while let Some(edge) = next {
        // An edge leading nowhere ends the chain.
        let Some(target) = graph.target(edge) else {
            break;
        };
        let reached = target.center();
        if config.cycle_guard == CycleGuard::VisitedSet && !visited.insert(reached.key()) {
            tracing::warn!(
                at = %reached,
                path_len = path.len(),
                "cycle detected while checking transitive connectivity"
            );
            return Verdict::CycleDetected { at: reached };
        }
        path.push(edge);
        last_target = Some(target);

        if config.cycle_guard == CycleGuard::IterationCap && path.len() >= config.safety_limit {
            tracing::warn!(
                path_len = path.len(),
                "safety limit reached while checking transitive connectivity"
            );
            return Verdict::SafetyLimitReached {
                path_len: path.len(),
            };
        }

        next = find_edge(graph, reached);
    }

    match last_target {
        Some(last) if end.center().matches(last) => Verdict::Connected,
        _ => Verdict::Disconnected,
    }
}

/// Boolean form of [`check`].
#[must_use]
pub fn are_transitively_connected(
    graph: &Graph,
    start: &Node,
    end: &Node,
    config: &CheckConfig,
) -> bool {
    check(graph, start, end, config).is_connected()
}

//! Run diagnostics: graph counts, the verdict, and per-phase timings.
//!
//! Timestamps come from a caller-supplied [`Clock`] so this crate never
//! touches the system clock itself. Durations are serialized as
//! fractional seconds (`f64`), since `std::time::Duration` does not
//! implement serde traits.

use std::time::Duration;

use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

use crate::connectivity::Verdict;
use crate::resolve::Resolution;
use crate::types::{Graph, Point};

/// Source of timestamps for phase timings.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// A [`Clock`] that never advances. Every duration is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClock;

impl Clock for NoClock {
    type Instant = ();

    fn now(&self) -> Self::Instant {}

    fn elapsed(&self, _since: &()) -> Duration {
        Duration::ZERO
    }
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Everything a caller learns from one [`crate::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Boundary point the query started from, if one was given.
    pub start: Option<Point>,
    /// Boundary point the query aimed for, if one was given.
    pub end: Option<Point>,
    /// Nodes placed in the graph.
    pub node_count: usize,
    /// Edges derived from overlap.
    pub edge_count: usize,
    /// Disjoint chains formed by the edges.
    pub chain_count: usize,
    /// Detailed outcome of the query: the walk's verdict, or why the
    /// query never reached the walk.
    pub outcome: Result<Verdict, Resolution>,
    /// The boolean answer.
    pub connected: bool,
    /// Time spent sorting nodes and deriving edges (seconds).
    #[serde(with = "duration_serde")]
    pub build_duration: Duration,
    /// Time spent resolving points and walking the chain (seconds).
    #[serde(with = "duration_serde")]
    pub check_duration: Duration,
}

impl Report {
    /// Format the report as a human-readable block.
    #[must_use]
    pub fn summary(&self) -> String {
        let fmt_point =
            |p: Option<Point>| p.map_or_else(|| "(none)".to_string(), |p| p.to_string());

        let mut lines = Vec::new();
        lines.push(format!("Connectivity Report\n{}", "=".repeat(40)));
        lines.push(format!(
            "From {} to {}",
            fmt_point(self.start),
            fmt_point(self.end),
        ));
        lines.push(format!(
            "Nodes: {}  |  Edges: {}  |  Chains: {}",
            self.node_count, self.edge_count, self.chain_count,
        ));
        lines.push(format!(
            "Build: {:.3}ms  |  Check: {:.3}ms",
            duration_ms(self.build_duration),
            duration_ms(self.check_duration),
        ));
        lines.push(match self.outcome {
            Ok(verdict) => format!("Verdict: {verdict}"),
            Err(resolution) => format!("Verdict: {resolution}"),
        });
        lines.push(format!("Connected? {}", self.connected));
        lines.join("\n")
    }
}

/// Count the disjoint chains in `graph`.
///
/// A chain is a connected component of the edge set; nodes without any
/// edge are not counted.
#[must_use]
pub fn chain_count(graph: &Graph) -> usize {
    let n = graph.nodes().len();
    let mut components = UnionFind::<usize>::new(n);
    let mut linked = vec![false; n];

    let placed = graph
        .edges()
        .iter()
        .filter(|&&edge| graph.source(edge).is_some() && graph.target(edge).is_some());
    for edge in placed {
        components.union(edge.from.index(), edge.to.index());
        linked[edge.from.index()] = true;
        linked[edge.to.index()] = true;
    }

    let mut roots: Vec<usize> = (0..n)
        .filter(|&i| linked[i])
        .map(|i| components.find(i))
        .collect();
    roots.sort_unstable();
    roots.dedup();
    roots.len()
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

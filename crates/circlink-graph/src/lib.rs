//! circlink-graph: overlap graphs of circles and end-to-end connectivity
//! checks (sans-IO).
//!
//! Builds a graph whose nodes are circles and whose edges join circles
//! that overlap, then answers one question: is there a chain of
//! overlapping circles from one boundary point to another?
//!
//! ```text
//! Scenario -> builder::build -> Graph -> resolve::resolve_connectivity -> Result<Verdict, Resolution>
//! ```
//!
//! This crate has **no I/O dependencies** -- it works on in-memory
//! values and reports through `tracing`. Argument parsing, file loading
//! and subscriber setup live in the `circlink` binary.

pub mod builder;
pub mod connectivity;
pub mod diagnostics;
pub mod overlap;
pub mod resolve;
pub mod scenario;
pub mod types;

pub use builder::{EdgeSearch, SortOrder};
pub use connectivity::{CycleGuard, Verdict};
pub use diagnostics::{Clock, NoClock, Report};
pub use resolve::{Precondition, Resolution};
pub use scenario::{Scenario, ScenarioError};
pub use types::{Bounds, CheckConfig, Edge, Graph, GraphError, Node, NodeIndex, Point};

/// Build the scenario's graph and check whether its boundary points
/// are transitively connected.
///
/// Nodes that cannot be placed in a graph are skipped rather than
/// rejected; call [`Scenario::validate`] first to surface them as
/// errors instead. A missing start or end point yields a
/// [`Resolution::MissingPrecondition`] outcome.
pub fn run<C: Clock>(scenario: &Scenario, config: &CheckConfig, clock: &C) -> Report {
    let started = clock.now();
    let graph = builder::build(scenario.bounds, &scenario.nodes, config);
    let build_duration = clock.elapsed(&started);

    tracing::info!(
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        "built overlap graph"
    );

    let started = clock.now();
    let outcome =
        resolve::resolve_connectivity(Some(&graph), scenario.start, scenario.end, config);
    let check_duration = clock.elapsed(&started);
    let connected = outcome.is_ok_and(Verdict::is_connected);

    match outcome {
        Ok(verdict) => tracing::info!(connected, %verdict, "checked transitive connectivity"),
        Err(resolution) => tracing::info!(connected, %resolution, "query not resolved"),
    }

    Report {
        start: scenario.start,
        end: scenario.end,
        node_count: graph.nodes().len(),
        edge_count: graph.edges().len(),
        chain_count: diagnostics::chain_count(&graph),
        outcome,
        connected,
        build_duration,
        check_duration,
    }
}

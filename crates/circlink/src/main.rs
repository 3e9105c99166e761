//! circlink: check whether two boundary points are linked by a chain of
//! overlapping circles.
//!
//! Loads a scenario (circles plus start/end points) from a JSON file, or
//! uses the built-in sample, builds the overlap graph and prints a
//! connectivity report.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin circlink -- [OPTIONS] [SCENARIO_PATH]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use circlink_graph::{CheckConfig, Clock, CycleGuard, EdgeSearch, Point, Scenario, SortOrder};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Check transitive connectivity between two points through overlapping
/// circles.
#[derive(Parser)]
#[command(name = "circlink", version)]
struct Cli {
    /// Path to a JSON scenario. Uses the built-in sample when omitted.
    scenario_path: Option<PathBuf>,

    /// Start point as "X,Y", overriding the scenario's.
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    start: Option<Point>,

    /// End point as "X,Y", overriding the scenario's.
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    end: Option<Point>,

    /// Node ordering applied before edges are derived.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_SORT_ORDER)]
    sort_order: Order,

    /// How the connectivity walk guards against cycles.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_CYCLE_GUARD)]
    cycle_guard: Guard,

    /// Maximum path length for the iteration-cap guard.
    #[arg(long, default_value_t = CheckConfig::DEFAULT_SAFETY_LIMIT, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    safety_limit: usize,

    /// How overlap candidates are located.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_EDGE_SEARCH)]
    edge_search: Search,

    /// Full check config as a JSON string.
    ///
    /// When provided, the individual config flags are ignored. The JSON
    /// must be a valid `CheckConfig` serialization; omitted fields take
    /// their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Print the report as JSON instead of a human-readable summary.
    #[arg(long)]
    json: bool,
}

/// Node ordering selection.
#[derive(Clone, Copy, ValueEnum)]
enum Order {
    /// X ascending, then Y ascending.
    XThenY,
    /// X ascending only; ties keep input order.
    XOnly,
}

/// Cycle guard selection.
#[derive(Clone, Copy, ValueEnum)]
enum Guard {
    /// Stop when the walk revisits a location.
    VisitedSet,
    /// Stop when the path reaches the safety limit.
    IterationCap,
}

/// Edge search selection.
#[derive(Clone, Copy, ValueEnum)]
enum Search {
    /// Scan later nodes in order.
    Linear,
    /// Query an R*-tree of node centers.
    Spatial,
}

const fn order_from_config(o: SortOrder) -> Order {
    match o {
        SortOrder::XThenY => Order::XThenY,
        SortOrder::XOnly => Order::XOnly,
    }
}

const fn guard_from_config(g: CycleGuard) -> Guard {
    match g {
        CycleGuard::VisitedSet => Guard::VisitedSet,
        CycleGuard::IterationCap => Guard::IterationCap,
    }
}

const fn search_from_config(s: EdgeSearch) -> Search {
    match s {
        EdgeSearch::Linear => Search::Linear,
        EdgeSearch::Spatial => Search::Spatial,
    }
}

/// CLI defaults, derived from [`CheckConfig`] so the two cannot
/// silently diverge.
const CLI_DEFAULT_SORT_ORDER: Order = order_from_config(CheckConfig::DEFAULT_SORT_ORDER);
const CLI_DEFAULT_CYCLE_GUARD: Guard = guard_from_config(CheckConfig::DEFAULT_CYCLE_GUARD);
const CLI_DEFAULT_EDGE_SEARCH: Search = search_from_config(CheckConfig::DEFAULT_EDGE_SEARCH);

/// Parse an `"X,Y"` pair into a [`Point`].
fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"X,Y\", got {s:?}"))?;
    let x: f64 = x
        .trim()
        .parse()
        .map_err(|e| format!("invalid X coordinate {x:?}: {e}"))?;
    let y: f64 = y
        .trim()
        .parse()
        .map_err(|e| format!("invalid Y coordinate {y:?}: {e}"))?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(format!("coordinates must be finite, got {s:?}"));
    }
    Ok(Point::new(x, y))
}

/// Build a [`CheckConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual config flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<CheckConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(CheckConfig {
        sort_order: match cli.sort_order {
            Order::XThenY => SortOrder::XThenY,
            Order::XOnly => SortOrder::XOnly,
        },
        cycle_guard: match cli.cycle_guard {
            Guard::VisitedSet => CycleGuard::VisitedSet,
            Guard::IterationCap => CycleGuard::IterationCap,
        },
        edge_search: match cli.edge_search {
            Search::Linear => EdgeSearch::Linear,
            Search::Spatial => EdgeSearch::Spatial,
        },
        safety_limit: cli.safety_limit,
    })
}

/// Load the scenario named on the command line and apply point overrides.
fn scenario_from_cli(cli: &Cli) -> Result<Scenario, String> {
    let mut scenario = match cli.scenario_path {
        Some(ref path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
            serde_json::from_str::<Scenario>(&text)
                .map_err(|e| format!("Error parsing {}: {e}", path.display()))?
        }
        None => Scenario::sample(),
    };

    if cli.start.is_some() {
        scenario.start = cli.start;
    }
    if cli.end.is_some() {
        scenario.end = cli.end;
    }

    scenario
        .validate()
        .map_err(|e| format!("Invalid scenario: {e}"))?;
    Ok(scenario)
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let scenario = match scenario_from_cli(&cli) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let fmt_point =
        |p: Option<Point>| p.map_or_else(|| "(none)".to_string(), |p| p.to_string());
    tracing::info!(
        "Checking transitive connectivity from {} to {}",
        fmt_point(scenario.start),
        fmt_point(scenario.end),
    );

    let report = circlink_graph::run(&scenario, &config, &StdClock);
    tracing::info!(
        "Added {} nodes and {} edges",
        report.node_count,
        report.edge_count
    );
    tracing::info!("Connected? {}", report.connected);

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", report.summary());
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_point_accepts_pairs() {
        assert_eq!(parse_point("0,10").unwrap(), Point::new(0.0, 10.0));
        assert_eq!(parse_point(" 1.5 , -2 ").unwrap(), Point::new(1.5, -2.0));
    }

    #[test]
    fn parse_point_rejects_garbage() {
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,1").is_err());
        assert!(parse_point("1,NaN").is_err());
    }

    #[test]
    fn flags_build_config() {
        let cli = Cli::parse_from([
            "circlink",
            "--sort-order",
            "x-only",
            "--cycle-guard",
            "iteration-cap",
            "--safety-limit",
            "4",
            "--edge-search",
            "spatial",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(
            config,
            CheckConfig {
                sort_order: SortOrder::XOnly,
                cycle_guard: CycleGuard::IterationCap,
                safety_limit: 4,
                edge_search: EdgeSearch::Spatial,
            }
        );
    }

    #[test]
    fn defaults_match_check_config() {
        let cli = Cli::parse_from(["circlink"]);
        assert_eq!(config_from_cli(&cli).unwrap(), CheckConfig::default());
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = Cli::parse_from([
            "circlink",
            "--sort-order",
            "x-only",
            "--config-json",
            r#"{"cycle_guard":"IterationCap"}"#,
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.sort_order, SortOrder::XThenY);
        assert_eq!(config.cycle_guard, CycleGuard::IterationCap);
    }

    #[test]
    fn bad_config_json_is_reported() {
        let cli = Cli::parse_from(["circlink", "--config-json", "{"]);
        assert!(
            config_from_cli(&cli)
                .unwrap_err()
                .starts_with("Error parsing --config-json")
        );
    }

    #[test]
    fn zero_safety_limit_is_rejected() {
        assert!(Cli::try_parse_from(["circlink", "--safety-limit", "0"]).is_err());
    }

    #[test]
    fn point_overrides_replace_sample_points() {
        let cli = Cli::parse_from(["circlink", "--start", "2,8", "--end", "8,2"]);
        let scenario = scenario_from_cli(&cli).unwrap();
        assert_eq!(scenario.start, Some(Point::new(2.0, 8.0)));
        assert_eq!(scenario.end, Some(Point::new(8.0, 2.0)));
        assert_eq!(scenario.nodes, Scenario::sample().nodes);
    }

    #[test]
    fn missing_scenario_file_is_reported() {
        let cli = Cli::parse_from(["circlink", "/nonexistent/circlink-scenario.json"]);
        assert!(scenario_from_cli(&cli).unwrap_err().starts_with("Error reading"));
    }
}

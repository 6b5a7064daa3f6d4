//! Placement engine for the Tessera toolchain.
//!
//! This crate takes a circuit [`Netlist`](tessera_model::Netlist) and
//! produces a legal, optimized placement of its movable components on the
//! chip canvas.
//!
//! # Pipeline
//!
//! 1. **Seed** — one leaf per movable component, rows wrapped at the canvas
//!    width
//! 2. **Cluster** — deterministic k-means over current positions
//! 3. **Partition** — per-cluster subproblems, locally bisected or
//!    delegated to an external solver with automatic fallback
//! 4. **Refine** — simulated-annealing local search over the slicing tree
//! 5. **Evaluate** — legality verdict and exact wirelength via
//!    `tessera_eval`
//!
//! # Usage
//!
//! ```ignore
//! use tessera_place::{run_placement, CancelToken, PlacerOptions};
//!
//! let options = PlacerOptions::for_canvas(200, 200);
//! let result = run_placement(&netlist, &options, &sink, CancelToken::new())?;
//! assert!(result.report.legal);
//! ```

#![warn(missing_docs)]

pub mod cluster;
pub mod cost;
pub mod engine;
pub mod error;
pub mod options;
pub mod partition;
pub mod refine;
pub mod tree;

pub use cluster::{Cluster, ClusterPoint, KMeans};
pub use cost::{score_tree, CostModel, DistanceTable};
pub use engine::{CancelToken, EngineState, PlacementEngine, RunStats};
pub use error::PlaceError;
pub use options::PlacerOptions;
pub use tree::{Axis, FloorplanTree, LeafPosition, NodeId, Orientation, TreeError};

use tessera_diagnostics::DiagnosticSink;
use tessera_eval::EvalReport;
use tessera_model::{Netlist, Placement};

/// The result of one placement run.
#[derive(Debug)]
pub struct PlacementResult {
    /// Final placement of every movable component.
    pub placements: Vec<Placement>,
    /// The last clustering pass, for export/plotting.
    pub clusters: Vec<Cluster>,
    /// Aggregate run statistics.
    pub stats: RunStats,
    /// The evaluator's verdict on the final placement.
    pub report: EvalReport,
}

/// Runs the complete placement pipeline on a netlist.
///
/// Builds the distance table sized to the canvas, runs the engine state
/// machine to completion, evaluates the final tree, and returns placements
/// plus statistics. A cancelled run still returns its partial placement
/// with `stats.cancelled` set; only an out-of-range cost lookup or an
/// internal bug produces `Err`.
pub fn run_placement(
    netlist: &Netlist,
    options: &PlacerOptions,
    sink: &DiagnosticSink,
    cancel: CancelToken,
) -> Result<PlacementResult, PlaceError> {
    // Built once per run; shared read-only from here on.
    let table = DistanceTable::for_canvas(options.canvas_width, options.canvas_height);

    let engine = PlacementEngine::new(netlist, options, &table, sink, cancel);
    let outcome = engine.run()?;

    let placements: Vec<Placement> = outcome
        .tree
        .positions()
        .iter()
        .map(|p| Placement {
            component: p.component,
            x: p.x,
            y: p.y,
            rotated: p.orientation.is_rotated(),
        })
        .collect();

    let report = tessera_eval::evaluate(&placements, netlist, options.canvas());

    Ok(PlacementResult {
        placements,
        clusters: outcome.clusters,
        stats: outcome.stats,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::time::Duration;
    use tessera_model::{Component, ComponentId};

    /// Four unit components inserted in scrambled order (a, c, b, d) so the
    /// seeded row separates both connected pairs.
    fn scrambled_pairs_netlist() -> (Netlist, [ComponentId; 4]) {
        let mut nl = Netlist::new();
        let a = nl.add_component(Component::macro_block("a", 1, 1));
        let c = nl.add_component(Component::macro_block("c", 1, 1));
        let b = nl.add_component(Component::macro_block("b", 1, 1));
        let d = nl.add_component(Component::macro_block("d", 1, 1));
        nl.connect(a, b, 1);
        nl.connect(c, d, 1);
        (nl, [a, b, c, d])
    }

    fn placed(result: &PlacementResult, id: ComponentId) -> (i64, i64) {
        result
            .placements
            .iter()
            .find(|p| p.component == id)
            .map(|p| (p.x, p.y))
            .unwrap()
    }

    #[test]
    fn connected_pairs_end_adjacent_on_small_canvas() {
        let (nl, [a, b, c, d]) = scrambled_pairs_netlist();
        let mut options = PlacerOptions::for_canvas(10, 10);
        options.cluster_count = 2;
        // Near-greedy schedule keeps the cost trace monotone for the assert.
        options.initial_temperature = 0.05;

        let sink = DiagnosticSink::new();
        let result = run_placement(&nl, &options, &sink, CancelToken::new()).unwrap();

        assert!(
            result.stats.final_cost < result.stats.initial_cost,
            "cost {} -> {}",
            result.stats.initial_cost,
            result.stats.final_cost
        );

        for (x, y) in [(a, b), (c, d)].map(|(p, q)| {
            let (px, py) = placed(&result, p);
            let (qx, qy) = placed(&result, q);
            (px.abs_diff(qx), py.abs_diff(qy))
        }) {
            assert!(x <= 1 && y <= 1, "pair ended ({x}, {y}) apart");
        }

        assert!(result.report.legal, "{:?}", result.report.violations);
        assert!(!result.stats.degraded);
    }

    #[test]
    fn solver_timeout_degrades_but_completes() {
        // A backend that accepts and reads but never answers: every
        // delegation times out, falls back locally, and the run finishes.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = listener.local_addr().unwrap().to_string();
        std::thread::spawn(move || {
            while let Ok((mut stream, _)) = listener.accept() {
                let mut sink = Vec::new();
                let _ = stream.read_to_end(&mut sink);
            }
        });

        let mut nl = Netlist::new();
        for i in 0..8 {
            nl.add_component(Component::macro_block(format!("m{i}"), 1, 1));
        }
        let mut options = PlacerOptions::for_canvas(10, 10);
        options.cluster_count = 2;
        options.move_budget = 300;
        options.solver_endpoint = Some(endpoint);
        options.solver_timeout = Duration::from_millis(150);

        let sink = DiagnosticSink::new();
        let result = run_placement(&nl, &options, &sink, CancelToken::new()).unwrap();

        assert!(result.stats.degraded);
        assert!(result.stats.solver_fallbacks > 0);
        assert_eq!(result.stats.solver_delegations, 0);
        assert_eq!(result.placements.len(), 8);
        assert!(!sink.has_errors());
    }

    #[test]
    fn cancelled_run_returns_partial_result() {
        let (nl, _) = scrambled_pairs_netlist();
        let options = PlacerOptions::for_canvas(10, 10);
        let cancel = CancelToken::new();
        cancel.cancel();

        let sink = DiagnosticSink::new();
        let result = run_placement(&nl, &options, &sink, cancel).unwrap();

        assert!(result.stats.cancelled);
        assert!(result.placements.is_empty());
    }

    #[test]
    fn infeasible_canvas_aborts_with_lookup_error() {
        // More area than the canvas can hold: seeding must overflow the
        // canvas height and the very first score hits the table bounds.
        let mut nl = Netlist::new();
        for i in 0..9 {
            nl.add_component(Component::macro_block(format!("m{i}"), 2, 2));
        }
        nl.connect(ComponentId::from_raw(0), ComponentId::from_raw(8), 1);
        let options = PlacerOptions::for_canvas(4, 4);

        let sink = DiagnosticSink::new();
        let err = run_placement(&nl, &options, &sink, CancelToken::new()).unwrap_err();
        assert!(matches!(err, PlaceError::OutOfRangeLookup { .. }));
    }

    #[test]
    fn stats_serialize_for_export() {
        let (nl, _) = scrambled_pairs_netlist();
        let mut options = PlacerOptions::for_canvas(10, 10);
        options.move_budget = 100;

        let sink = DiagnosticSink::new();
        let result = run_placement(&nl, &options, &sink, CancelToken::new()).unwrap();

        let json = serde_json::to_string(&result.stats).unwrap();
        assert!(json.contains("\"final_cost\""));
        assert!(json.contains("\"solver_fallbacks\""));
    }
}

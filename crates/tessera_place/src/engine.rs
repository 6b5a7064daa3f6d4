//! The placement state machine.
//!
//! Drives one run through `Seeding → Clustering → Partitioning → Refining →
//! Done`. Each state mutates the engine's floorplan tree and hands control
//! back; the run-level cancellation token is checked at every transition
//! (and again before each solver call inside partitioning), so a cancelled
//! run winds down at the next boundary with whatever placement it has.

use crate::cluster::{Cluster, ClusterPoint, KMeans};
use crate::cost::{score_tree, DistanceTable};
use crate::error::PlaceError;
use crate::options::PlacerOptions;
use crate::partition::build_partitioned_tree;
use crate::refine::refine;
use crate::tree::{Axis, FloorplanTree, NodeId};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tessera_common::InternalError;
use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use tessera_model::Netlist;
use tessera_solver::SolverClient;

/// A cloneable run-level cancellation flag.
///
/// Cancelling is a one-way latch: every clone observes it, and the engine
/// reacts at its next state transition or pre-solver check.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches the token; all clones observe the cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// The engine's current state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EngineState {
    /// Building the initial tree, one leaf per movable component.
    Seeding,
    /// Grouping components with k-means.
    Clustering,
    /// Rebuilding the tree from cluster subproblems.
    Partitioning,
    /// Annealing local search over the tree.
    Refining,
    /// The run is finished.
    Done,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Seeding => "seeding",
            EngineState::Clustering => "clustering",
            EngineState::Partitioning => "partitioning",
            EngineState::Refining => "refining",
            EngineState::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// Aggregate statistics for one placement run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunStats {
    /// Cost of the seeded tree.
    pub initial_cost: u64,
    /// Cost of the final tree.
    pub final_cost: u64,
    /// Clustering iterations actually run.
    pub cluster_passes: usize,
    /// Clusters produced by the clustering stage.
    pub cluster_count: usize,
    /// Refinement proposals made.
    pub proposed_moves: usize,
    /// Refinement proposals accepted.
    pub accepted_moves: usize,
    /// Proposals rejected for structural or canvas violations.
    pub structural_rejections: usize,
    /// Partition subproblems answered by the external solver.
    pub solver_delegations: usize,
    /// Partition subproblems that fell back to the local heuristic.
    pub solver_fallbacks: usize,
    /// `true` when any solver fallback degraded the result quality.
    pub degraded: bool,
    /// `true` when the run was cancelled before finishing.
    pub cancelled: bool,
}

/// The finished engine's tree, clusters, and statistics.
#[derive(Debug)]
pub struct EngineOutcome {
    /// The final floorplan tree.
    pub tree: FloorplanTree,
    /// The last clustering pass, kept for export/plotting.
    pub clusters: Vec<Cluster>,
    /// Run statistics.
    pub stats: RunStats,
}

/// Drives one placement run over a borrowed netlist.
pub struct PlacementEngine<'a> {
    netlist: &'a Netlist,
    options: &'a PlacerOptions,
    table: &'a DistanceTable,
    sink: &'a DiagnosticSink,
    client: Option<SolverClient>,
    cancel: CancelToken,
    state: EngineState,
    tree: FloorplanTree,
    clusters: Vec<Cluster>,
    stats: RunStats,
}

impl<'a> PlacementEngine<'a> {
    /// Creates an engine for one run.
    ///
    /// A solver client is constructed only when the options carry an
    /// endpoint; otherwise every subproblem uses the local heuristic.
    pub fn new(
        netlist: &'a Netlist,
        options: &'a PlacerOptions,
        table: &'a DistanceTable,
        sink: &'a DiagnosticSink,
        cancel: CancelToken,
    ) -> Self {
        let client = options
            .solver_endpoint
            .as_ref()
            .map(|endpoint| SolverClient::new(endpoint.clone(), options.solver_timeout));
        Self {
            netlist,
            options,
            table,
            sink,
            client,
            cancel,
            state: EngineState::Seeding,
            tree: FloorplanTree::new(Axis::Vertical),
            clusters: Vec::new(),
            stats: RunStats::default(),
        }
    }

    /// Returns the engine's current state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Runs the state machine to `Done` and returns the outcome.
    pub fn run(mut self) -> Result<EngineOutcome, PlaceError> {
        loop {
            if self.cancel.is_cancelled() && self.state != EngineState::Done {
                self.stats.cancelled = true;
                self.state = EngineState::Done;
            }
            match self.state {
                EngineState::Seeding => {
                    self.tree = self.seed_tree()?;
                    self.stats.initial_cost = score_tree(&self.tree, self.netlist, self.table)?;
                    self.stats.final_cost = self.stats.initial_cost;
                    self.state = EngineState::Clustering;
                }
                EngineState::Clustering => {
                    let points = self.cluster_points();
                    let outcome = KMeans::new(
                        self.options.cluster_count,
                        self.options.cluster_iterations,
                    )
                    .run(&points, self.sink);
                    self.stats.cluster_passes = outcome.iterations;
                    self.stats.cluster_count = outcome.clusters.len();
                    self.clusters = outcome.clusters;
                    self.state = EngineState::Partitioning;
                }
                EngineState::Partitioning => {
                    let (tree, outcome) = build_partitioned_tree(
                        self.netlist,
                        &self.clusters,
                        self.options.canvas(),
                        self.client.as_ref(),
                        self.sink,
                        &self.cancel,
                    )?;
                    self.tree = tree;
                    self.stats.solver_delegations = outcome.delegated;
                    self.stats.solver_fallbacks = outcome.fallbacks;
                    if outcome.fallbacks > 0 {
                        self.stats.degraded = true;
                    }
                    self.state = EngineState::Refining;
                }
                EngineState::Refining => {
                    let outcome = refine(
                        &mut self.tree,
                        self.netlist,
                        self.table,
                        self.options,
                        &self.cancel,
                    )?;
                    self.stats.proposed_moves = outcome.proposed;
                    self.stats.accepted_moves = outcome.accepted;
                    self.stats.structural_rejections = outcome.structural_rejections;
                    self.stats.final_cost = outcome.final_cost;
                    self.state = EngineState::Done;
                }
                EngineState::Done => break,
            }
        }

        self.sink.emit(
            Diagnostic::note(
                DiagnosticCode::new(Category::Placement, 300),
                format!(
                    "placement finished: cost {} -> {}, {} moves accepted",
                    self.stats.initial_cost, self.stats.final_cost, self.stats.accepted_moves
                ),
            ),
        );

        Ok(EngineOutcome {
            tree: self.tree,
            clusters: self.clusters,
            stats: self.stats,
        })
    }

    /// Builds the initial tree: rows of movable components in ID order,
    /// wrapped at the canvas width.
    fn seed_tree(&self) -> Result<FloorplanTree, PlaceError> {
        let mut tree = FloorplanTree::new(Axis::Vertical);
        let root = tree.root();
        let canvas_width = i64::from(self.options.canvas_width);

        let mut row: Option<NodeId> = None;
        let mut row_width = 0i64;
        for id in self.netlist.movable_components() {
            let component = self.netlist.component(id);
            let width = i64::from(component.width);
            if row.is_none() || (row_width > 0 && row_width + width > canvas_width) {
                row = Some(
                    tree.insert_slice(root, Axis::Horizontal)
                        .map_err(|e| InternalError::new(format!("seeding: {e}")))?,
                );
                row_width = 0;
            }
            let row_slice = row.ok_or_else(|| InternalError::new("seeding lost its row"))?;
            tree.insert_leaf(row_slice, id, component.width, component.height)
                .map_err(|e| InternalError::new(format!("seeding: {e}")))?;
            row_width += width;
        }
        Ok(tree)
    }

    /// Extracts clustering input from the current tree positions.
    fn cluster_points(&self) -> Vec<ClusterPoint> {
        self.tree
            .positions()
            .iter()
            .map(|p| ClusterPoint {
                component: p.component,
                x: p.x as f64,
                y: p.y as f64,
                area: self.netlist.component(p.component).area(),
            })
            .collect()
    }
}

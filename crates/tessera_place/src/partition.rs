//! Cluster-guided partitioning of the floorplan.
//!
//! Each cluster from the clustering stage becomes one partition subproblem:
//! its members are split into two balanced halves, recursively, and laid
//! out as a nested slicing subtree. The top-level split of every cluster
//! may be delegated to the external solver; because the subproblems touch
//! disjoint component sets, all delegations run concurrently on separate
//! connections and the answers are merged into the tree sequentially once
//! every call has returned. Any solver failure degrades that one cluster
//! to the local heuristic — partitioning itself never fails.

use crate::cluster::Cluster;
use crate::engine::CancelToken;
use crate::error::PlaceError;
use crate::tree::{Axis, FloorplanTree, NodeId, TreeError};
use std::thread;
use tessera_common::InternalError;
use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use tessera_model::{ComponentId, Netlist};
use tessera_solver::{
    PartitionRequest, PartitionResponse, SolverClient, SolverComponent, SolverWeight,
};

/// Below this size a component group is laid out directly, not split.
const SPLIT_THRESHOLD: usize = 3;

/// Statistics from one partitioning pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionOutcome {
    /// Subproblems answered by the external solver.
    pub delegated: usize,
    /// Subproblems that fell back to the local heuristic after a solver failure.
    pub fallbacks: usize,
}

/// How a cluster's top-level split was decided.
enum SplitSource {
    /// Local heuristic, either by configuration or after a solver failure.
    Local { after_failure: bool },
    /// The solver's bin assignment.
    Solver(Vec<ComponentId>, Vec<ComponentId>),
}

/// Builds a fresh partitioned tree from the clustering result.
///
/// Clusters are arranged into rows of a grid; inside each cluster the
/// members form a recursively bisected slicing subtree. Returns the tree
/// and delegation statistics.
pub fn build_partitioned_tree(
    netlist: &Netlist,
    clusters: &[Cluster],
    canvas: (u32, u32),
    client: Option<&SolverClient>,
    sink: &DiagnosticSink,
    cancel: &CancelToken,
) -> Result<(FloorplanTree, PartitionOutcome), PlaceError> {
    let mut outcome = PartitionOutcome::default();

    let splits = match client {
        Some(client) => delegate_top_splits(netlist, clusters, canvas, client, sink, cancel),
        None => clusters
            .iter()
            .map(|_| SplitSource::Local { after_failure: false })
            .collect(),
    };

    let mut tree = FloorplanTree::new(Axis::Vertical);
    let root = tree.root();

    // Arrange cluster subtrees into a near-square grid of rows.
    let rows = (clusters.len() as f64).sqrt().ceil().max(1.0) as usize;
    let per_row = clusters.len().div_ceil(rows).max(1);

    let mut row_slice: Option<NodeId> = None;
    for (index, (cluster, split)) in clusters.iter().zip(splits).enumerate() {
        if index % per_row == 0 {
            row_slice = Some(tree.insert_slice(root, Axis::Horizontal).map_err(tree_bug)?);
        }
        let row = row_slice.ok_or_else(|| InternalError::new("no current row slice"))?;

        let top_split = match split {
            SplitSource::Local { after_failure } => {
                if after_failure {
                    outcome.fallbacks += 1;
                }
                None
            }
            SplitSource::Solver(left, right) => {
                outcome.delegated += 1;
                Some((left, right))
            }
        };

        let cluster_slice = tree.insert_slice(row, Axis::Vertical).map_err(tree_bug)?;
        match top_split {
            Some((left, right)) => {
                build_group(&mut tree, cluster_slice, &left, netlist, Axis::Horizontal)?;
                build_group(&mut tree, cluster_slice, &right, netlist, Axis::Horizontal)?;
            }
            None => {
                let members = ordered_by_area(&cluster.members, netlist);
                build_split(&mut tree, cluster_slice, &members, netlist, Axis::Horizontal)?;
            }
        }
    }

    Ok((tree, outcome))
}

/// Ships every large cluster's top split to the solver, concurrently.
///
/// One scoped thread per cluster, one connection per request; no shared
/// mutable state. Results come back in cluster order and are merged by the
/// (sequential) caller.
fn delegate_top_splits(
    netlist: &Netlist,
    clusters: &[Cluster],
    canvas: (u32, u32),
    client: &SolverClient,
    sink: &DiagnosticSink,
    cancel: &CancelToken,
) -> Vec<SplitSource> {
    thread::scope(|scope| {
        let handles: Vec<_> = clusters
            .iter()
            .map(|cluster| {
                scope.spawn(move || {
                    if cluster.members.len() < SPLIT_THRESHOLD || cancel.is_cancelled() {
                        return SplitSource::Local { after_failure: false };
                    }
                    solve_cluster_split(netlist, cluster, canvas, client, sink)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(split) => split,
                // A panicked delegation thread degrades like any other
                // solver failure.
                Err(_) => SplitSource::Local { after_failure: true },
            })
            .collect()
    })
}

/// One solver round-trip for one cluster.
fn solve_cluster_split(
    netlist: &Netlist,
    cluster: &Cluster,
    canvas: (u32, u32),
    client: &SolverClient,
    sink: &DiagnosticSink,
) -> SplitSource {
    let request = split_request(netlist, cluster, canvas);
    match client.solve(&request) {
        Ok(PartitionResponse::Assignments(assignments)) => {
            match apply_assignments(&cluster.members, &assignments) {
                Some((left, right)) => SplitSource::Solver(left, right),
                None => {
                    fallback_warning(sink, cluster, "solver returned an incomplete assignment");
                    SplitSource::Local { after_failure: true }
                }
            }
        }
        Ok(PartitionResponse::Failure(reason)) => {
            fallback_warning(sink, cluster, &format!("solver reported failure: {reason}"));
            SplitSource::Local { after_failure: true }
        }
        Err(err) => {
            fallback_warning(sink, cluster, &err.to_string());
            SplitSource::Local { after_failure: true }
        }
    }
}

fn fallback_warning(sink: &DiagnosticSink, cluster: &Cluster, reason: &str) {
    sink.emit(
        Diagnostic::warning(
            DiagnosticCode::new(Category::Solver, 301),
            format!("{reason}; using local heuristic"),
        )
        .with_subject(cluster.name())
        .with_note("run quality is degraded"),
    );
}

/// Builds the wire request for one cluster's top split.
fn split_request(netlist: &Netlist, cluster: &Cluster, canvas: (u32, u32)) -> PartitionRequest {
    let components = cluster
        .members
        .iter()
        .map(|&id| {
            let component = netlist.component(id);
            SolverComponent {
                id: id.as_raw(),
                width: component.width,
                height: component.height,
            }
        })
        .collect();
    let weights = netlist
        .nets
        .values()
        .filter(|net| cluster.members.contains(&net.a) && cluster.members.contains(&net.b))
        .map(|net| SolverWeight {
            a: net.a.as_raw(),
            b: net.b.as_raw(),
            weight: net.weight,
        })
        .collect();
    PartitionRequest {
        canvas_width: canvas.0,
        canvas_height: canvas.1,
        bins: 2,
        components,
        weights,
    }
}

/// Converts a solver bin assignment into two member halves.
///
/// Returns `None` when any member is missing from the assignment or either
/// half ends up empty — both degrade to the local heuristic.
fn apply_assignments(
    members: &[ComponentId],
    assignments: &[tessera_solver::BinAssignment],
) -> Option<(Vec<ComponentId>, Vec<ComponentId>)> {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for &member in members {
        let assignment = assignments.iter().find(|a| a.id == member.as_raw())?;
        if assignment.bin == 0 {
            left.push(member);
        } else {
            right.push(member);
        }
    }
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some((left, right))
}

/// Sorts members by area descending (component ID breaks ties) — the local
/// heuristic's fill order.
fn ordered_by_area(members: &[ComponentId], netlist: &Netlist) -> Vec<ComponentId> {
    let mut ordered = members.to_vec();
    ordered.sort_by_key(|&id| (std::cmp::Reverse(netlist.component(id).area()), id));
    ordered
}

/// Splits an area-ordered group into two balanced halves by greedy
/// assignment to the lighter side.
fn balanced_halves(
    ordered: &[ComponentId],
    netlist: &Netlist,
) -> (Vec<ComponentId>, Vec<ComponentId>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let (mut left_area, mut right_area) = (0u64, 0u64);
    for &id in ordered {
        let area = netlist.component(id).area();
        if left_area <= right_area {
            left.push(id);
            left_area += area;
        } else {
            right.push(id);
            right_area += area;
        }
    }
    (left, right)
}

/// Recursively lays out a group under `parent`: small groups become leaf
/// rows, larger ones split into two subtrees with alternating axes.
fn build_split(
    tree: &mut FloorplanTree,
    parent: NodeId,
    ordered: &[ComponentId],
    netlist: &Netlist,
    axis: Axis,
) -> Result<(), PlaceError> {
    if ordered.len() < SPLIT_THRESHOLD {
        insert_leaves(tree, parent, ordered, netlist)?;
        return Ok(());
    }
    let (left, right) = balanced_halves(ordered, netlist);
    build_group(tree, parent, &left, netlist, axis)?;
    build_group(tree, parent, &right, netlist, axis)?;
    Ok(())
}

/// Wraps a group in its own slice node and lays it out.
fn build_group(
    tree: &mut FloorplanTree,
    parent: NodeId,
    members: &[ComponentId],
    netlist: &Netlist,
    axis: Axis,
) -> Result<(), PlaceError> {
    if members.is_empty() {
        return Ok(());
    }
    let slice = tree.insert_slice(parent, axis).map_err(tree_bug)?;
    let ordered = ordered_by_area(members, netlist);
    build_split(tree, slice, &ordered, netlist, axis.flipped())
}

fn insert_leaves(
    tree: &mut FloorplanTree,
    parent: NodeId,
    members: &[ComponentId],
    netlist: &Netlist,
) -> Result<(), PlaceError> {
    for &id in members {
        let component = netlist.component(id);
        tree.insert_leaf(parent, id, component.width, component.height)
            .map_err(tree_bug)?;
    }
    Ok(())
}

/// Partition construction only ever sees tree errors through its own bugs.
fn tree_bug(err: TreeError) -> PlaceError {
    InternalError::new(format!("partition tree construction: {err}")).into()
}

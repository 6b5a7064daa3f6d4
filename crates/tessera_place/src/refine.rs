//! Annealing refinement of the partitioned floorplan.
//!
//! Starting from the partitioner's tree, repeatedly proposes a structural
//! perturbation — swap two leaves, relocate a subtree, or flip a leaf's
//! orientation — scores the perturbed tree, and accepts the move on
//! improvement or with the Metropolis probability `exp(-Δ/T)`. The
//! temperature decays geometrically by the configured cooling factor,
//! shifting the walk from exploration to pure hill-climbing.
//!
//! A proposal the tree itself rejects (cycle, bad handle) or that grows the
//! floorplan beyond the canvas is undone and counted as a structural
//! rejection; it never touches the stall window. The stage ends on move
//! budget exhaustion, stall-window expiry, the temperature floor, or
//! cancellation.

use crate::cost::{score_tree, DistanceTable};
use crate::engine::CancelToken;
use crate::error::PlaceError;
use crate::options::PlacerOptions;
use crate::tree::{FloorplanTree, NodeId, TreeError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tessera_model::Netlist;

/// Temperature floor below which annealing stops.
const MIN_TEMPERATURE: f64 = 0.01;

/// Proposals per temperature step, as a multiplier of leaf count.
const MOVES_PER_TEMP_MULTIPLIER: usize = 10;

/// Statistics from one refinement stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefineOutcome {
    /// Cost of the tree the stage started from.
    pub initial_cost: u64,
    /// Cost of the tree the stage ended with.
    pub final_cost: u64,
    /// Proposals made (including structural rejections).
    pub proposed: usize,
    /// Proposals accepted.
    pub accepted: usize,
    /// Proposals rejected for violating tree or canvas constraints.
    pub structural_rejections: usize,
}

/// One reversible perturbation.
enum Move {
    SwapLeaves(NodeId, NodeId),
    Relocate {
        node: NodeId,
        new_parent: NodeId,
        index: usize,
    },
    Flip(NodeId),
}

/// What it takes to put a move back.
enum Undo {
    SwapLeaves(NodeId, NodeId),
    Relocate {
        node: NodeId,
        old_parent: NodeId,
        old_index: usize,
    },
    Flip(NodeId),
}

/// Refines the tree in place; returns stage statistics.
///
/// Only [`PlaceError::OutOfRangeLookup`] (or an internal bug) aborts the
/// stage — every structural failure is absorbed as a rejected proposal.
pub fn refine(
    tree: &mut FloorplanTree,
    netlist: &Netlist,
    table: &DistanceTable,
    options: &PlacerOptions,
    cancel: &CancelToken,
) -> Result<RefineOutcome, PlaceError> {
    let leaves = tree.leaf_handles();
    let slices = tree.slice_handles();

    let mut outcome = RefineOutcome {
        initial_cost: score_tree(tree, netlist, table)?,
        ..RefineOutcome::default()
    };
    outcome.final_cost = outcome.initial_cost;

    if leaves.len() < 2 {
        return Ok(outcome);
    }

    // Moves may never grow the floorplan beyond the canvas, nor beyond the
    // partitioner's own extent when that already overflows.
    let start_bbox = tree.bounding_box();
    let limit = (
        options.canvas_width.max(start_bbox.0),
        options.canvas_height.max(start_bbox.1),
    );

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut temperature = options.initial_temperature;
    let moves_per_temp = (leaves.len() * MOVES_PER_TEMP_MULTIPLIER).max(10);

    let mut current_cost = outcome.initial_cost;
    let mut stall = 0usize;

    'cooling: while temperature > MIN_TEMPERATURE {
        for _ in 0..moves_per_temp {
            if outcome.proposed >= options.move_budget
                || stall >= options.stall_window
                || cancel.is_cancelled()
            {
                break 'cooling;
            }
            outcome.proposed += 1;

            let proposal = propose(&mut rng, &leaves, &slices);
            let undo = match apply(tree, &proposal) {
                Ok(undo) => undo,
                Err(_) => {
                    outcome.structural_rejections += 1;
                    continue;
                }
            };

            let bbox = tree.bounding_box();
            if bbox.0 > limit.0 || bbox.1 > limit.1 {
                revert(tree, undo)?;
                outcome.structural_rejections += 1;
                continue;
            }

            let new_cost = score_tree(tree, netlist, table)?;
            let delta = new_cost as f64 - current_cost as f64;

            // Metropolis criterion
            if delta < 0.0 || rng.gen::<f64>() < (-delta / temperature).exp() {
                if new_cost < current_cost {
                    stall = 0;
                } else {
                    stall += 1;
                }
                current_cost = new_cost;
                outcome.accepted += 1;
            } else {
                revert(tree, undo)?;
                stall += 1;
            }
        }
        temperature *= options.cooling;
    }

    outcome.final_cost = current_cost;
    Ok(outcome)
}

/// Draws the next perturbation.
fn propose(rng: &mut StdRng, leaves: &[NodeId], slices: &[NodeId]) -> Move {
    match rng.gen_range(0..3u8) {
        0 => {
            let a = leaves[rng.gen_range(0..leaves.len())];
            let mut b = leaves[rng.gen_range(0..leaves.len())];
            if a == b {
                b = leaves[(leaves.iter().position(|&l| l == b).unwrap() + 1) % leaves.len()];
            }
            Move::SwapLeaves(a, b)
        }
        1 => {
            // Any node but the root may move; the tree's own cycle guard
            // rejects the illegal targets.
            let movable: &[NodeId] = if rng.gen::<bool>() { leaves } else { slices };
            let node = movable[rng.gen_range(0..movable.len())];
            let new_parent = slices[rng.gen_range(0..slices.len())];
            let index = rng.gen_range(0..8);
            Move::Relocate {
                node,
                new_parent,
                index,
            }
        }
        _ => Move::Flip(leaves[rng.gen_range(0..leaves.len())]),
    }
}

fn apply(tree: &mut FloorplanTree, proposal: &Move) -> Result<Undo, TreeError> {
    match *proposal {
        Move::SwapLeaves(a, b) => {
            tree.swap_leaves(a, b)?;
            Ok(Undo::SwapLeaves(a, b))
        }
        Move::Relocate {
            node,
            new_parent,
            index,
        } => {
            let old_parent = tree
                .parent(node)?
                .ok_or(TreeError::WouldCycle(node, new_parent))?;
            let old_index = tree
                .children(old_parent)?
                .iter()
                .position(|&c| c == node)
                .ok_or(TreeError::MissingNode(node))?;
            tree.relocate(node, new_parent, index)?;
            Ok(Undo::Relocate {
                node,
                old_parent,
                old_index,
            })
        }
        Move::Flip(node) => {
            tree.flip_orientation(node)?;
            Ok(Undo::Flip(node))
        }
    }
}

/// Puts a just-applied move back. Failure here is a logic error, not a
/// recoverable rejection.
fn revert(tree: &mut FloorplanTree, undo: Undo) -> Result<(), PlaceError> {
    let result = match undo {
        Undo::SwapLeaves(a, b) => tree.swap_leaves(a, b),
        Undo::Relocate {
            node,
            old_parent,
            old_index,
        } => tree.relocate(node, old_parent, old_index),
        Undo::Flip(node) => tree.flip_orientation(node),
    };
    result.map_err(|e| {
        tessera_common::InternalError::new(format!("failed to revert refinement move: {e}")).into()
    })
}

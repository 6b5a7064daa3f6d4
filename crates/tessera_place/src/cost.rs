//! Placement cost evaluation.
//!
//! The objective minimized by refinement is the weighted sum of pairwise
//! Euclidean distances over all nets. Distances are precomputed into a
//! dense lookup table once per canvas size, trading memory for eliminating
//! repeated square-root evaluation on the optimizer's hot path. The table
//! is immutable after [`DistanceTable::build`] and is shared by read-only
//! reference for the remainder of the run.

use crate::error::PlaceError;
use crate::tree::FloorplanTree;
use std::collections::HashMap;
use tessera_model::{ComponentId, Netlist};

/// Dense table of rounded Euclidean distances from the origin.
///
/// Entry `(i, j)` holds `round(sqrt(i² + j²))` for `0 ≤ i ≤ max_dx`,
/// `0 ≤ j ≤ max_dy`. Rebuilding is O(max_dx · max_dy) and happens once per
/// canvas-size change, never per evaluation.
#[derive(Debug, Clone)]
pub struct DistanceTable {
    max_dx: u32,
    max_dy: u32,
    entries: Vec<u64>,
}

impl DistanceTable {
    /// Builds a table covering offsets up to `(max_dx, max_dy)` inclusive.
    pub fn build(max_dx: u32, max_dy: u32) -> Self {
        let stride = max_dy as usize + 1;
        let mut entries = Vec::with_capacity((max_dx as usize + 1) * stride);
        for i in 0..=u64::from(max_dx) {
            for j in 0..=u64::from(max_dy) {
                let distance = ((i * i + j * j) as f64).sqrt().round() as u64;
                entries.push(distance);
            }
        }
        Self {
            max_dx,
            max_dy,
            entries,
        }
    }

    /// Builds a table sized for a canvas: any two points within the canvas
    /// are at most `(width, height)` apart.
    pub fn for_canvas(width: u32, height: u32) -> Self {
        Self::build(width, height)
    }

    /// Returns the precomputed distance for a non-negative offset pair.
    ///
    /// Fails with [`PlaceError::OutOfRangeLookup`] when either offset
    /// exceeds the built bounds. Callers must size the table to the largest
    /// offset they will query.
    pub fn lookup(&self, dx: u64, dy: u64) -> Result<u64, PlaceError> {
        if dx > u64::from(self.max_dx) || dy > u64::from(self.max_dy) {
            return Err(PlaceError::OutOfRangeLookup {
                dx,
                dy,
                max_dx: self.max_dx,
                max_dy: self.max_dy,
            });
        }
        let stride = self.max_dy as usize + 1;
        Ok(self.entries[dx as usize * stride + dy as usize])
    }

    /// Returns the largest offsets this table covers.
    pub fn bounds(&self) -> (u32, u32) {
        (self.max_dx, self.max_dy)
    }
}

/// Scores spatial configurations against a netlist's connectivity.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    table: &'a DistanceTable,
}

impl<'a> CostModel<'a> {
    /// Creates a cost model over a prebuilt distance table.
    pub fn new(table: &'a DistanceTable) -> Self {
        Self { table }
    }

    /// Sums `weight(a, b) × distance(a, b)` over all nets.
    ///
    /// Pairs with an endpoint missing from `positions` (an unplaced
    /// component) contribute nothing.
    pub fn score(
        &self,
        netlist: &Netlist,
        positions: &HashMap<ComponentId, (i64, i64)>,
    ) -> Result<u64, PlaceError> {
        let mut total = 0u64;
        for net in netlist.nets.values() {
            let (Some(&(xa, ya)), Some(&(xb, yb))) =
                (positions.get(&net.a), positions.get(&net.b))
            else {
                continue;
            };
            let dx = xa.abs_diff(xb);
            let dy = ya.abs_diff(yb);
            total += u64::from(net.weight) * self.table.lookup(dx, dy)?;
        }
        Ok(total)
    }
}

/// Scores the current tree against the netlist.
///
/// Movable components take their derived tree positions; fixed components
/// and terminals contribute their benchmark positions.
pub fn score_tree(
    tree: &FloorplanTree,
    netlist: &Netlist,
    table: &DistanceTable,
) -> Result<u64, PlaceError> {
    let mut positions: HashMap<ComponentId, (i64, i64)> = netlist
        .components
        .values()
        .filter(|c| !c.is_movable())
        .filter_map(|c| c.position.map(|p| (c.id, p)))
        .collect();
    for leaf in tree.positions() {
        positions.insert(leaf.component, (leaf.x, leaf.y));
    }
    CostModel::new(table).score(netlist, &positions)
}

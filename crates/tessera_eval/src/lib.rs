//! Final-placement evaluation.
//!
//! Checks a finished placement for legality — every component inside the
//! canvas, no two movable footprints overlapping — and computes a scalar
//! quality metric: the exact weighted Euclidean wirelength, evaluated in
//! floating point independently of the optimizer's rounded lookup table.
//! The verdict and metric go into the run result and the exported
//! statistics.

#![warn(missing_docs)]

use serde::Serialize;
use std::collections::HashMap;
use tessera_model::{ComponentId, Netlist, Placement};

/// A single legality violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Violation {
    /// A component's footprint crosses the canvas boundary.
    OutOfCanvas {
        /// The offending component.
        component: ComponentId,
    },
    /// Two placed footprints overlap.
    Overlap {
        /// The lower-ordinal component.
        a: ComponentId,
        /// The higher-ordinal component.
        b: ComponentId,
    },
}

/// The evaluation verdict for one finished placement.
#[derive(Clone, Debug, Serialize)]
pub struct EvalReport {
    /// `true` when no violations were found.
    pub legal: bool,
    /// Every violation found, in deterministic order.
    pub violations: Vec<Violation>,
    /// Weighted Euclidean wirelength of the placement.
    pub wirelength: f64,
}

/// Evaluates a placement against the netlist and canvas.
///
/// Components absent from `placements` (and lacking a benchmark position)
/// are skipped — an unplaced terminal is the input's concern, not a
/// placement violation.
pub fn evaluate(
    placements: &[Placement],
    netlist: &Netlist,
    canvas: (u32, u32),
) -> EvalReport {
    let mut violations = Vec::new();

    // Canvas containment, movable components only: terminals may sit on
    // (or outside) the boundary by construction.
    let mut footprints: Vec<(ComponentId, i64, i64, i64, i64)> = Vec::new();
    for placement in placements {
        let (width, height) = placement.footprint(netlist);
        let (x0, y0) = (placement.x, placement.y);
        let (x1, y1) = (x0 + i64::from(width), y0 + i64::from(height));

        if !netlist.component(placement.component).is_movable() {
            continue;
        }
        if x0 < 0 || y0 < 0 || x1 > i64::from(canvas.0) || y1 > i64::from(canvas.1) {
            violations.push(Violation::OutOfCanvas {
                component: placement.component,
            });
        }
        footprints.push((placement.component, x0, y0, x1, y1));
    }

    footprints.sort_by_key(|f| f.0);
    for (i, &(a, ax0, ay0, ax1, ay1)) in footprints.iter().enumerate() {
        for &(b, bx0, by0, bx1, by1) in &footprints[i + 1..] {
            let disjoint = ax1 <= bx0 || bx1 <= ax0 || ay1 <= by0 || by1 <= ay0;
            if !disjoint {
                violations.push(Violation::Overlap { a, b });
            }
        }
    }

    let wirelength = weighted_wirelength(placements, netlist);

    EvalReport {
        legal: violations.is_empty(),
        violations,
        wirelength,
    }
}

/// Exact weighted Euclidean wirelength over all nets.
///
/// Uses placed positions where available and benchmark positions for
/// everything else (fixed terminals).
pub fn weighted_wirelength(placements: &[Placement], netlist: &Netlist) -> f64 {
    let mut positions: HashMap<ComponentId, (i64, i64)> = netlist
        .components
        .values()
        .filter_map(|c| c.position.map(|p| (c.id, p)))
        .collect();
    for placement in placements {
        positions.insert(placement.component, (placement.x, placement.y));
    }

    let mut total = 0.0;
    for net in netlist.nets.values() {
        let (Some(&(xa, ya)), Some(&(xb, yb))) =
            (positions.get(&net.a), positions.get(&net.b))
        else {
            continue;
        };
        let dx = (xa - xb) as f64;
        let dy = (ya - yb) as f64;
        total += f64::from(net.weight) * (dx * dx + dy * dy).sqrt();
    }
    total
}

//! Run-fatal error types for the placement engine.
//!
//! Only two conditions abort a run: a cost-table lookup beyond its built
//! bounds (an upstream canvas-sizing bug that must not be silently
//! truncated) and an internal logic error. Everything else — structural
//! tree violations, cluster-count overflow, solver failures — is recovered
//! where it occurs and at worst degrades the result.

use tessera_common::InternalError;

/// Errors that abort a placement run.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// The cost evaluator was queried beyond its built bounds.
    #[error(
        "distance lookup ({dx}, {dy}) out of range: table built for ({max_dx}, {max_dy})"
    )]
    OutOfRangeLookup {
        /// Queried x offset.
        dx: u64,
        /// Queried y offset.
        dy: u64,
        /// Largest buildable x offset.
        max_dx: u32,
        /// Largest buildable y offset.
        max_dy: u32,
    },

    /// A logic error inside the engine.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

//! Opaque ID newtypes for circuit-model entities.
//!
//! [`ComponentId`] and [`NetId`] are thin `u32` wrappers used as arena
//! indices into the [`Netlist`](crate::Netlist). They are `Copy`, `Ord`,
//! `Hash`, and `Serialize`/`Deserialize`; the `Ord` impl is what gives
//! clustering its deterministic lowest-ordinal tie break.

use tessera_common::define_id;

define_id!(
    /// Opaque, copyable ID for a component (macro, cell, or terminal).
    ComponentId
);

define_id!(
    /// Opaque, copyable ID for a weighted two-point net.
    NetId
);

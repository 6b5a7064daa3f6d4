//! Circuit model for the Tessera placement toolchain.
//!
//! This crate is the boundary between benchmark input and the placement
//! core: it defines the flat component/netlist model the core reads
//! (geometry, fixed flags, connectivity weights — never concrete subtype
//! behavior), the bookshelf benchmark reader that produces it, and the
//! supplement metadata reader that attaches optional attribute bags.

#![warn(missing_docs)]

pub mod bookshelf;
pub mod component;
pub mod error;
pub mod ids;
pub mod netlist;
pub mod placement;
pub mod supplement;

pub use bookshelf::read_benchmark;
pub use component::{Component, ComponentKind};
pub use error::ModelError;
pub use ids::{ComponentId, NetId};
pub use netlist::{Net, Netlist};
pub use placement::Placement;
pub use supplement::{apply_supplement, read_supplement, Supplement};

//! Client for an external placement constraint solver.
//!
//! This crate is a pure protocol adapter: it ships a partition subproblem
//! to a solver backend over TCP and parses the returned bin assignment.
//! It knows nothing about trees, clusters, or cost functions — the
//! partitioner hands it a [`PartitionRequest`] and interprets the
//! [`PartitionResponse`].
//!
//! The wire format is a versioned frame (magic bytes, protocol version,
//! length prefix, bincode payload); any mismatch surfaces as
//! [`SolverError::Protocol`] rather than a silent misparse. Every logical
//! request uses a fresh connection, and a failed request is retried at most
//! once — a connection that saw a partial read is never reused.

#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod proto;

pub use client::SolverClient;
pub use error::SolverError;
pub use proto::{
    BinAssignment, PartitionRequest, PartitionResponse, SolverComponent, SolverWeight,
};

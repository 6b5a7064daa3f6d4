//! Shared foundational types used across the Tessera placement toolchain.
//!
//! This crate provides the generic arena container used for ID-indexed
//! storage, the [`ArenaId`] key trait and its companion `define_id!` macro,
//! and the common result/error types.

#![warn(missing_docs)]

pub mod arena;
pub mod result;

pub use arena::{Arena, ArenaId};
pub use result::{InternalError, TesseraResult};

/// Defines an opaque `u32` ID newtype implementing [`ArenaId`].
///
/// The generated type is `Copy`, `Hash`, `Ord`, and serde-serializable, and
/// displays as its raw index.
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug,
            serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl $crate::ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

//! Configuration loading for the Tessera placement toolchain.
//!
//! Parses `tessera.toml` into typed configuration structs, validates them,
//! and exposes a loader with a string-based seam for tests.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{
    CanvasConfig, ClusteringConfig, PlacerConfig, ProjectMeta, RefineConfig, SolverConfig,
};

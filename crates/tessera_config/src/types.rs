//! Configuration types deserialized from `tessera.toml`.

use serde::Deserialize;

/// The top-level project configuration parsed from `tessera.toml`.
///
/// Contains project metadata, the canvas definition, and the tuning knobs
/// for clustering, refinement, and the optional solver backend.
#[derive(Debug, Deserialize)]
pub struct PlacerConfig {
    /// Core project metadata (name, version).
    pub project: ProjectMeta,
    /// Chip canvas dimensions.
    pub canvas: CanvasConfig,
    /// Clustering stage settings.
    #[serde(default)]
    pub clustering: ClusteringConfig,
    /// Refinement (annealing) stage settings.
    #[serde(default)]
    pub refine: RefineConfig,
    /// External solver backend settings. Absent section disables delegation.
    #[serde(default)]
    pub solver: SolverConfig,
}

/// Core project metadata required in every `tessera.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default)]
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// Chip canvas dimensions in placement units.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CanvasConfig {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
}

/// Settings for the k-means clustering stage.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ClusteringConfig {
    /// Target cluster count `k`.
    #[serde(default = "default_cluster_count")]
    pub count: usize,
    /// Maximum number of assignment/recenter iterations.
    #[serde(default = "default_cluster_iterations")]
    pub iterations: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            count: default_cluster_count(),
            iterations: default_cluster_iterations(),
        }
    }
}

fn default_cluster_count() -> usize {
    4
}

fn default_cluster_iterations() -> usize {
    50
}

/// Settings for the annealing refinement stage.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RefineConfig {
    /// Total move budget for the refinement loop.
    #[serde(default = "default_move_budget")]
    pub move_budget: usize,
    /// Number of consecutive non-improving moves before the stage stalls out.
    #[serde(default = "default_stall_window")]
    pub stall_window: usize,
    /// Initial annealing temperature.
    #[serde(default = "default_initial_temperature")]
    pub initial_temperature: f64,
    /// Geometric cooling factor applied after each accepted move batch.
    #[serde(default = "default_cooling")]
    pub cooling: f64,
    /// RNG seed for reproducible refinement runs.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            move_budget: default_move_budget(),
            stall_window: default_stall_window(),
            initial_temperature: default_initial_temperature(),
            cooling: default_cooling(),
            seed: default_seed(),
        }
    }
}

fn default_move_budget() -> usize {
    10_000
}

fn default_stall_window() -> usize {
    500
}

fn default_initial_temperature() -> f64 {
    10.0
}

fn default_cooling() -> f64 {
    0.95
}

fn default_seed() -> u64 {
    42
}

/// Settings for the external constraint-solver backend.
///
/// When `endpoint` is absent, partition subproblems are always solved with
/// the local heuristic.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    /// Solver endpoint as `host:port`. Absence disables delegation.
    pub endpoint: Option<String>,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_solver_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: default_solver_timeout_ms(),
        }
    }
}

fn default_solver_timeout_ms() -> u64 {
    5_000
}

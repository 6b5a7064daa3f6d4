//! Domain options consumed by the placement engine.
//!
//! The CLI resolves `tessera.toml` plus command-line flags into this struct;
//! the engine never touches the configuration file format itself.

use std::time::Duration;

/// Tuning options for one placement run.
#[derive(Debug, Clone)]
pub struct PlacerOptions {
    /// Canvas width in placement units.
    pub canvas_width: u32,
    /// Canvas height in placement units.
    pub canvas_height: u32,
    /// Target cluster count `k`.
    pub cluster_count: usize,
    /// Clustering iteration cap.
    pub cluster_iterations: usize,
    /// Refinement move budget.
    pub move_budget: usize,
    /// Consecutive non-improving proposals before refinement stalls out.
    pub stall_window: usize,
    /// Initial annealing temperature.
    pub initial_temperature: f64,
    /// Geometric cooling factor per temperature step.
    pub cooling: f64,
    /// RNG seed for reproducible refinement.
    pub seed: u64,
    /// Solver endpoint as `host:port`; `None` forces the local heuristic.
    pub solver_endpoint: Option<String>,
    /// Per-request solver timeout.
    pub solver_timeout: Duration,
}

impl PlacerOptions {
    /// Creates options for the given canvas with default tuning values.
    pub fn for_canvas(width: u32, height: u32) -> Self {
        Self {
            canvas_width: width,
            canvas_height: height,
            cluster_count: 4,
            cluster_iterations: 50,
            move_budget: 10_000,
            stall_window: 500,
            initial_temperature: 10.0,
            cooling: 0.95,
            seed: 42,
            solver_endpoint: None,
            solver_timeout: Duration::from_secs(5),
        }
    }

    /// Returns the canvas dimensions as a pair.
    pub fn canvas(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_canvas_defaults() {
        let options = PlacerOptions::for_canvas(100, 80);
        assert_eq!(options.canvas(), (100, 80));
        assert_eq!(options.cluster_count, 4);
        assert!(options.solver_endpoint.is_none());
        assert_eq!(options.solver_timeout, Duration::from_secs(5));
    }
}

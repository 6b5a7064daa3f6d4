//! The `tessera place` subcommand: the full placement pipeline.

use crate::export;
use crate::{GlobalArgs, PlaceArgs};
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tessera_config::PlacerConfig;
use tessera_diagnostics::{DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use tessera_model::{apply_supplement, read_benchmark, read_supplement};
use tessera_place::{run_placement, CancelToken, PlacerOptions};

/// Runs the placement pipeline and writes the result artifacts.
///
/// Exit codes: `0` for a legal placement, `2` for a run that finished with
/// legality violations. Hard failures (bad input, canvas-sizing bugs)
/// propagate as errors and exit `1` from `main`.
pub fn run(args: &PlaceArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_config(global)?;
    let options = resolve_options(&config, args);

    let sink = DiagnosticSink::new();
    let mut netlist = read_benchmark(Path::new(&args.benchmark))?;

    if let Some(supplement_path) = &args.supplement {
        let supplements = read_supplement(Path::new(supplement_path))?;
        apply_supplement(&mut netlist, &supplements, &sink);
    }

    if !global.quiet {
        println!(
            "placing {} ({} components, {} nets) on {}x{}",
            config.project.name,
            netlist.component_count(),
            netlist.net_count(),
            options.canvas_width,
            options.canvas_height,
        );
    }

    let result = run_placement(&netlist, &options, &sink, CancelToken::new())?;

    render_diagnostics(&sink, global);

    let out_dir = Path::new(&args.out);
    std::fs::create_dir_all(out_dir)?;
    export::write_positions_csv(out_dir, &result.placements, &netlist)?;
    export::write_stats_json(out_dir, &result.stats, &result.report)?;
    export::write_plot_tables(out_dir, &result.clusters, &netlist)?;

    if !global.quiet {
        println!(
            "cost {} -> {} ({} moves, {} solver fallbacks){}",
            result.stats.initial_cost,
            result.stats.final_cost,
            result.stats.accepted_moves,
            result.stats.solver_fallbacks,
            if result.stats.degraded { ", degraded" } else { "" },
        );
        println!(
            "placement is {}; wirelength {:.1}; results in {}",
            if result.report.legal { "legal" } else { "ILLEGAL" },
            result.report.wirelength,
            out_dir.display(),
        );
    }

    Ok(if result.report.legal { 0 } else { 2 })
}

/// Loads `tessera.toml` from the `--config` path or the current directory.
fn load_config(global: &GlobalArgs) -> Result<PlacerConfig, Box<dyn Error>> {
    let config = match &global.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            tessera_config::load_config_from_str(&content)?
        }
        None => tessera_config::load_config(Path::new("."))?,
    };
    Ok(config)
}

/// Merges file configuration with command-line overrides.
fn resolve_options(config: &PlacerConfig, args: &PlaceArgs) -> PlacerOptions {
    let mut options = PlacerOptions::for_canvas(config.canvas.width, config.canvas.height);
    options.cluster_count = config.clustering.count;
    options.cluster_iterations = config.clustering.iterations;
    options.move_budget = config.refine.move_budget;
    options.stall_window = config.refine.stall_window;
    options.initial_temperature = config.refine.initial_temperature;
    options.cooling = config.refine.cooling;
    options.seed = config.refine.seed;
    options.solver_endpoint = config.solver.endpoint.clone();
    options.solver_timeout = Duration::from_millis(config.solver.timeout_ms);

    if let Some(endpoint) = &args.solver {
        options.solver_endpoint = Some(endpoint.clone());
    }
    if args.no_solver {
        options.solver_endpoint = None;
    }
    if let Some(seed) = args.seed {
        options.seed = seed;
    }
    if let Some(moves) = args.moves {
        options.move_budget = moves;
    }
    options
}

/// Prints accumulated diagnostics, honoring quiet/verbose.
fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in sink.diagnostics() {
        let visible = match diag.severity {
            Severity::Error => true,
            Severity::Warning => !global.quiet,
            Severity::Note => global.verbose && !global.quiet,
        };
        if visible {
            eprint!("{}", renderer.render(&diag));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_config::load_config_from_str;

    const CONFIG: &str = r#"
[project]
name = "demo"

[canvas]
width = 16
height = 16

[clustering]
count = 2

[refine]
move_budget = 500
seed = 9

[solver]
endpoint = "127.0.0.1:1111"
timeout_ms = 250
"#;

    fn place_args(benchmark: &str) -> PlaceArgs {
        PlaceArgs {
            benchmark: benchmark.to_string(),
            out: "out".to_string(),
            supplement: None,
            solver: None,
            no_solver: false,
            seed: None,
            moves: None,
        }
    }

    #[test]
    fn options_resolved_from_config() {
        let config = load_config_from_str(CONFIG).unwrap();
        let options = resolve_options(&config, &place_args("b.aux"));
        assert_eq!(options.canvas(), (16, 16));
        assert_eq!(options.cluster_count, 2);
        assert_eq!(options.move_budget, 500);
        assert_eq!(options.seed, 9);
        assert_eq!(options.solver_endpoint.as_deref(), Some("127.0.0.1:1111"));
        assert_eq!(options.solver_timeout, Duration::from_millis(250));
    }

    #[test]
    fn cli_overrides_win() {
        let config = load_config_from_str(CONFIG).unwrap();
        let mut args = place_args("b.aux");
        args.solver = Some("10.0.0.1:9999".to_string());
        args.seed = Some(1);
        args.moves = Some(10);

        let options = resolve_options(&config, &args);
        assert_eq!(options.solver_endpoint.as_deref(), Some("10.0.0.1:9999"));
        assert_eq!(options.seed, 1);
        assert_eq!(options.move_budget, 10);
    }

    #[test]
    fn no_solver_flag_disables_delegation() {
        let config = load_config_from_str(CONFIG).unwrap();
        let mut args = place_args("b.aux");
        args.no_solver = true;
        let options = resolve_options(&config, &args);
        assert!(options.solver_endpoint.is_none());
    }

    #[test]
    fn end_to_end_place_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let bench = dir.path();

        std::fs::write(
            bench.join("demo.aux"),
            "FloorplanDesign : demo.blocks demo.nets\n",
        )
        .unwrap();
        std::fs::write(
            bench.join("demo.blocks"),
            "UCSC blocks 1.0\n\
             NumHardRectilinearBlocks : 4\n\
             NumTerminals : 0\n\
             bk1 hardrectilinear 4 (0, 0) (0, 2) (2, 2) (2, 0)\n\
             bk2 hardrectilinear 4 (0, 0) (0, 2) (2, 2) (2, 0)\n\
             bk3 hardrectilinear 4 (0, 0) (0, 1) (1, 1) (1, 0)\n\
             bk4 hardrectilinear 4 (0, 0) (0, 1) (1, 1) (1, 0)\n",
        )
        .unwrap();
        std::fs::write(
            bench.join("demo.nets"),
            "UCSC nets 1.0\n\
             NumNets : 2\n\
             NumPins : 4\n\
             NetDegree : 2\n\
             bk1 B\n\
             bk3 B\n\
             NetDegree : 2\n\
             bk2 B\n\
             bk4 B\n",
        )
        .unwrap();

        let config_path = bench.join("tessera.toml");
        std::fs::write(
            &config_path,
            "[project]\nname = \"demo\"\n\n[canvas]\nwidth = 16\nheight = 16\n\n[refine]\nmove_budget = 200\n",
        )
        .unwrap();

        let out = bench.join("results");
        let mut args = place_args(bench.join("demo.aux").to_str().unwrap());
        args.out = out.to_str().unwrap().to_string();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(config_path.to_str().unwrap().to_string()),
        };

        let code = run(&args, &global).unwrap();
        assert_eq!(code, 0);
        assert!(out.join("positions.csv").exists());
        assert!(out.join("stats.json").exists());
        assert!(out.join("macros.txt").exists());
        assert!(out.join("centroids.txt").exists());
    }
}

//! Tessera CLI — the command-line interface for the Tessera macro placer.
//!
//! Provides `tessera place` for running the full placement pipeline on a
//! bookshelf benchmark and `tessera info` for inspecting a benchmark
//! without placing it.

#![warn(missing_docs)]

mod export;
mod info;
mod place;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Tessera — a macro placement engine for IC floorplans.
#[derive(Parser, Debug)]
#[command(name = "tessera", version, about = "Tessera Macro Placer")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (note-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `tessera.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Place a bookshelf benchmark onto the configured canvas.
    Place(PlaceArgs),
    /// Print a summary of a bookshelf benchmark.
    Info(InfoArgs),
}

/// Arguments for the `tessera place` subcommand.
#[derive(Parser, Debug)]
pub struct PlaceArgs {
    /// Path to the benchmark `.aux` file.
    pub benchmark: String,

    /// Output directory for positions, statistics, and plot tables.
    #[arg(short, long, default_value = "out")]
    pub out: String,

    /// Path to a supplement JSON file with per-component attributes.
    #[arg(long)]
    pub supplement: Option<String>,

    /// Solver endpoint override (`host:port`).
    #[arg(long)]
    pub solver: Option<String>,

    /// Disable solver delegation even if the configuration names an endpoint.
    #[arg(long)]
    pub no_solver: bool,

    /// RNG seed override for the refinement stage.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Refinement move budget override.
    #[arg(long)]
    pub moves: Option<usize>,
}

/// Arguments for the `tessera info` subcommand.
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to the benchmark `.aux` file.
    pub benchmark: String,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print note-level diagnostics.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var("TERM").is_ok(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Place(ref args) => place::run(args, &global),
        Command::Info(ref args) => info::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

//! The `tessera info` subcommand: benchmark inspection without placement.

use crate::{GlobalArgs, InfoArgs};
use std::error::Error;
use std::path::Path;
use tessera_model::{read_benchmark, ComponentKind};

/// Prints a summary of the benchmark's contents.
pub fn run(args: &InfoArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let netlist = read_benchmark(Path::new(&args.benchmark))?;

    let macros = netlist
        .components
        .values()
        .filter(|c| c.kind == ComponentKind::Macro)
        .count();
    let cells = netlist
        .components
        .values()
        .filter(|c| c.kind == ComponentKind::Cell)
        .count();
    let terminals = netlist
        .components
        .values()
        .filter(|c| c.kind == ComponentKind::Terminal)
        .count();

    println!("benchmark: {}", args.benchmark);
    println!(
        "components: {} ({} macros, {} cells, {} terminals)",
        netlist.component_count(),
        macros,
        cells,
        terminals
    );
    println!("nets: {}", netlist.net_count());
    println!("movable area: {}", netlist.movable_area());

    if global.verbose {
        for component in netlist.components.values() {
            println!(
                "  {} {}x{}{}",
                component.name,
                component.width,
                component.height,
                if component.fixed { " (fixed)" } else { "" },
            );
        }
    }

    Ok(0)
}

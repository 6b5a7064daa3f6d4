//! Result export: positions CSV, statistics JSON, and plot tables.
//!
//! The plot tables are plain whitespace-separated columns (`macros.txt`,
//! `centroids.txt`) consumable by gnuplot; the CSV and JSON files are the
//! machine-readable record of the run.

use std::error::Error;
use std::fs;
use std::path::Path;
use tessera_eval::EvalReport;
use tessera_model::{Netlist, Placement};
use tessera_place::{Cluster, RunStats};

/// Writes `positions.csv`: one row per placed component.
pub fn write_positions_csv(
    dir: &Path,
    placements: &[Placement],
    netlist: &Netlist,
) -> Result<(), Box<dyn Error>> {
    let mut out = String::from("name,x,y,width,height,rotated\n");
    for placement in placements {
        let component = netlist.component(placement.component);
        let (width, height) = placement.footprint(netlist);
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            component.name, placement.x, placement.y, width, height, placement.rotated
        ));
    }
    fs::write(dir.join("positions.csv"), out)?;
    Ok(())
}

/// Writes `stats.json`: run statistics plus the evaluation verdict.
pub fn write_stats_json(
    dir: &Path,
    stats: &RunStats,
    report: &EvalReport,
) -> Result<(), Box<dyn Error>> {
    let value = serde_json::json!({
        "stats": stats,
        "evaluation": report,
    });
    fs::write(dir.join("stats.json"), serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

/// Writes the gnuplot tables: component sizes and cluster centroids.
pub fn write_plot_tables(
    dir: &Path,
    clusters: &[Cluster],
    netlist: &Netlist,
) -> Result<(), Box<dyn Error>> {
    let mut macros = String::new();
    for id in netlist.movable_components() {
        let component = netlist.component(id);
        macros.push_str(&format!("{} {}\n", component.width, component.height));
    }
    fs::write(dir.join("macros.txt"), macros)?;

    let mut centroids = String::new();
    for cluster in clusters {
        centroids.push_str(&format!(
            "{} {}\n",
            cluster.centroid.0, cluster.centroid.1
        ));
    }
    fs::write(dir.join("centroids.txt"), centroids)?;
    Ok(())
}

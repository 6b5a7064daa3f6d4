//! Supplement metadata: optional attribute bags attached to named components.
//!
//! A supplement file is a JSON object mapping component names to attribute
//! bags. The attributes are opaque to the placement core; they ride along on
//! the component for exporters and downstream analysis.

use crate::error::ModelError;
use crate::netlist::Netlist;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};

/// Optional per-component attributes from a supplement file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Supplement {
    /// Power draw in milliwatts.
    #[serde(default)]
    pub power_mw: Option<f64>,
    /// Operating frequency in megahertz.
    #[serde(default)]
    pub frequency_mhz: Option<f64>,
}

/// Reads a supplement file into a name-to-attributes map.
pub fn read_supplement(path: &Path) -> Result<BTreeMap<String, Supplement>, ModelError> {
    let content = std::fs::read_to_string(path).map_err(|e| ModelError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_supplement(&content)
}

/// Parses supplement JSON from a string.
pub fn parse_supplement(content: &str) -> Result<BTreeMap<String, Supplement>, ModelError> {
    serde_json::from_str(content).map_err(|e| ModelError::Format(format!("supplement: {e}")))
}

/// Attaches supplement attributes to the named components of a netlist.
///
/// Names with no matching component are reported as warnings and skipped;
/// a stale supplement file never fails a run.
pub fn apply_supplement(
    netlist: &mut Netlist,
    supplements: &BTreeMap<String, Supplement>,
    sink: &DiagnosticSink,
) {
    for (name, supplement) in supplements {
        match netlist.component_by_name(name) {
            Some(id) => {
                netlist.component_mut(id).supplement = Some(*supplement);
            }
            None => {
                sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::new(Category::Warning, 210),
                        "supplement entry does not match any component",
                    )
                    .with_subject(name.clone()),
                );
            }
        }
    }
}

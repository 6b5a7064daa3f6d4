//! Diagnostic rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a compact terminal format.
///
/// Produces output like:
/// ```text
/// warning[S404]: solver endpoint unreachable, using local heuristic (cluster3)
///    = note: run quality is degraded
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn severity_style(&self, diag: &Diagnostic) -> (&'static str, &'static str) {
        if !self.color {
            return ("", "");
        }
        let open = match diag.severity {
            crate::Severity::Error => "\x1b[1;31m",
            crate::Severity::Warning => "\x1b[1;33m",
            crate::Severity::Note => "\x1b[1;36m",
        };
        (open, "\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let (open, close) = self.severity_style(diag);
        let mut out = String::new();

        out.push_str(&format!(
            "{open}{}[{}]{close}: {}",
            diag.severity, diag.code, diag.message
        ));
        if let Some(subject) = &diag.subject {
            out.push_str(&format!(" ({subject})"));
        }
        out.push('\n');

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        out
    }
}

/// Renders diagnostics as single-line JSON objects.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        // Serialization of a plain struct with string fields cannot fail.
        serde_json::to_string(diag).unwrap_or_default()
    }
}

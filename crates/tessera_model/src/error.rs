//! Error types for benchmark reading and model construction.

/// Errors that can occur while reading a benchmark or building the model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// An I/O error occurred while reading a benchmark file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that failed to read.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A benchmark file violated the expected format.
    #[error("benchmark format error: {0}")]
    Format(String),

    /// A net or placement line referenced a component that was never declared.
    #[error("unknown component '{0}'")]
    UnknownComponent(String),

    /// A declared count did not match the number of entries found.
    #[error("count mismatch: expected {expected} {what}, found {found}")]
    CountMismatch {
        /// What was being counted.
        what: &'static str,
        /// The declared count.
        expected: usize,
        /// The number of entries actually parsed.
        found: usize,
    },
}

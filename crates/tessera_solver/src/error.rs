//! Error taxonomy for solver round-trips.
//!
//! All three variants are recoverable by the caller: the partitioner falls
//! back to its local heuristic and flags the run as degraded. None of them
//! abort a placement run.

/// Errors that can occur during a solver round-trip.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// The solver did not respond within the configured timeout.
    #[error("solver request timed out")]
    Timeout,

    /// The endpoint was unreachable or the connection dropped mid-request.
    #[error("solver connection failed: {0}")]
    Connection(String),

    /// The response violated the wire protocol (bad magic, version, or payload).
    #[error("solver protocol error: {0}")]
    Protocol(String),
}

impl SolverError {
    /// Classifies an I/O error from a connect/read/write call.
    ///
    /// Timeouts surface as `WouldBlock` or `TimedOut` depending on platform;
    /// everything else (refused, reset, closed mid-read) is a connection
    /// failure.
    pub fn from_io(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => SolverError::Timeout,
            _ => SolverError::Connection(err.to_string()),
        }
    }
}

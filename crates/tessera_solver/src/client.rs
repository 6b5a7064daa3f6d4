//! Blocking TCP client for the solver backend.

use crate::error::SolverError;
use crate::proto::{self, PartitionRequest, PartitionResponse, HEADER_LEN};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// A request/response client for an external partition solver.
///
/// Each [`solve`](Self::solve) call opens a fresh connection, sends one
/// framed request, and blocks until a framed response arrives or the
/// timeout elapses. On any failure the request is retried exactly once on a
/// new connection; a connection that may hold a partial read is never
/// reused for another logical request.
#[derive(Debug, Clone)]
pub struct SolverClient {
    endpoint: String,
    timeout: Duration,
}

impl SolverClient {
    /// Creates a client for the given `host:port` endpoint.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the configured per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a partition subproblem and blocks until a response or failure.
    ///
    /// Performs at most one retry on a fresh connection, then surfaces the
    /// error from the final attempt. All errors are recoverable: the caller
    /// is expected to fall back to its local heuristic.
    pub fn solve(&self, request: &PartitionRequest) -> Result<PartitionResponse, SolverError> {
        match self.round_trip(request) {
            Ok(response) => Ok(response),
            // One retry, fresh connection. The first attempt's stream is
            // dropped (closed) before the retry begins.
            Err(_) => self.round_trip(request),
        }
    }

    /// One connect-send-receive cycle on a dedicated connection.
    fn round_trip(&self, request: &PartitionRequest) -> Result<PartitionResponse, SolverError> {
        let addr = self.resolve()?;
        let stream =
            TcpStream::connect_timeout(&addr, self.timeout).map_err(SolverError::from_io)?;
        stream
            .set_read_timeout(Some(self.timeout))
            .map_err(SolverError::from_io)?;
        stream
            .set_write_timeout(Some(self.timeout))
            .map_err(SolverError::from_io)?;

        self.send_request(&stream, request)?;
        self.receive_response(&stream)
    }

    fn resolve(&self) -> Result<SocketAddr, SolverError> {
        self.endpoint
            .to_socket_addrs()
            .map_err(|e| SolverError::Connection(format!("resolve {}: {e}", self.endpoint)))?
            .next()
            .ok_or_else(|| {
                SolverError::Connection(format!("endpoint {} resolved to nothing", self.endpoint))
            })
    }

    fn send_request(
        &self,
        mut stream: &TcpStream,
        request: &PartitionRequest,
    ) -> Result<(), SolverError> {
        let frame = proto::encode_frame(request)?;
        stream.write_all(&frame).map_err(SolverError::from_io)?;
        stream.flush().map_err(SolverError::from_io)
    }

    fn receive_response(&self, mut stream: &TcpStream) -> Result<PartitionResponse, SolverError> {
        let mut header = [0u8; HEADER_LEN];
        stream
            .read_exact(&mut header)
            .map_err(SolverError::from_io)?;
        let len = proto::check_header(&header)? as usize;

        let mut payload = vec![0u8; len];
        stream
            .read_exact(&mut payload)
            .map_err(SolverError::from_io)?;
        proto::decode_payload(&payload)
    }
}

//! Wire protocol for partition subproblems.
//!
//! A frame is `magic (4) | version (2, LE) | payload length (4, LE) |
//! bincode payload`. Request and response use the same framing. The version
//! is bumped whenever the message schema changes, so a stale backend is
//! rejected as a protocol error instead of being misparsed.

use crate::error::SolverError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Magic bytes opening every frame.
pub const PROTO_MAGIC: [u8; 4] = *b"TSRA";

/// Current protocol schema version.
pub const PROTO_VERSION: u16 = 1;

/// Size of the fixed frame header in bytes.
pub const HEADER_LEN: usize = 10;

/// Upper bound on payload size; larger lengths are treated as corruption.
pub const MAX_PAYLOAD_LEN: u32 = 64 * 1024 * 1024;

/// One component of a partition subproblem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverComponent {
    /// Stable component reference (raw component ID).
    pub id: u32,
    /// Component width.
    pub width: u32,
    /// Component height.
    pub height: u32,
}

/// A pairwise connectivity weight between two subproblem components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverWeight {
    /// First component reference.
    pub a: u32,
    /// Second component reference.
    pub b: u32,
    /// Connectivity weight.
    pub weight: u32,
}

/// A partition subproblem shipped to the solver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionRequest {
    /// Canvas width available to this subproblem.
    pub canvas_width: u32,
    /// Canvas height available to this subproblem.
    pub canvas_height: u32,
    /// Number of partition bins requested.
    pub bins: u32,
    /// The components to assign.
    pub components: Vec<SolverComponent>,
    /// Pairwise connectivity weights between them.
    pub weights: Vec<SolverWeight>,
}

/// One component-to-bin assignment in a solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinAssignment {
    /// The component reference from the request.
    pub id: u32,
    /// The assigned partition bin index.
    pub bin: u32,
}

/// The solver's answer to a [`PartitionRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionResponse {
    /// A complete assignment of every requested component to a bin.
    Assignments(Vec<BinAssignment>),
    /// The solver could not produce an assignment.
    Failure(String),
}

/// Encodes a message into a complete frame.
pub fn encode_frame<T: Serialize>(message: &T) -> Result<Vec<u8>, SolverError> {
    let payload = bincode::serde::encode_to_vec(message, bincode::config::standard())
        .map_err(|e| SolverError::Protocol(format!("encode: {e}")))?;
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&PROTO_MAGIC);
    frame.extend_from_slice(&PROTO_VERSION.to_le_bytes());
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Validates a frame header, returning the payload length.
pub fn check_header(header: &[u8; HEADER_LEN]) -> Result<u32, SolverError> {
    if header[..4] != PROTO_MAGIC {
        return Err(SolverError::Protocol("bad magic bytes".to_string()));
    }
    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != PROTO_VERSION {
        return Err(SolverError::Protocol(format!(
            "version mismatch: peer speaks v{version}, expected v{PROTO_VERSION}"
        )));
    }
    let len = u32::from_le_bytes([header[6], header[7], header[8], header[9]]);
    if len > MAX_PAYLOAD_LEN {
        return Err(SolverError::Protocol(format!(
            "payload length {len} exceeds limit"
        )));
    }
    Ok(len)
}

/// Decodes a frame payload into a message.
pub fn decode_payload<T: DeserializeOwned>(payload: &[u8]) -> Result<T, SolverError> {
    let (message, consumed) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .map_err(|e| SolverError::Protocol(format!("decode: {e}")))?;
    if consumed != payload.len() {
        return Err(SolverError::Protocol(format!(
            "trailing garbage: {} of {} bytes consumed",
            consumed,
            payload.len()
        )));
    }
    Ok(message)
}

/// Decodes a complete frame (header + payload) into a message.
pub fn decode_frame<T: DeserializeOwned>(frame: &[u8]) -> Result<T, SolverError> {
    if frame.len() < HEADER_LEN {
        return Err(SolverError::Protocol("truncated frame header".to_string()));
    }
    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&frame[..HEADER_LEN]);
    let len = check_header(&header)? as usize;
    let payload = &frame[HEADER_LEN..];
    if payload.len() != len {
        return Err(SolverError::Protocol(format!(
            "payload length mismatch: header says {len}, got {}",
            payload.len()
        )));
    }
    decode_payload(payload)
}

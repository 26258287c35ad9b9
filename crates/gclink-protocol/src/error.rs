//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means a record could not be turned into bytes
//! or back, or a packet was not the record the caller asked for. It never
//! means the connection is in trouble.

use crate::MsgTag;

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a record into bytes).
    ///
    /// The codec's own error is flattened into a message so that codecs
    /// other than JSON can report through the same variant.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Deserialization failed (turning bytes into a record).
    ///
    /// Common causes: malformed bytes, missing required fields, or a
    /// record layout that drifted from what the remote side sends.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The message decoded but violates a protocol rule.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// A packet was decoded as a record bound to a different message id.
    #[error("unexpected message: expected {expected}, got {actual}")]
    UnexpectedMessage { expected: u32, actual: MsgTag },
}

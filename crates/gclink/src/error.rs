//! Unified error type for gclink.

use gclink_protocol::ProtocolError;
use gclink_session::SessionError;
use gclink_transport::TransportError;

use crate::fetch::FetchError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `gclink` meta-crate, you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]` attribute
/// on each variant auto-generates `From` impls, so the `?` operator converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GcError {
    /// A transport-level error (not connected, send failed, shut down).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, unexpected message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (login, readiness, correlated requests).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A byte fetch above the core failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A command was rejected locally. Nothing was sent.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The coordinator answered a match request without a match.
    #[error("match {0} unavailable")]
    MatchUnavailable(u64),
}

impl GcError {
    pub(crate) fn precondition(reason: impl Into<String>) -> Self {
        Self::Precondition(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gclink_protocol::JobId;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let gc_err: GcError = err.into();
        assert!(matches!(gc_err, GcError::Transport(_)));
        assert!(gc_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let gc_err: GcError = err.into();
        assert!(matches!(gc_err, GcError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::RequestTimeout(JobId::new(4));
        let gc_err: GcError = err.into();
        assert!(matches!(gc_err, GcError::Session(_)));
        assert!(gc_err.to_string().contains("job-4"));
    }

    #[test]
    fn test_precondition_message() {
        let err = GcError::precondition("not in a lobby");
        assert_eq!(err.to_string(), "precondition failed: not in a lobby");
    }
}

//! Error types for the session layer.

use std::time::Duration;

use gclink_protocol::JobId;
use gclink_transport::LogonResult;

use crate::ConnectionState;

/// Errors that can occur while establishing or using a GC session.
///
/// `Clone` so that one failure (a disconnect, say) can be handed to every
/// pending request at once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The login handshake rejected the credentials. Terminal: the client
    /// stops trying to connect until asked again.
    #[error("authentication failed: {result}")]
    AuthenticationFailed {
        result: LogonResult,
        /// Where a guard code was mailed, if that is what the login is
        /// waiting for.
        email_domain: Option<String>,
    },

    /// The credential provider could not produce login details.
    #[error("credentials unavailable: {0}")]
    CredentialsUnavailable(String),

    /// The session did not become ready in time.
    #[error("session not ready after {0:?}")]
    SessionTimeout(Duration),

    /// No response arrived for a correlated request in time.
    #[error("request {0} timed out")]
    RequestTimeout(JobId),

    /// A correlated request was cancelled before its response arrived.
    #[error("request {0} cancelled")]
    RequestCancelled(JobId),

    /// A correlated request was dropped by an expiry sweep.
    #[error("request {0} expired")]
    RequestExpired(JobId),

    /// The connection went away.
    #[error("disconnected")]
    Disconnected,

    /// An event arrived that makes no sense in the current state.
    #[error("cannot handle {event} while {from:?}")]
    InvalidTransition {
        from: ConnectionState,
        event: &'static str,
    },
}

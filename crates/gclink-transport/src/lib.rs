//! Transport boundary for gclink.
//!
//! The game coordinator is reached through a base session (connection,
//! encryption, user login) that this workspace does not implement. The
//! [`GcTransport`] trait describes the handful of primitives the session
//! layer needs from it, and [`TransportEvent`] is everything it reports back.
//!
//! [`ChannelTransport`] is an in-memory implementation: the other half of the
//! pair, [`RemoteEnd`], plays the part of the remote service.

mod channel;
mod error;

pub use channel::{ChannelTransport, RemoteEnd, TransportCall};
pub use error::TransportError;

use std::fmt;
use std::future::Future;

// ---------------------------------------------------------------------------
// Packets
// ---------------------------------------------------------------------------

/// A GC message received from the base session.
///
/// `msg_type` is the raw tag as it appeared on the wire, including the
/// structured-format flag bit. `target_job` is the correlation id the remote
/// side echoed back, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundPacket {
    pub app_id: u32,
    pub msg_type: u32,
    pub target_job: Option<u64>,
    pub payload: Vec<u8>,
}

/// A GC message to hand to the base session for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundPacket {
    pub app_id: u32,
    pub msg_type: u32,
    pub source_job: Option<u64>,
    pub payload: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Login handshake
// ---------------------------------------------------------------------------

/// Credentials handed to the opaque login handshake.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LogonDetails {
    pub username: String,
    pub password: String,
    /// Code mailed by the guard service, when one was requested.
    pub auth_code: Option<String>,
    /// Code from a mobile authenticator, when the account requires one.
    pub two_factor_code: Option<String>,
}

// Never print secrets into logs.
impl fmt::Debug for LogonDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogonDetails")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("auth_code", &self.auth_code.as_ref().map(|_| "<redacted>"))
            .field(
                "two_factor_code",
                &self.two_factor_code.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Result code reported by the login handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogonResult {
    Ok,
    InvalidPassword,
    /// The account is guard-protected and an emailed code is required.
    AccountLogonDenied,
    AccountLoginDeniedNeedTwoFactor,
    TwoFactorCodeMismatch,
    InvalidLoginAuthCode,
    /// The chosen server could not take the login; another one may.
    TryAnotherCm,
    ServiceUnavailable,
    RateLimitExceeded,
    Other(i32),
}

impl LogonResult {
    /// Returns `true` for a successful login.
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Returns `true` if reconnecting and logging in again may succeed
    /// without any change to the credentials.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::TryAnotherCm | Self::ServiceUnavailable)
    }

    /// Returns `true` if the account needs a guard or two-factor code.
    pub fn needs_guard_code(self) -> bool {
        matches!(
            self,
            Self::AccountLogonDenied
                | Self::AccountLoginDeniedNeedTwoFactor
                | Self::TwoFactorCodeMismatch
                | Self::InvalidLoginAuthCode
        )
    }
}

impl fmt::Display for LogonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(code) => write!(f, "Other({code})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// What the login handshake reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogonOutcome {
    pub result: LogonResult,
    /// Domain of the address a guard code was mailed to, when the login was
    /// denied pending that code.
    pub email_domain: Option<String>,
    /// The logged-in account's 64-bit id, on success.
    pub steam_id: Option<u64>,
}

impl LogonOutcome {
    /// A successful login for the given account.
    pub fn ok(steam_id: u64) -> Self {
        Self {
            result: LogonResult::Ok,
            email_domain: None,
            steam_id: Some(steam_id),
        }
    }

    /// A failed login.
    pub fn failed(result: LogonResult) -> Self {
        Self {
            result,
            email_domain: None,
            steam_id: None,
        }
    }
}

/// The "currently playing" announcement that routes GC traffic to us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePlayed {
    pub game_id: u64,
    pub game_extra_info: String,
    /// Engine flags of the game client being impersonated.
    pub game_flags: u32,
}

// ---------------------------------------------------------------------------
// Events and the transport trait
// ---------------------------------------------------------------------------

/// Everything the base session reports to the layer above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection is up; the login handshake can start.
    Connected,
    /// The connection went away. `user_initiated` is `true` when it was
    /// closed through [`GcTransport::disconnect`].
    Disconnected { user_initiated: bool },
    /// The login handshake finished, successfully or not.
    LoggedOn(LogonOutcome),
    /// A message from the game coordinator.
    Message(InboundPacket),
}

/// The primitives the session layer needs from the base session.
///
/// Every method takes `&self` so one transport can be shared between the
/// inbound loop and any number of concurrent senders. Implementations
/// serialize access internally.
///
/// Futures are required to be `Send` because the client drives them from
/// spawned Tokio tasks.
pub trait GcTransport: Send + Sync + 'static {
    /// Starts connecting. Completion is reported as
    /// [`TransportEvent::Connected`].
    fn connect(
        &self,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Closes the connection. Reported as
    /// `TransportEvent::Disconnected { user_initiated: true }`.
    fn disconnect(
        &self,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Starts the login handshake. Reported as [`TransportEvent::LoggedOn`].
    fn log_on(
        &self,
        details: LogonDetails,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Announces the game being played, or that nothing is (`None`).
    fn play_game(
        &self,
        game: Option<GamePlayed>,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Sends a base-session game invite to another account.
    fn invite_to_game(
        &self,
        steam_id: u64,
        connect_string: String,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Hands a GC message to the base session.
    fn send(
        &self,
        packet: OutboundPacket,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Waits for the next event. `Ok(None)` means the transport is gone for
    /// good and no further events will arrive.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<TransportEvent>, TransportError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logon_result_retryable_codes() {
        assert!(LogonResult::TryAnotherCm.is_retryable());
        assert!(LogonResult::ServiceUnavailable.is_retryable());
        assert!(!LogonResult::InvalidPassword.is_retryable());
        assert!(!LogonResult::Ok.is_retryable());
    }

    #[test]
    fn test_logon_result_guard_codes() {
        assert!(LogonResult::AccountLogonDenied.needs_guard_code());
        assert!(LogonResult::AccountLoginDeniedNeedTwoFactor.needs_guard_code());
        assert!(!LogonResult::InvalidPassword.needs_guard_code());
    }

    #[test]
    fn test_logon_result_display() {
        assert_eq!(LogonResult::InvalidPassword.to_string(), "InvalidPassword");
        assert_eq!(LogonResult::Other(84).to_string(), "Other(84)");
    }

    #[test]
    fn test_logon_details_debug_redacts_secrets() {
        let details = LogonDetails {
            username: "bot".into(),
            password: "hunter2".into(),
            auth_code: Some("ABCDE".into()),
            two_factor_code: None,
        };
        let printed = format!("{details:?}");
        assert!(printed.contains("bot"));
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("ABCDE"));
    }

    #[test]
    fn test_logon_outcome_constructors() {
        let ok = LogonOutcome::ok(76561197960265728);
        assert!(ok.result.is_ok());
        assert_eq!(ok.steam_id, Some(76561197960265728));

        let failed = LogonOutcome::failed(LogonResult::InvalidPassword);
        assert!(!failed.result.is_ok());
        assert_eq!(failed.steam_id, None);
    }
}

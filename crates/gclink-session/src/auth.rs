//! Credential hook for the login handshake.
//!
//! gclink never stores account secrets itself. Every time the transport
//! connects, the client asks a [`CredentialProvider`] for login details, so
//! a provider can prompt for a fresh guard code, read a vault, or just hand
//! back fixed values.

use std::future::Future;

use gclink_transport::LogonDetails;

use crate::SessionError;

/// Produces login details on demand.
///
/// # Example
///
/// ```rust
/// use gclink_session::{CredentialProvider, SessionError};
/// use gclink_transport::LogonDetails;
///
/// /// Reads the account from the environment on every login.
/// struct EnvCredentials;
///
/// impl CredentialProvider for EnvCredentials {
///     async fn logon_details(&self) -> Result<LogonDetails, SessionError> {
///         let username = std::env::var("GC_USER")
///             .map_err(|e| SessionError::CredentialsUnavailable(e.to_string()))?;
///         let password = std::env::var("GC_PASSWORD")
///             .map_err(|e| SessionError::CredentialsUnavailable(e.to_string()))?;
///         Ok(LogonDetails { username, password, ..Default::default() })
///     }
/// }
/// ```
pub trait CredentialProvider: Send + Sync + 'static {
    /// Returns the details to log in with.
    ///
    /// # Errors
    /// `SessionError::CredentialsUnavailable` if none can be produced; the
    /// connection attempt then fails like a rejected login.
    fn logon_details(
        &self,
    ) -> impl Future<Output = Result<LogonDetails, SessionError>> + Send;
}

/// Fixed login details.
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub LogonDetails);

impl StaticCredentials {
    /// Username and password, no guard codes.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self(LogonDetails {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        })
    }
}

impl CredentialProvider for StaticCredentials {
    async fn logon_details(&self) -> Result<LogonDetails, SessionError> {
        Ok(self.0.clone())
    }
}

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection was closed by the remote side.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// An operation that needs a live connection was attempted without one.
    #[error("transport is not connected")]
    NotConnected,

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The transport was shut down.
    #[error("transport shut down")]
    Shutdown,
}

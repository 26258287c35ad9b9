//! Session bootstrap records: hello, welcome, connection status, ping.

use serde::{Deserialize, Serialize};

use crate::Engine;
use crate::records::{SoCacheSubscribed, SoCacheVersion};

/// Session request, sent repeatedly until the coordinator welcomes us.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientHello {
    pub version: u32,
    pub engine: Engine,
    pub client_launcher: u32,
    pub secret_key: String,
    pub client_session_need: u32,
    /// Caches we already hold, so the coordinator can skip resending them.
    pub socache_have_versions: Vec<SoCacheVersion>,
}

impl ClientHello {
    /// Session-need value a regular game client announces.
    pub const CLIENT_SESSION_NEED: u32 = 104;

    /// The hello a game client on `engine` sends.
    pub fn for_engine(engine: Engine) -> Self {
        Self {
            engine,
            client_session_need: Self::CLIENT_SESSION_NEED,
            ..Default::default()
        }
    }
}

/// The coordinator's acknowledgment that a session exists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientWelcome {
    pub version: u32,
    pub currency: u32,
    pub txn_country_code: String,
    /// Caches whose contents changed since the versions we announced; each
    /// carries a full snapshot.
    pub outofdate_subscribed_caches: Vec<SoCacheSubscribed>,
    /// Caches we already hold at the current version.
    pub uptodate_subscribed_caches: Vec<SoCacheVersion>,
}

/// Whether the coordinator currently holds a session for us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GcConnectionStatus {
    HaveSession,
    GcGoingDown,
    #[default]
    NoSession,
    NoSessionInLogonQueue,
    NoSteam,
    Suspended,
}

/// Out-of-band notice about the session, e.g. after a coordinator restart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionStatus {
    pub status: GcConnectionStatus,
    pub queue_position: u32,
    pub queue_size: u32,
    pub wait_seconds: u32,
}

/// Keep-alive probe from the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PingRequest {}

/// Our answer to [`PingRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PingResponse {}

//! # gclink
//!
//! Client-side game coordinator (GC) session and shared-object cache.
//!
//! A game coordinator is the backend service a game client talks to once it
//! is logged into the base platform session. gclink keeps that session
//! alive (hello, welcome, reconnect), mirrors the objects the coordinator
//! replicates to the client (lobby, inventory, account state), and exposes
//! lobby, chat and match commands.
//!
//! The base session itself (sockets, login crypto) sits behind the
//! [`GcTransport`](gclink_transport::GcTransport) trait, so gclink never
//! touches the network directly.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gclink::prelude::*;
//!
//! # async fn run() -> Result<(), GcError> {
//! let (transport, _remote) = ChannelTransport::pair();
//! let client = GcClient::builder()
//!     .config(SessionConfig::default())
//!     .build(transport, StaticCredentials::new("user", "secret"));
//!
//! let mut events = client.subscribe();
//! client.connect().await?;
//! client.create_lobby(LobbyDetails { game_name: "scrim".into(), ..Default::default() }).await?;
//! while let Ok(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod commands;
pub mod dispatch;
mod error;
mod events;
pub mod fetch;

pub use client::{GcClient, GcClientBuilder};
pub use error::GcError;
pub use events::GcEvent;

pub use gclink_cache as cache;
pub use gclink_protocol as protocol;
pub use gclink_session as session;
pub use gclink_transport as transport;

/// The types most programs need.
pub mod prelude {
    pub use crate::fetch::{ByteFetcher, FetchError, ReplayDownloader};
    pub use crate::{GcClient, GcClientBuilder, GcError, GcEvent};
    pub use gclink_cache::{CacheEvent, ChatChannel, LeaveReason, SoCache};
    pub use gclink_protocol::{
        ChatChannelType, Engine, GameId, JsonCodec, Lobby, LobbyDetails, LobbyMember, LobbyTeam,
        MatchInfo, PracticeLobbyList, ReplayKind, SoIdOwner, SteamId,
    };
    pub use gclink_session::{
        ConnectionState, CredentialProvider, SessionConfig, SessionError, StaticCredentials,
    };
    pub use gclink_transport::{ChannelTransport, GcTransport, LogonDetails, RemoteEnd};
}

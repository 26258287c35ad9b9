//! Message codec adapter for gclink.
//!
//! This crate defines what travels between the client and the game
//! coordinator:
//!
//! - **Tags** ([`MsgTag`]) — message ids and the structured-format flag.
//! - **Packets** ([`GcPacket`], [`GcMessage`]) — an encoded body, its tag and
//!   an optional correlation id.
//! - **Records** — one typed struct per message the client sends or
//!   understands, plus the cached object types.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how records become bytes.
//! - **Ids** ([`SteamId`], [`GameId`], [`JobId`], [`Engine`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (raw packets) → Protocol (GcPacket, records) → Session / Cache
//! ```
//!
//! The protocol layer does not know about connections or session state. It
//! only knows how to name, encode and decode messages.

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
mod ids;
pub mod msg;
mod packet;
mod records;
mod tag;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use ids::{Engine, GameId, JobId, SteamId};
pub use packet::{GcMessage, GcPacket};
pub use records::*;
pub use tag::{MsgTag, PROTO_FLAG};

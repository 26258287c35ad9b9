//! Shared-object cache for gclink.
//!
//! The game coordinator keeps a replica of server-side state on the client:
//! the current lobby, inventory, account state. This crate holds that
//! replica and reports changes to it.
//!
//! # Key types
//!
//! - [`SoCache`] — the object store; applies snapshots, updates, destroys
//!   and unsubscribes
//! - [`CacheEvent`] — what changed, including lobby created / updated / left
//! - [`CachedObject`], [`ObjectKey`], [`SoTypeId`] — what is stored and how
//!   it is keyed
//! - [`ChatChannels`] — chat channels joined in this session
//!
//! Nothing here does I/O. The client driver feeds decoded messages in and
//! forwards the events.

mod channels;
mod object;
mod store;

pub use channels::{ChatChannel, ChatChannels};
pub use object::{CachedObject, ObjectKey, ObjectPayload, SoTypeId};
pub use store::{Applied, CacheEvent, LeaveReason, SoCache};

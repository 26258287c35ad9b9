//! Identity newtypes shared by every layer.
//!
//! All of these wrap a plain integer. The wrapper keeps a lobby id from being
//! passed where an account id is expected, even though both are `u64`
//! underneath, and `#[serde(transparent)]` keeps the wire form a bare number.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SteamId
// ---------------------------------------------------------------------------

/// A 64-bit account id of an individual user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SteamId(pub u64);

impl SteamId {
    /// Universe "public", account type "individual", instance 1.
    const INDIVIDUAL_BASE: u64 = 0x0110_0001_0000_0000;

    /// Builds the 64-bit id of an individual account from its 32-bit
    /// account id.
    pub const fn from_account_id(account_id: u32) -> Self {
        Self(Self::INDIVIDUAL_BASE | account_id as u64)
    }

    /// The 32-bit account id (the low half), which is what GC lobby commands
    /// address members by.
    pub const fn account_id(self) -> u32 {
        (self.0 & 0xFFFF_FFFF) as u32
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SteamId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

// ---------------------------------------------------------------------------
// GameId
// ---------------------------------------------------------------------------

/// The application id of the game whose coordinator we talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u32);

impl GameId {
    /// The live game.
    pub const DOTA2: GameId = GameId(570);
    /// The public test client.
    pub const DOTA2_TEST: GameId = GameId(205790);

    /// The raw application id.
    pub const fn app_id(self) -> u32 {
        self.0
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::DOTA2
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// JobId
// ---------------------------------------------------------------------------

/// Correlation id linking a request to its asynchronous response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    /// Creates a `JobId` from a raw `u64`.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Which engine generation the impersonated game client runs on.
///
/// Sent in the hello, and decides whether a base-session invite asks the
/// invitee to launch the Source 2 client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Engine {
    Source1,
    #[default]
    Source2,
}

impl Engine {
    /// Flag value announced alongside the played game.
    pub const fn game_flags(self) -> u32 {
        match self {
            Engine::Source1 => 0,
            Engine::Source2 => 1,
        }
    }
}

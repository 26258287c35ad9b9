//! Account-scoped cache objects: inventory items and account state.

use serde::{Deserialize, Serialize};

/// An inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EconItem {
    pub id: u64,
    pub account_id: u32,
    pub inventory: u32,
    pub def_index: u32,
    pub quantity: u32,
    pub level: u32,
    pub quality: u32,
    pub flags: u32,
    pub origin: u32,
    pub custom_name: Option<String>,
    pub style: u32,
}

/// Per-account game state pushed by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameAccountClient {
    pub account_id: u32,
    pub wins: u32,
    pub losses: u32,
    pub xp: u32,
    pub level: u32,
    pub initial_skill: u32,
    pub trial_account: bool,
    pub prevent_text_chat_until_date: u32,
    pub prevent_voice_until_date: u32,
}

/// Progress on a world-map location.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapLocationState {
    pub account_id: u32,
    pub location_id: u32,
    pub completed: bool,
}

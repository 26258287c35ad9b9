//! Practice lobby records.

use serde::{Deserialize, Serialize};

use crate::SteamId;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Which side of the lobby a member sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LobbyTeam {
    GoodGuys,
    BadGuys,
    Broadcaster,
    Spectator,
    PlayerPool,
    #[default]
    NoTeam,
}

/// Lifecycle of a lobby on the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LobbyState {
    #[default]
    Ui,
    ReadyUp,
    ServerSetup,
    Run,
    Postgame,
    NotReady,
    ServerAssign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LobbyVisibility {
    #[default]
    Public,
    Friends,
    Unlisted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PauseSetting {
    #[default]
    Unlimited,
    Limited,
    Disabled,
}

/// Broadcast delay for spectators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DotaTvDelay {
    Delay10s,
    #[default]
    Delay120s,
    Delay300s,
}

// ---------------------------------------------------------------------------
// The lobby object
// ---------------------------------------------------------------------------

/// A member of a lobby, player or not.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyMember {
    pub id: SteamId,
    pub name: String,
    pub team: LobbyTeam,
    pub slot: u32,
    pub hero_id: u32,
}

/// Team branding shown in the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyTeamDetails {
    pub team_name: String,
    pub team_tag: String,
    pub team_id: u32,
    pub team_logo: u64,
}

/// Extra options for the ability-draft game mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityDraftDetails {
    pub shuffle_draft_order: bool,
}

/// The replicated lobby object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Lobby {
    pub lobby_id: u64,
    pub game_name: String,
    pub pass_key: String,
    pub server_region: u32,
    pub game_mode: u32,
    pub allow_cheats: bool,
    pub fill_with_bots: bool,
    pub allow_spectating: bool,
    pub dota_tv_delay: DotaTvDelay,
    pub pause_setting: PauseSetting,
    pub game_version: u32,
    pub visibility: LobbyVisibility,
    pub state: LobbyState,
    pub leader_id: SteamId,
    pub match_id: u64,
    pub members: Vec<LobbyMember>,
    pub team_details: Vec<LobbyTeamDetails>,
    /// Hero roster requested for the next game.
    pub requested_hero_ids: Vec<u32>,
    pub ability_draft_details: Option<AbilityDraftDetails>,
}

impl Lobby {
    /// Looks up a member by account.
    pub fn member(&self, id: SteamId) -> Option<&LobbyMember> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Members sitting on the given team.
    pub fn members_on(&self, team: LobbyTeam) -> impl Iterator<Item = &LobbyMember> {
        self.members.iter().filter(move |m| m.team == team)
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Settings of a lobby, sent when creating it or changing it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyDetails {
    pub lobby_id: u64,
    pub game_name: String,
    pub pass_key: String,
    pub server_region: u32,
    pub game_mode: u32,
    pub allow_cheats: bool,
    pub fill_with_bots: bool,
    pub allow_spectating: bool,
    pub dota_tv_delay: DotaTvDelay,
    pub pause_setting: PauseSetting,
    pub visibility: LobbyVisibility,
    pub team_details: Vec<LobbyTeamDetails>,
    pub requested_hero_ids: Vec<u32>,
    pub ability_draft_details: Option<AbilityDraftDetails>,
}

impl LobbyDetails {
    /// The current settings of a lobby, ready to be modified and sent back.
    pub fn from_lobby(lobby: &Lobby) -> Self {
        Self {
            lobby_id: lobby.lobby_id,
            game_name: lobby.game_name.clone(),
            pass_key: lobby.pass_key.clone(),
            server_region: lobby.server_region,
            game_mode: lobby.game_mode,
            allow_cheats: lobby.allow_cheats,
            fill_with_bots: lobby.fill_with_bots,
            allow_spectating: lobby.allow_spectating,
            dota_tv_delay: lobby.dota_tv_delay,
            pause_setting: lobby.pause_setting,
            visibility: lobby.visibility,
            team_details: lobby.team_details.clone(),
            requested_hero_ids: lobby.requested_hero_ids.clone(),
            ability_draft_details: lobby.ability_draft_details.clone(),
        }
    }
}

/// Body of the set-details message: the full settings block.
pub type PracticeLobbySetDetails = LobbyDetails;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeLobbyCreate {
    pub search_key: String,
    pub pass_key: String,
    pub client_version: u32,
    pub lobby_details: LobbyDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeLobbyLeave {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeLobbyLaunch {
    pub client_version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeLobbyKick {
    pub account_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeLobbyKickFromTeam {
    pub account_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancedShuffleLobby {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipLobbyTeams {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InviteToLobby {
    pub steam_id: SteamId,
    pub client_version: u32,
}

/// Filter for the public lobby list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeLobbyList {
    pub pass_key: String,
    pub region: u32,
    pub game_mode: u32,
}

/// One row of the public lobby list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyListEntry {
    pub lobby_id: u64,
    pub name: String,
    pub leader_name: String,
    pub member_count: u32,
    pub has_pass_key: bool,
    pub server_region: u32,
    pub game_mode: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeLobbyListResponse {
    pub lobbies: Vec<LobbyListEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lobby() -> Lobby {
        Lobby {
            lobby_id: 42,
            game_name: "scrim".into(),
            pass_key: "pw".into(),
            members: vec![
                LobbyMember {
                    id: SteamId(1),
                    name: "a".into(),
                    team: LobbyTeam::GoodGuys,
                    ..Default::default()
                },
                LobbyMember {
                    id: SteamId(2),
                    name: "b".into(),
                    team: LobbyTeam::BadGuys,
                    ..Default::default()
                },
            ],
            requested_hero_ids: vec![1, 2, 3],
            ability_draft_details: Some(AbilityDraftDetails {
                shuffle_draft_order: true,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_lobby_member_lookup() {
        let lobby = sample_lobby();
        assert_eq!(lobby.member(SteamId(2)).map(|m| m.name.as_str()), Some("b"));
        assert!(lobby.member(SteamId(3)).is_none());
        assert_eq!(lobby.members_on(LobbyTeam::GoodGuys).count(), 1);
    }

    #[test]
    fn test_lobby_details_from_lobby_copies_settings() {
        let lobby = sample_lobby();
        let details = LobbyDetails::from_lobby(&lobby);
        assert_eq!(details.lobby_id, 42);
        assert_eq!(details.game_name, "scrim");
        assert_eq!(details.pass_key, "pw");
        assert_eq!(details.requested_hero_ids, vec![1, 2, 3]);
        assert_eq!(
            details.ability_draft_details,
            Some(AbilityDraftDetails {
                shuffle_draft_order: true
            })
        );
    }

    #[test]
    fn test_lobby_decodes_partial_record() {
        let lobby: Lobby = serde_json::from_str(r#"{"lobby_id":7}"#).unwrap();
        assert_eq!(lobby.lobby_id, 7);
        assert!(lobby.members.is_empty());
        assert_eq!(lobby.state, LobbyState::Ui);
    }
}

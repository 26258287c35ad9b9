//! Outbound commands.
//!
//! Every command checks its preconditions locally first and fails with
//! [`GcError::Precondition`] without sending anything when they do not hold:
//!
//! - the session must be ready;
//! - lobby commands need an active lobby;
//! - chat messages need a joined channel and some text.
//!
//! Everything is fire-and-forget except [`GcClient::match_details`], which
//! waits for the correlated response.

use std::time::Duration;

use gclink_protocol::{
    AbilityDraftDetails, BalancedShuffleLobby, CacheSubscriptionRefresh, ChatChannelType,
    ChatMessage, Codec, Engine, FlipLobbyTeams, GcMessage, InviteToLobby, JoinChatChannel,
    LeaveChatChannel, Lobby, LobbyDetails, MatchDetailsRequest, MatchDetailsResponse,
    PingResponse, PracticeLobbyCreate, PracticeLobbyKick, PracticeLobbyKickFromTeam,
    PracticeLobbyLaunch, PracticeLobbyLeave, PracticeLobbyList, ProtocolError,
    RequestChatChannelList, SoIdOwner, SteamId,
};
use gclink_session::CredentialProvider;
use gclink_transport::GcTransport;
use tracing::{debug, info, warn};

use crate::{GcClient, GcError};

impl<T, A, C> GcClient<T, A, C>
where
    T: GcTransport,
    A: CredentialProvider,
    C: Codec,
{
    // -----------------------------------------------------------------------
    // Preconditions
    // -----------------------------------------------------------------------

    fn require_ready(&self) -> Result<(), GcError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(GcError::precondition(format!(
                "GC session not ready ({:?})",
                self.state()
            )))
        }
    }

    /// A copy of the active lobby.
    fn require_lobby(&self) -> Result<Lobby, GcError> {
        self.require_ready()?;
        self.shared
            .cache
            .lock()
            .lobby()
            .cloned()
            .ok_or_else(|| GcError::precondition("not in a lobby"))
    }

    async fn send<M: GcMessage + Sync>(&self, msg: &M) -> Result<(), GcError> {
        self.shared.send_message(msg, None).await
    }

    // -----------------------------------------------------------------------
    // Lobby
    // -----------------------------------------------------------------------

    /// Asks the coordinator to create a practice lobby with `details`.
    ///
    /// The lobby shows up as a [`gclink_cache::CacheEvent::LobbyCreated`]
    /// once the coordinator has made it.
    pub async fn create_lobby(&self, details: LobbyDetails) -> Result<(), GcError> {
        self.require_ready()?;
        info!(name = %details.game_name, "creating lobby");
        let create = PracticeLobbyCreate {
            search_key: String::new(),
            pass_key: details.pass_key.clone(),
            client_version: self.shared.config.client_version,
            lobby_details: details,
        };
        self.send(&create).await
    }

    /// The active lobby's settings, ready to be modified and passed to
    /// [`set_lobby_details`](Self::set_lobby_details).
    pub fn lobby_details(&self) -> Result<LobbyDetails, GcError> {
        self.shared
            .cache
            .lock()
            .lobby()
            .map(LobbyDetails::from_lobby)
            .ok_or_else(|| GcError::precondition("not in a lobby"))
    }

    /// Replaces the active lobby's settings.
    pub async fn set_lobby_details(&self, mut details: LobbyDetails) -> Result<(), GcError> {
        let lobby = self.require_lobby()?;
        details.lobby_id = lobby.lobby_id;
        self.send(&details).await
    }

    pub async fn leave_lobby(&self) -> Result<(), GcError> {
        let lobby = self.require_lobby()?;
        info!(lobby_id = lobby.lobby_id, "leaving lobby");
        self.send(&PracticeLobbyLeave {}).await
    }

    /// Kicks every other member, then leaves. The coordinator disbands a
    /// lobby once it is empty.
    pub async fn destroy_lobby(&self) -> Result<(), GcError> {
        let lobby = self.require_lobby()?;
        let me = self.steam_id();
        info!(lobby_id = lobby.lobby_id, members = lobby.members.len(), "destroying lobby");
        for member in lobby.members.iter().filter(|m| Some(m.id) != me) {
            self.send(&PracticeLobbyKick {
                account_id: member.id.account_id(),
            })
            .await?;
        }
        self.send(&PracticeLobbyLeave {}).await
    }

    pub async fn launch_lobby(&self) -> Result<(), GcError> {
        let lobby = self.require_lobby()?;
        info!(lobby_id = lobby.lobby_id, "launching lobby");
        self.send(&PracticeLobbyLaunch {
            client_version: self.shared.config.client_version,
        })
        .await
    }

    /// Removes a member from the lobby.
    pub async fn kick_member(&self, steam_id: SteamId) -> Result<(), GcError> {
        self.require_lobby()?;
        self.send(&PracticeLobbyKick {
            account_id: steam_id.account_id(),
        })
        .await
    }

    /// Moves a member off their team into the unassigned pool.
    pub async fn kick_member_from_team(&self, steam_id: SteamId) -> Result<(), GcError> {
        self.require_lobby()?;
        self.send(&PracticeLobbyKickFromTeam {
            account_id: steam_id.account_id(),
        })
        .await
    }

    /// Invites a player to the active lobby.
    ///
    /// Sends the coordinator's invite and a base-session game invite whose
    /// connect string makes the invitee's client join the lobby.
    pub async fn invite_to_lobby(&self, steam_id: SteamId) -> Result<(), GcError> {
        let lobby = self.require_lobby()?;
        self.send(&InviteToLobby {
            steam_id,
            client_version: self.shared.config.client_version,
        })
        .await?;

        let connect = invite_connect_string(lobby.lobby_id, self.shared.config.engine);
        debug!(%steam_id, %connect, "sending game invite");
        self.shared
            .transport
            .invite_to_game(steam_id.0, connect)
            .await?;
        Ok(())
    }

    /// Asks the coordinator to balance the teams.
    pub async fn shuffle_teams(&self) -> Result<(), GcError> {
        self.require_lobby()?;
        self.send(&BalancedShuffleLobby {}).await
    }

    /// Turns ability-draft order shuffling on or off.
    pub async fn shuffle_draft_order(&self, shuffle: bool) -> Result<(), GcError> {
        let lobby = self.require_lobby()?;
        let mut details = LobbyDetails::from_lobby(&lobby);
        details.ability_draft_details = Some(AbilityDraftDetails {
            shuffle_draft_order: shuffle,
        });
        self.send(&details).await
    }

    /// Swaps the two teams.
    pub async fn flip_teams(&self) -> Result<(), GcError> {
        self.require_lobby()?;
        self.send(&FlipLobbyTeams {}).await
    }

    /// Restricts hero selection to `hero_ids`. An empty roster lifts the
    /// restriction.
    pub async fn set_hero_roster(&self, hero_ids: Vec<u32>) -> Result<(), GcError> {
        let lobby = self.require_lobby()?;
        let mut details = LobbyDetails::from_lobby(&lobby);
        details.requested_hero_ids = hero_ids;
        self.send(&details).await
    }

    /// Requests the public lobby list. The answer arrives as
    /// [`crate::GcEvent::LobbyList`].
    pub async fn request_lobby_list(&self, filter: PracticeLobbyList) -> Result<(), GcError> {
        self.require_ready()?;
        self.send(&filter).await
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    /// Joins a chat channel. The result arrives as
    /// [`crate::GcEvent::ChatChannelJoined`] or
    /// [`crate::GcEvent::ChatJoinFailed`].
    pub async fn join_chat_channel(
        &self,
        channel_name: impl Into<String>,
        channel_type: ChatChannelType,
    ) -> Result<(), GcError> {
        self.require_ready()?;
        self.send(&JoinChatChannel {
            channel_name: channel_name.into(),
            channel_type,
        })
        .await
    }

    pub async fn leave_chat_channel(&self, channel_id: u64) -> Result<(), GcError> {
        self.require_ready()?;
        if !self.shared.channels.lock().is_joined(channel_id) {
            return Err(GcError::precondition(format!(
                "not in chat channel {channel_id}"
            )));
        }
        self.send(&LeaveChatChannel { channel_id }).await?;
        self.shared.channels.lock().leave(channel_id);
        Ok(())
    }

    pub async fn send_chat_message(&self, channel_id: u64, text: &str) -> Result<(), GcError> {
        self.require_ready()?;
        if text.trim().is_empty() {
            return Err(GcError::precondition("empty chat message"));
        }
        if !self.shared.channels.lock().is_joined(channel_id) {
            return Err(GcError::precondition(format!(
                "not in chat channel {channel_id}"
            )));
        }
        self.send(&ChatMessage {
            channel_id,
            text: text.to_owned(),
            ..Default::default()
        })
        .await
    }

    /// Requests the public channel list. The answer arrives as
    /// [`crate::GcEvent::ChatChannelList`].
    pub async fn request_chat_channel_list(&self) -> Result<(), GcError> {
        self.require_ready()?;
        self.send(&RequestChatChannelList {}).await
    }

    // -----------------------------------------------------------------------
    // Cache, matches, keep-alive
    // -----------------------------------------------------------------------

    /// Asks the coordinator to resend an owner's cache snapshot.
    pub async fn request_subscription_refresh(&self, owner: SoIdOwner) -> Result<(), GcError> {
        self.require_ready()?;
        self.send(&CacheSubscriptionRefresh { owner_soid: owner })
            .await
    }

    /// Fetches a match summary, waiting up to the configured
    /// `request_timeout`.
    pub async fn match_details(&self, match_id: u64) -> Result<MatchDetailsResponse, GcError> {
        self.match_details_with_timeout(match_id, self.shared.config.request_timeout)
            .await
    }

    /// Fetches a match summary, waiting up to `timeout`.
    ///
    /// # Errors
    /// `RequestTimeout` if no answer arrives in time, `Disconnected` if the
    /// connection drops first, `InvalidMessage` if the answer is about
    /// another match.
    pub async fn match_details_with_timeout(
        &self,
        match_id: u64,
        timeout: Duration,
    ) -> Result<MatchDetailsResponse, GcError> {
        self.require_ready()?;
        let ticket = self.shared.jobs.register();
        debug!(job = %ticket.id, match_id, "requesting match details");
        self.shared
            .send_message(&MatchDetailsRequest { match_id }, Some(ticket.id))
            .await?;

        let packet = ticket.waiter.wait(timeout).await?;
        let response = packet.decode::<_, MatchDetailsResponse>(&self.shared.codec)?;
        if let Some(answered) = response.match_info.as_ref().map(|m| m.match_id) {
            if answered != match_id {
                warn!(match_id, answered, "match details answer a different match");
                return Err(ProtocolError::InvalidMessage(format!(
                    "asked for match {match_id}, got {answered}"
                ))
                .into());
            }
        }
        Ok(response)
    }

    /// Answers a coordinator ping. Incoming pings are answered
    /// automatically; this is for callers that want to probe the path.
    pub async fn pong(&self) -> Result<(), GcError> {
        self.require_ready()?;
        self.send(&PingResponse {}).await
    }
}

/// Connect string of a lobby invite.
pub fn invite_connect_string(lobby_id: u64, engine: Engine) -> String {
    match engine {
        Engine::Source1 => format!("+invite {lobby_id}"),
        Engine::Source2 => format!("+invite {lobby_id} -launchsource2"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_connect_string_per_engine() {
        assert_eq!(invite_connect_string(42, Engine::Source1), "+invite 42");
        assert_eq!(
            invite_connect_string(42, Engine::Source2),
            "+invite 42 -launchsource2"
        );
    }
}

//! Chat channel records.

use serde::{Deserialize, Serialize};

use crate::SteamId;

/// Kind of chat channel.
///
/// Kinds this crate does not know decode as `Unknown` rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChatChannelType {
    #[default]
    Custom,
    Party,
    Lobby,
    Team,
    Guild,
    Fantasy,
    Whisper,
    Console,
    Tab,
    GameAll,
    GameAllies,
    GameSpectator,
    Private,
    PostGame,
    #[serde(other)]
    Unknown,
}

/// Outcome of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JoinChatResult {
    #[default]
    Success,
    InvalidChannelType,
    AccountNotFound,
    AchievementsNotMet,
    MaxMembers,
    PrivateChatDisabled,
    #[serde(other)]
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinChatChannel {
    pub channel_name: String,
    pub channel_type: ChatChannelType,
}

/// Someone present in a channel at join time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMember {
    pub steam_id: SteamId,
    pub persona_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinChatChannelResponse {
    pub result: JoinChatResult,
    pub channel_name: String,
    pub channel_id: u64,
    pub channel_type: ChatChannelType,
    pub max_members: u32,
    pub members: Vec<ChatMember>,
}

impl JoinChatChannelResponse {
    pub fn is_success(&self) -> bool {
        self.result == JoinChatResult::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveChatChannel {
    pub channel_id: u64,
}

/// A line of chat, in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessage {
    pub channel_id: u64,
    pub persona_name: String,
    pub account_id: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherJoinedChannel {
    pub channel_id: u64,
    pub persona_name: String,
    pub steam_id: SteamId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherLeftChannel {
    pub channel_id: u64,
    pub steam_id: SteamId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestChatChannelList {}

/// One public channel in the channel list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatChannelSummary {
    pub channel_name: String,
    pub num_members: u32,
    pub channel_type: ChatChannelType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestChatChannelListResponse {
    pub channels: Vec<ChatChannelSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_channel_type_unknown_variant_is_tolerated() {
        let kind: ChatChannelType = serde_json::from_str(r#""Trivia""#).unwrap();
        assert_eq!(kind, ChatChannelType::Unknown);
    }

    #[test]
    fn test_join_response_success_flag() {
        let ok = JoinChatChannelResponse::default();
        assert!(ok.is_success());

        let full = JoinChatChannelResponse {
            result: JoinChatResult::MaxMembers,
            ..Default::default()
        };
        assert!(!full.is_success());
    }
}

//! Registry of joined chat channels.

use std::collections::HashMap;

use gclink_protocol::{
    ChatChannelType, ChatMember, JoinChatChannelResponse, OtherJoinedChannel, OtherLeftChannel,
};

/// A chat channel we are in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatChannel {
    pub channel_id: u64,
    pub name: String,
    pub channel_type: ChatChannelType,
    pub members: Vec<ChatMember>,
}

/// Channels joined in this session.
///
/// Entries appear when a join succeeds and disappear when we leave. The
/// whole registry is cleared on disconnect, since the coordinator forgets
/// our memberships with the session.
#[derive(Debug, Default)]
pub struct ChatChannels {
    channels: HashMap<u64, ChatChannel>,
}

impl ChatChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a join response. Returns the channel if the join succeeded.
    pub fn join(&mut self, response: &JoinChatChannelResponse) -> Option<&ChatChannel> {
        if !response.is_success() {
            tracing::debug!(
                channel = %response.channel_name,
                result = ?response.result,
                "chat join refused"
            );
            return None;
        }
        let channel = ChatChannel {
            channel_id: response.channel_id,
            name: response.channel_name.clone(),
            channel_type: response.channel_type,
            members: response.members.clone(),
        };
        tracing::debug!(channel_id = channel.channel_id, name = %channel.name, "chat channel joined");
        self.channels.insert(response.channel_id, channel);
        self.channels.get(&response.channel_id)
    }

    /// Forgets a channel. Returns it if we were in it.
    pub fn leave(&mut self, channel_id: u64) -> Option<ChatChannel> {
        self.channels.remove(&channel_id)
    }

    pub fn on_other_joined(&mut self, msg: &OtherJoinedChannel) {
        if let Some(channel) = self.channels.get_mut(&msg.channel_id) {
            channel.members.retain(|m| m.steam_id != msg.steam_id);
            channel.members.push(ChatMember {
                steam_id: msg.steam_id,
                persona_name: msg.persona_name.clone(),
            });
        }
    }

    pub fn on_other_left(&mut self, msg: &OtherLeftChannel) {
        if let Some(channel) = self.channels.get_mut(&msg.channel_id) {
            channel.members.retain(|m| m.steam_id != msg.steam_id);
        }
    }

    pub fn get(&self, channel_id: u64) -> Option<&ChatChannel> {
        self.channels.get(&channel_id)
    }

    /// Looks a joined channel up by name.
    pub fn find_by_name(&self, name: &str) -> Option<&ChatChannel> {
        self.channels.values().find(|c| c.name == name)
    }

    pub fn is_joined(&self, channel_id: u64) -> bool {
        self.channels.contains_key(&channel_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatChannel> {
        self.channels.values()
    }

    pub fn clear(&mut self) {
        self.channels.clear();
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gclink_protocol::{JoinChatResult, SteamId};

    fn joined(id: u64, name: &str) -> JoinChatChannelResponse {
        JoinChatChannelResponse {
            channel_id: id,
            channel_name: name.into(),
            channel_type: ChatChannelType::Lobby,
            ..Default::default()
        }
    }

    #[test]
    fn test_join_success_adds_channel() {
        let mut chans = ChatChannels::new();
        let channel = chans.join(&joined(5, "lobby_42")).cloned().unwrap();
        assert_eq!(channel.name, "lobby_42");
        assert!(chans.is_joined(5));
        assert_eq!(chans.find_by_name("lobby_42").map(|c| c.channel_id), Some(5));
    }

    #[test]
    fn test_join_failure_adds_nothing() {
        let mut chans = ChatChannels::new();
        let refused = JoinChatChannelResponse {
            result: JoinChatResult::MaxMembers,
            ..joined(5, "full")
        };
        assert!(chans.join(&refused).is_none());
        assert!(chans.is_empty());
    }

    #[test]
    fn test_leave_removes_channel() {
        let mut chans = ChatChannels::new();
        chans.join(&joined(5, "a"));
        assert!(chans.leave(5).is_some());
        assert!(chans.leave(5).is_none());
        assert!(!chans.is_joined(5));
    }

    #[test]
    fn test_member_tracking() {
        let mut chans = ChatChannels::new();
        chans.join(&joined(5, "a"));
        chans.on_other_joined(&OtherJoinedChannel {
            channel_id: 5,
            persona_name: "x".into(),
            steam_id: SteamId(9),
        });
        assert_eq!(chans.get(5).map(|c| c.members.len()), Some(1));

        chans.on_other_left(&OtherLeftChannel {
            channel_id: 5,
            steam_id: SteamId(9),
        });
        assert_eq!(chans.get(5).map(|c| c.members.len()), Some(0));
    }

    #[test]
    fn test_clear_drops_all_channels() {
        let mut chans = ChatChannels::new();
        chans.join(&joined(1, "a"));
        chans.join(&joined(2, "b"));
        assert_eq!(chans.len(), 2);
        chans.clear();
        assert!(chans.is_empty());
    }
}

//! Events the client publishes to its subscribers.

use gclink_cache::{CacheEvent, ChatChannel};
use gclink_protocol::{
    ChatChannelSummary, ChatMessage, GcConnectionStatus, JoinChatResult, LobbyListEntry,
    MatchDetailsResponse, MsgTag, OtherJoinedChannel, OtherLeftChannel, SteamId,
};
use gclink_transport::LogonResult;

/// Something that happened on the session.
///
/// Delivered over a broadcast channel; see [`crate::GcClient::subscribe`].
/// Subscribers that lag too far behind miss events rather than stall the
/// client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GcEvent {
    /// The transport connected.
    Connected,
    /// The transport disconnected. Ready and lobby state are gone.
    Disconnected { user_initiated: bool },
    /// Login succeeded; the game is being announced.
    LoggedOn { steam_id: Option<SteamId> },
    /// Login was refused.
    LogonFailed {
        result: LogonResult,
        email_domain: Option<String>,
    },
    /// A hello went out.
    HelloSent { attempt: u32 },
    /// The coordinator welcomed us. The session is ready.
    Welcome { version: u32 },
    /// The coordinator reported on our session.
    ConnectionStatus(GcConnectionStatus),
    /// The coordinator pinged us (already answered).
    PingRequest,
    /// The shared-object cache changed.
    Cache(CacheEvent),
    /// Answer to a lobby list request.
    LobbyList(Vec<LobbyListEntry>),
    /// A chat channel was joined.
    ChatChannelJoined(ChatChannel),
    /// A chat channel join was refused.
    ChatJoinFailed {
        channel_name: String,
        result: JoinChatResult,
    },
    /// Answer to a chat channel list request.
    ChatChannelList(Vec<ChatChannelSummary>),
    ChatMessage(ChatMessage),
    ChatMemberJoined(OtherJoinedChannel),
    ChatMemberLeft(OtherLeftChannel),
    /// Match details that no pending request was waiting for.
    MatchDetails(MatchDetailsResponse),
    /// A message that was not understood: an unknown tag, a body that did
    /// not decode, or cache content of a type that is not decoded.
    Unhandled { tag: MsgTag, payload: Vec<u8> },
}

impl GcEvent {
    /// Whether this event reports a protocol message we could not use.
    pub fn is_unhandled(&self) -> bool {
        matches!(self, GcEvent::Unhandled { .. })
    }
}

//! Typed records for every message the client sends or understands.
//!
//! Records are tolerant readers: `#[serde(default)]` on each struct means a
//! field the coordinator stops sending decodes as its default instead of
//! failing the whole message.

mod chat;
mod econ;
mod lobby;
mod matches;
mod session;
mod so;

pub use chat::*;
pub use econ::*;
pub use lobby::*;
pub use matches::*;
pub use session::*;
pub use so::*;

/// Binds records to their message ids.
macro_rules! gc_message {
    ($($ty:ty => $id:expr),* $(,)?) => {
        $(
            impl $crate::GcMessage for $ty {
                const ID: u32 = $id;
            }
        )*
    };
}

use crate::msg::{base, dota, so as so_msg};

gc_message! {
    ClientHello => base::CLIENT_HELLO,
    ClientWelcome => base::CLIENT_WELCOME,
    ConnectionStatus => base::CLIENT_CONNECTION_STATUS,
    PingRequest => base::PING_REQUEST,
    PingResponse => base::PING_RESPONSE,
    InviteToLobby => base::INVITE_TO_LOBBY,

    SoCacheSubscribed => so_msg::CACHE_SUBSCRIBED,
    SoCacheUnsubscribed => so_msg::CACHE_UNSUBSCRIBED,
    SoMultipleObjects => so_msg::UPDATE_MULTIPLE,
    CacheSubscriptionRefresh => so_msg::CACHE_SUBSCRIPTION_REFRESH,
    SoCacheSubscribedUpToDate => so_msg::CACHE_SUBSCRIBED_UP_TO_DATE,

    PracticeLobbyCreate => dota::PRACTICE_LOBBY_CREATE,
    PracticeLobbyLeave => dota::PRACTICE_LOBBY_LEAVE,
    PracticeLobbyLaunch => dota::PRACTICE_LOBBY_LAUNCH,
    PracticeLobbyList => dota::PRACTICE_LOBBY_LIST,
    PracticeLobbyListResponse => dota::PRACTICE_LOBBY_LIST_RESPONSE,
    PracticeLobbySetDetails => dota::PRACTICE_LOBBY_SET_DETAILS,
    PracticeLobbyKick => dota::PRACTICE_LOBBY_KICK,
    PracticeLobbyKickFromTeam => dota::PRACTICE_LOBBY_KICK_FROM_TEAM,
    BalancedShuffleLobby => dota::BALANCED_SHUFFLE_LOBBY,
    FlipLobbyTeams => dota::FLIP_LOBBY_TEAMS,

    JoinChatChannel => dota::JOIN_CHAT_CHANNEL,
    JoinChatChannelResponse => dota::JOIN_CHAT_CHANNEL_RESPONSE,
    LeaveChatChannel => dota::LEAVE_CHAT_CHANNEL,
    ChatMessage => dota::CHAT_MESSAGE,
    OtherJoinedChannel => dota::OTHER_JOINED_CHANNEL,
    OtherLeftChannel => dota::OTHER_LEFT_CHANNEL,
    RequestChatChannelList => dota::REQUEST_CHAT_CHANNEL_LIST,
    RequestChatChannelListResponse => dota::REQUEST_CHAT_CHANNEL_LIST_RESPONSE,

    MatchDetailsRequest => dota::MATCH_DETAILS_REQUEST,
    MatchDetailsResponse => dota::MATCH_DETAILS_RESPONSE,
}

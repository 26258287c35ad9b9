//! Message ids and shared-object type ids.
//!
//! Ids are grouped by the family that defines them on the coordinator side.
//! They are always the flag-stripped value; see [`crate::MsgTag`].

/// Session bootstrap messages every GC shares.
pub mod base {
    pub const PING_REQUEST: u32 = 3001;
    pub const PING_RESPONSE: u32 = 3002;
    pub const CLIENT_WELCOME: u32 = 4004;
    pub const CLIENT_HELLO: u32 = 4006;
    pub const CLIENT_CONNECTION_STATUS: u32 = 4009;
    pub const INVITE_TO_LOBBY: u32 = 4512;
}

/// Shared-object cache replication.
pub mod so {
    pub const CREATE: u32 = 21;
    pub const UPDATE: u32 = 22;
    pub const DESTROY: u32 = 23;
    pub const CACHE_SUBSCRIBED: u32 = 24;
    pub const CACHE_UNSUBSCRIBED: u32 = 25;
    pub const UPDATE_MULTIPLE: u32 = 26;
    pub const CACHE_SUBSCRIPTION_REFRESH: u32 = 28;
    pub const CACHE_SUBSCRIBED_UP_TO_DATE: u32 = 29;
}

/// Game-specific lobby, chat and match messages.
pub mod dota {
    pub const JOIN_CHAT_CHANNEL: u32 = 7009;
    pub const JOIN_CHAT_CHANNEL_RESPONSE: u32 = 7010;
    pub const OTHER_JOINED_CHANNEL: u32 = 7013;
    pub const OTHER_LEFT_CHANNEL: u32 = 7014;
    pub const PRACTICE_LOBBY_CREATE: u32 = 7038;
    pub const PRACTICE_LOBBY_LEAVE: u32 = 7040;
    pub const PRACTICE_LOBBY_LAUNCH: u32 = 7041;
    pub const PRACTICE_LOBBY_LIST: u32 = 7042;
    pub const PRACTICE_LOBBY_LIST_RESPONSE: u32 = 7043;
    pub const PRACTICE_LOBBY_SET_DETAILS: u32 = 7046;
    pub const REQUEST_CHAT_CHANNEL_LIST: u32 = 7060;
    pub const REQUEST_CHAT_CHANNEL_LIST_RESPONSE: u32 = 7061;
    pub const PRACTICE_LOBBY_KICK: u32 = 7081;
    pub const MATCH_DETAILS_REQUEST: u32 = 7095;
    pub const MATCH_DETAILS_RESPONSE: u32 = 7096;
    pub const BALANCED_SHUFFLE_LOBBY: u32 = 7188;
    pub const LEAVE_CHAT_CHANNEL: u32 = 7272;
    pub const CHAT_MESSAGE: u32 = 7273;
    pub const FLIP_LOBBY_TEAMS: u32 = 7320;
    pub const PRACTICE_LOBBY_KICK_FROM_TEAM: u32 = 8047;
}

/// Shared-object type ids, as carried in cache messages.
pub mod so_type {
    pub const ECON_ITEM: i32 = 1;
    pub const ITEM_RECIPE: i32 = 5;
    pub const ECON_GAME_ACCOUNT_CLIENT: i32 = 7;
    pub const SELECTED_ITEM_PRESET: i32 = 35;
    pub const ITEM_PRESET_INSTANCE: i32 = 36;
    pub const DROP_RATE_BONUS: i32 = 38;
    pub const LEAGUE_VIEW_PASS: i32 = 39;
    pub const EVENT_TICKET: i32 = 40;
    pub const ITEM_TOURNAMENT_PASSPORT: i32 = 42;
    pub const GAME_ACCOUNT_CLIENT: i32 = 2002;
    pub const PARTY: i32 = 2003;
    pub const LOBBY: i32 = 2004;
    pub const PARTY_INVITE: i32 = 2006;
    pub const GAME_HERO_FAVORITES: i32 = 2007;
    pub const MAP_LOCATION_STATE: i32 = 2008;
    pub const TOURNAMENT: i32 = 2009;
    pub const PLAYER_CHALLENGE: i32 = 2010;
    pub const LOBBY_INVITE: i32 = 2011;
}

/// Human-readable name of a message id, for logs.
pub fn name(id: u32) -> &'static str {
    match id {
        base::PING_REQUEST => "PingRequest",
        base::PING_RESPONSE => "PingResponse",
        base::CLIENT_WELCOME => "ClientWelcome",
        base::CLIENT_HELLO => "ClientHello",
        base::CLIENT_CONNECTION_STATUS => "ClientConnectionStatus",
        base::INVITE_TO_LOBBY => "InviteToLobby",
        so::CREATE => "SOCreate",
        so::UPDATE => "SOUpdate",
        so::DESTROY => "SODestroy",
        so::CACHE_SUBSCRIBED => "SOCacheSubscribed",
        so::CACHE_UNSUBSCRIBED => "SOCacheUnsubscribed",
        so::UPDATE_MULTIPLE => "SOUpdateMultiple",
        so::CACHE_SUBSCRIPTION_REFRESH => "SOCacheSubscriptionRefresh",
        so::CACHE_SUBSCRIBED_UP_TO_DATE => "SOCacheSubscribedUpToDate",
        dota::JOIN_CHAT_CHANNEL => "JoinChatChannel",
        dota::JOIN_CHAT_CHANNEL_RESPONSE => "JoinChatChannelResponse",
        dota::OTHER_JOINED_CHANNEL => "OtherJoinedChannel",
        dota::OTHER_LEFT_CHANNEL => "OtherLeftChannel",
        dota::PRACTICE_LOBBY_CREATE => "PracticeLobbyCreate",
        dota::PRACTICE_LOBBY_LEAVE => "PracticeLobbyLeave",
        dota::PRACTICE_LOBBY_LAUNCH => "PracticeLobbyLaunch",
        dota::PRACTICE_LOBBY_LIST => "PracticeLobbyList",
        dota::PRACTICE_LOBBY_LIST_RESPONSE => "PracticeLobbyListResponse",
        dota::PRACTICE_LOBBY_SET_DETAILS => "PracticeLobbySetDetails",
        dota::REQUEST_CHAT_CHANNEL_LIST => "RequestChatChannelList",
        dota::REQUEST_CHAT_CHANNEL_LIST_RESPONSE => "RequestChatChannelListResponse",
        dota::PRACTICE_LOBBY_KICK => "PracticeLobbyKick",
        dota::MATCH_DETAILS_REQUEST => "MatchDetailsRequest",
        dota::MATCH_DETAILS_RESPONSE => "MatchDetailsResponse",
        dota::BALANCED_SHUFFLE_LOBBY => "BalancedShuffleLobby",
        dota::LEAVE_CHAT_CHANNEL => "LeaveChatChannel",
        dota::CHAT_MESSAGE => "ChatMessage",
        dota::FLIP_LOBBY_TEAMS => "FlipLobbyTeams",
        dota::PRACTICE_LOBBY_KICK_FROM_TEAM => "PracticeLobbyKickFromTeam",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_known_ids() {
        assert_eq!(name(base::CLIENT_WELCOME), "ClientWelcome");
        assert_eq!(name(so::UPDATE_MULTIPLE), "SOUpdateMultiple");
        assert_eq!(name(dota::MATCH_DETAILS_RESPONSE), "MatchDetailsResponse");
    }

    #[test]
    fn test_name_unknown_id() {
        assert_eq!(name(123_456), "Unknown");
    }
}

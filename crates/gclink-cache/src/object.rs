//! Cached objects and how they are keyed.

use std::fmt;

use gclink_protocol::{
    Codec, EconItem, GameAccountClient, Lobby, MapLocationState, ProtocolError, SoIdOwner,
    msg::so_type,
};

// ---------------------------------------------------------------------------
// SoTypeId
// ---------------------------------------------------------------------------

/// Type of a shared object.
///
/// Ids this crate has no name for are kept as `Unknown(raw)` so they still
/// round-trip and can be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoTypeId {
    EconItem,
    ItemRecipe,
    EconGameAccountClient,
    SelectedItemPreset,
    ItemPresetInstance,
    DropRateBonus,
    LeagueViewPass,
    EventTicket,
    ItemTournamentPassport,
    GameAccountClient,
    Party,
    Lobby,
    PartyInvite,
    GameHeroFavorites,
    MapLocationState,
    Tournament,
    PlayerChallenge,
    LobbyInvite,
    Unknown(i32),
}

impl SoTypeId {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            so_type::ECON_ITEM => Self::EconItem,
            so_type::ITEM_RECIPE => Self::ItemRecipe,
            so_type::ECON_GAME_ACCOUNT_CLIENT => Self::EconGameAccountClient,
            so_type::SELECTED_ITEM_PRESET => Self::SelectedItemPreset,
            so_type::ITEM_PRESET_INSTANCE => Self::ItemPresetInstance,
            so_type::DROP_RATE_BONUS => Self::DropRateBonus,
            so_type::LEAGUE_VIEW_PASS => Self::LeagueViewPass,
            so_type::EVENT_TICKET => Self::EventTicket,
            so_type::ITEM_TOURNAMENT_PASSPORT => Self::ItemTournamentPassport,
            so_type::GAME_ACCOUNT_CLIENT => Self::GameAccountClient,
            so_type::PARTY => Self::Party,
            so_type::LOBBY => Self::Lobby,
            so_type::PARTY_INVITE => Self::PartyInvite,
            so_type::GAME_HERO_FAVORITES => Self::GameHeroFavorites,
            so_type::MAP_LOCATION_STATE => Self::MapLocationState,
            so_type::TOURNAMENT => Self::Tournament,
            so_type::PLAYER_CHALLENGE => Self::PlayerChallenge,
            so_type::LOBBY_INVITE => Self::LobbyInvite,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            Self::EconItem => so_type::ECON_ITEM,
            Self::ItemRecipe => so_type::ITEM_RECIPE,
            Self::EconGameAccountClient => so_type::ECON_GAME_ACCOUNT_CLIENT,
            Self::SelectedItemPreset => so_type::SELECTED_ITEM_PRESET,
            Self::ItemPresetInstance => so_type::ITEM_PRESET_INSTANCE,
            Self::DropRateBonus => so_type::DROP_RATE_BONUS,
            Self::LeagueViewPass => so_type::LEAGUE_VIEW_PASS,
            Self::EventTicket => so_type::EVENT_TICKET,
            Self::ItemTournamentPassport => so_type::ITEM_TOURNAMENT_PASSPORT,
            Self::GameAccountClient => so_type::GAME_ACCOUNT_CLIENT,
            Self::Party => so_type::PARTY,
            Self::Lobby => so_type::LOBBY,
            Self::PartyInvite => so_type::PARTY_INVITE,
            Self::GameHeroFavorites => so_type::GAME_HERO_FAVORITES,
            Self::MapLocationState => so_type::MAP_LOCATION_STATE,
            Self::Tournament => so_type::TOURNAMENT,
            Self::PlayerChallenge => so_type::PLAYER_CHALLENGE,
            Self::LobbyInvite => so_type::LOBBY_INVITE,
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether objects of this type are decoded into records. Everything
    /// else is held as raw bytes.
    pub fn is_decodable(self) -> bool {
        matches!(
            self,
            Self::EconItem
                | Self::EconGameAccountClient
                | Self::GameAccountClient
                | Self::MapLocationState
                | Self::Lobby
        )
    }
}

impl fmt::Display for SoTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(raw) => write!(f, "Unknown({raw})"),
            known => write!(f, "{known:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ObjectKey / CachedObject
// ---------------------------------------------------------------------------

/// Identity of a cached object. The cache holds at most one object per key.
///
/// Decoded objects are identified by their own id. Raw objects only have a
/// position within their owner's snapshot, so their key carries the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub type_id: SoTypeId,
    pub object_id: u64,
    pub owner: Option<SoIdOwner>,
}

impl ObjectKey {
    pub fn new(type_id: SoTypeId, object_id: u64) -> Self {
        Self {
            type_id,
            object_id,
            owner: None,
        }
    }

    /// Key of a raw object at `ordinal` in `owner`'s cache.
    pub fn opaque(type_id: SoTypeId, ordinal: u64, owner: SoIdOwner) -> Self {
        Self {
            type_id,
            object_id: ordinal,
            owner: Some(owner),
        }
    }

    pub fn lobby(lobby_id: u64) -> Self {
        Self::new(SoTypeId::Lobby, lobby_id)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_id, self.object_id)?;
        if let Some(owner) = self.owner {
            write!(f, "@{}:{}", owner.owner_type, owner.id)?;
        }
        Ok(())
    }
}

/// Decoded body of a cached object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectPayload {
    EconItem(EconItem),
    GameAccountClient(GameAccountClient),
    MapLocation(MapLocationState),
    Lobby(Box<Lobby>),
    /// A type that is not decoded; kept verbatim.
    Raw(Vec<u8>),
}

/// One replicated object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedObject {
    pub type_id: SoTypeId,
    pub object_id: u64,
    pub version: u64,
    /// Whose cache the object arrived in, when known.
    pub owner: Option<SoIdOwner>,
    pub payload: ObjectPayload,
}

impl CachedObject {
    /// Decodes an object body.
    ///
    /// Decodable types take their id from the record itself. Other types are
    /// kept raw and keyed by `ordinal`, their position in the list they
    /// arrived in.
    pub fn decode<C: Codec>(
        codec: &C,
        type_id: SoTypeId,
        data: &[u8],
        ordinal: u64,
    ) -> Result<Self, ProtocolError> {
        let (object_id, payload) = match type_id {
            SoTypeId::EconItem => {
                let item: EconItem = codec.decode(data)?;
                (item.id, ObjectPayload::EconItem(item))
            }
            SoTypeId::EconGameAccountClient | SoTypeId::GameAccountClient => {
                let account: GameAccountClient = codec.decode(data)?;
                (
                    u64::from(account.account_id),
                    ObjectPayload::GameAccountClient(account),
                )
            }
            SoTypeId::MapLocationState => {
                let location: MapLocationState = codec.decode(data)?;
                (
                    u64::from(location.location_id),
                    ObjectPayload::MapLocation(location),
                )
            }
            SoTypeId::Lobby => {
                let lobby: Lobby = codec.decode(data)?;
                (lobby.lobby_id, ObjectPayload::Lobby(Box::new(lobby)))
            }
            _ => (ordinal, ObjectPayload::Raw(data.to_vec())),
        };
        Ok(Self {
            type_id,
            object_id,
            version: 0,
            owner: None,
            payload,
        })
    }

    pub fn key(&self) -> ObjectKey {
        match (&self.payload, self.owner) {
            (ObjectPayload::Raw(_), Some(owner)) => {
                ObjectKey::opaque(self.type_id, self.object_id, owner)
            }
            _ => ObjectKey::new(self.type_id, self.object_id),
        }
    }

    pub fn with_owner(mut self, owner: SoIdOwner, version: u64) -> Self {
        self.owner = Some(owner);
        self.version = version;
        self
    }

    pub fn as_lobby(&self) -> Option<&Lobby> {
        match &self.payload {
            ObjectPayload::Lobby(lobby) => Some(lobby.as_ref()),
            _ => None,
        }
    }

    /// A lobby object, ready to store.
    pub fn from_lobby(lobby: Lobby) -> Self {
        Self {
            type_id: SoTypeId::Lobby,
            object_id: lobby.lobby_id,
            version: 0,
            owner: None,
            payload: ObjectPayload::Lobby(Box::new(lobby)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gclink_protocol::JsonCodec;

    #[test]
    fn test_so_type_id_round_trips_known_and_unknown() {
        for raw in [1, 5, 7, 2002, 2004, 2008, 2011, 9999] {
            assert_eq!(SoTypeId::from_raw(raw).raw(), raw);
        }
        assert_eq!(SoTypeId::from_raw(2004), SoTypeId::Lobby);
        assert_eq!(SoTypeId::from_raw(9999), SoTypeId::Unknown(9999));
    }

    #[test]
    fn test_decode_lobby_keys_by_lobby_id() {
        let data = JsonCodec.encode(&Lobby {
            lobby_id: 42,
            ..Default::default()
        });
        let obj = CachedObject::decode(&JsonCodec, SoTypeId::Lobby, &data.unwrap(), 3).unwrap();
        assert_eq!(obj.key(), ObjectKey::lobby(42));
        assert_eq!(obj.as_lobby().map(|l| l.lobby_id), Some(42));
    }

    #[test]
    fn test_decode_unknown_type_keeps_raw_bytes_by_ordinal() {
        let obj = CachedObject::decode(&JsonCodec, SoTypeId::Unknown(77), b"\x01\x02", 5).unwrap();
        assert_eq!(obj.object_id, 5);
        assert_eq!(obj.payload, ObjectPayload::Raw(vec![1, 2]));
    }

    #[test]
    fn test_decode_econ_game_account_client_as_account() {
        let data = JsonCodec
            .encode(&GameAccountClient {
                account_id: 7,
                ..Default::default()
            })
            .unwrap();
        let obj =
            CachedObject::decode(&JsonCodec, SoTypeId::EconGameAccountClient, &data, 0).unwrap();
        assert_eq!(obj.object_id, 7);
        assert!(matches!(obj.payload, ObjectPayload::GameAccountClient(_)));
    }

    #[test]
    fn test_key_of_raw_object_includes_owner() {
        let owner = SoIdOwner::new(SoIdOwner::ACCOUNT, 100);
        let obj = CachedObject::decode(&JsonCodec, SoTypeId::Party, b"\xaa", 0)
            .unwrap()
            .with_owner(owner, 1);
        assert_eq!(obj.key(), ObjectKey::opaque(SoTypeId::Party, 0, owner));
        assert_ne!(obj.key(), ObjectKey::new(SoTypeId::Party, 0));
    }

    #[test]
    fn test_decode_bad_bytes_for_known_type_fails() {
        let result = CachedObject::decode(&JsonCodec, SoTypeId::EconItem, b"garbage", 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_object_key_display() {
        assert_eq!(ObjectKey::lobby(9).to_string(), "Lobby/9");
        assert_eq!(
            ObjectKey::new(SoTypeId::Unknown(3), 1).to_string(),
            "Unknown(3)/1"
        );
        assert_eq!(
            ObjectKey::opaque(SoTypeId::Party, 0, SoIdOwner::new(1, 100)).to_string(),
            "Party/0@1:100"
        );
    }
}

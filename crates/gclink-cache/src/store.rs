//! The shared-object cache store.
//!
//! The coordinator replicates state to the client as objects grouped into
//! per-owner caches. It sends a full snapshot when a subscription starts,
//! whole-object replacements as things change, and destroy or unsubscribe
//! notices when things go away. `SoCache` applies all of that and reports
//! what changed as [`CacheEvent`]s.
//!
//! Updates are last-write-wins: an object is always replaced wholesale,
//! never merged field by field.
//!
//! The lobby gets special treatment. The cache remembers which lobby is
//! active, so it can tell a lobby appearing ("created") from a lobby
//! changing ("updated"), and report leaving it exactly once.

use std::collections::HashMap;

use gclink_protocol::{
    Codec, EconItem, GameAccountClient, Lobby, LobbyMember, MapLocationState, SoCacheSubscribed,
    SoCacheUnsubscribed, SoCacheVersion, SoIdOwner, SoMultipleObjects, SoObject, SoSingleObject,
};

use crate::{CachedObject, ObjectKey, ObjectPayload, SoTypeId};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Why the active lobby went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveReason {
    /// The lobby object was destroyed.
    Destroyed,
    /// The subscription to the lobby's cache ended.
    Unsubscribed,
}

/// A change to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A lobby arrived while none was active.
    LobbyCreated(Box<Lobby>),
    /// The active lobby changed.
    LobbyUpdated(Box<Lobby>),
    /// The active lobby is gone.
    LobbyLeft { lobby_id: u64, reason: LeaveReason },
    /// Account state arrived or changed.
    GameAccountClient(GameAccountClient),
    /// Any other object was stored.
    ObjectStored(ObjectKey),
    /// Any other object was removed.
    ObjectRemoved(ObjectKey),
    /// A full snapshot for an owner was applied.
    CacheSubscribed { owner: SoIdOwner, version: u64 },
    /// A subscription other than the lobby's ended.
    CacheUnsubscribed(SoIdOwner),
}

/// Result of applying one cache message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Applied {
    pub events: Vec<CacheEvent>,
    /// `true` if some part of the message was not understood (an object of
    /// a type that is not decoded, or a body that failed to decode).
    pub unhandled: bool,
}

impl Applied {
    fn extend(&mut self, events: Vec<CacheEvent>) {
        self.events.extend(events);
    }
}

// ---------------------------------------------------------------------------
// SoCache
// ---------------------------------------------------------------------------

/// Client-side replica of every cache the coordinator has subscribed us to.
#[derive(Debug, Default)]
pub struct SoCache {
    objects: HashMap<ObjectKey, CachedObject>,
    /// Subscribed owners and the version we hold of each.
    versions: HashMap<SoIdOwner, u64>,
    active_lobby: Option<u64>,
}

impl SoCache {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Object-level operations
    // -----------------------------------------------------------------------

    /// Inserts or wholesale-replaces an object.
    pub fn apply_snapshot(&mut self, object: CachedObject) -> Vec<CacheEvent> {
        let key = object.key();
        let event = match &object.payload {
            ObjectPayload::Lobby(lobby) => {
                let event = match self.active_lobby {
                    None => CacheEvent::LobbyCreated(lobby.clone()),
                    Some(previous) => {
                        if previous != lobby.lobby_id {
                            // Only one lobby is ever active.
                            self.objects.remove(&ObjectKey::lobby(previous));
                        }
                        CacheEvent::LobbyUpdated(lobby.clone())
                    }
                };
                self.active_lobby = Some(lobby.lobby_id);
                event
            }
            ObjectPayload::GameAccountClient(account) => {
                CacheEvent::GameAccountClient(account.clone())
            }
            _ => CacheEvent::ObjectStored(key),
        };
        tracing::trace!(%key, "object stored");
        self.objects.insert(key, object);
        vec![event]
    }

    /// Applies an update. Updates carry the whole object, so this is the
    /// same full replacement as a snapshot.
    pub fn apply_delta(&mut self, object: CachedObject) -> Vec<CacheEvent> {
        self.apply_snapshot(object)
    }

    /// Removes an object.
    pub fn destroy(&mut self, key: ObjectKey) -> Vec<CacheEvent> {
        let removed = self.objects.remove(&key);
        if key.type_id == SoTypeId::Lobby && self.active_lobby == Some(key.object_id) {
            self.active_lobby = None;
            tracing::info!(lobby_id = key.object_id, "lobby destroyed");
            return vec![CacheEvent::LobbyLeft {
                lobby_id: key.object_id,
                reason: LeaveReason::Destroyed,
            }];
        }
        match removed {
            Some(_) => vec![CacheEvent::ObjectRemoved(key)],
            None => Vec::new(),
        }
    }

    /// Ends the subscription to `owner`'s cache and drops its objects.
    pub fn unsubscribe(&mut self, owner: SoIdOwner) -> Vec<CacheEvent> {
        self.versions.remove(&owner);
        self.objects.retain(|_, obj| obj.owner != Some(owner));

        if self.active_lobby == Some(owner.id) {
            self.objects.remove(&ObjectKey::lobby(owner.id));
            self.active_lobby = None;
            tracing::info!(lobby_id = owner.id, "lobby unsubscribed");
            return vec![CacheEvent::LobbyLeft {
                lobby_id: owner.id,
                reason: LeaveReason::Unsubscribed,
            }];
        }
        vec![CacheEvent::CacheUnsubscribed(owner)]
    }

    /// Forgets the active lobby without reporting it.
    ///
    /// Used when the session starts over: the next lobby snapshot will be
    /// reported as created.
    pub fn forget_lobby(&mut self) {
        if let Some(lobby_id) = self.active_lobby.take() {
            self.objects.remove(&ObjectKey::lobby(lobby_id));
        }
    }

    /// Drops everything.
    pub fn reset(&mut self) {
        self.objects.clear();
        self.versions.clear();
        self.active_lobby = None;
    }

    // -----------------------------------------------------------------------
    // Message-level operations
    // -----------------------------------------------------------------------

    /// Applies a full snapshot of one owner's cache.
    ///
    /// Objects previously held for that owner that the snapshot no longer
    /// contains are removed.
    pub fn apply_subscribed<C: Codec>(&mut self, codec: &C, msg: &SoCacheSubscribed) -> Applied {
        let owner = msg.owner_soid;
        let mut applied = Applied::default();
        let mut seen = Vec::new();

        for group in &msg.objects {
            let type_id = SoTypeId::from_raw(group.type_id);
            for (ordinal, data) in group.object_data.iter().enumerate() {
                match CachedObject::decode(codec, type_id, data, ordinal as u64) {
                    Ok(object) => {
                        let object = object.with_owner(owner, msg.version);
                        seen.push(object.key());
                        applied.extend(self.apply_snapshot(object));
                    }
                    Err(e) => {
                        tracing::warn!(%type_id, error = %e, "undecodable object in snapshot");
                        applied.unhandled = true;
                    }
                }
            }
        }

        let stale: Vec<ObjectKey> = self
            .objects
            .iter()
            .filter(|(key, obj)| {
                obj.owner == Some(owner)
                    && key.type_id != SoTypeId::Lobby
                    && !seen.contains(key)
            })
            .map(|(key, _)| *key)
            .collect();
        for key in stale {
            applied.extend(self.destroy(key));
        }

        self.versions.insert(owner, msg.version);
        applied.events.push(CacheEvent::CacheSubscribed {
            owner,
            version: msg.version,
        });
        tracing::debug!(owner = owner.id, version = msg.version, "cache subscribed");
        applied
    }

    /// Applies an envelope of changes to one owner's cache.
    ///
    /// Every sub-object is processed; `unhandled` is set if any of them was
    /// of a type that is not decoded.
    pub fn apply_multiple<C: Codec>(&mut self, codec: &C, msg: &SoMultipleObjects) -> Applied {
        let mut applied = Applied::default();
        let owner = msg.owner_soid;

        for obj in msg.objects_modified.iter().chain(&msg.objects_added) {
            match self.decode_known(codec, obj.type_id, &obj.object_data) {
                Some(object) => {
                    applied.extend(self.apply_delta(object.with_owner(owner, msg.version)))
                }
                None => applied.unhandled = true,
            }
        }
        for obj in &msg.objects_removed {
            match self.removal_key(codec, obj) {
                Some(key) => applied.extend(self.destroy(key)),
                None => applied.unhandled = true,
            }
        }

        if let Some(version) = self.versions.get_mut(&owner) {
            *version = msg.version;
        }
        applied
    }

    /// Applies a single create or update.
    pub fn apply_single_update<C: Codec>(&mut self, codec: &C, msg: &SoSingleObject) -> Applied {
        match self.decode_known(codec, msg.type_id, &msg.object_data) {
            Some(object) => Applied {
                events: self.apply_delta(object.with_owner(msg.owner_soid, msg.version)),
                unhandled: false,
            },
            None => Applied {
                events: Vec::new(),
                unhandled: true,
            },
        }
    }

    /// Applies a single destroy.
    ///
    /// A lobby destroy whose body does not name a lobby is taken to mean the
    /// active one.
    pub fn destroy_single<C: Codec>(&mut self, codec: &C, msg: &SoSingleObject) -> Applied {
        let obj = SoObject {
            type_id: msg.type_id,
            object_data: msg.object_data.clone(),
        };
        match self.removal_key(codec, &obj) {
            Some(key) => Applied {
                events: self.destroy(key),
                unhandled: false,
            },
            None => Applied {
                events: Vec::new(),
                unhandled: true,
            },
        }
    }

    /// Applies an unsubscribe notice.
    pub fn apply_unsubscribed(&mut self, msg: &SoCacheUnsubscribed) -> Vec<CacheEvent> {
        self.unsubscribe(msg.owner_soid)
    }

    /// Records that the cache we hold for an owner is current.
    pub fn mark_up_to_date(&mut self, owner: SoIdOwner, version: u64) {
        self.versions.insert(owner, version);
    }

    fn decode_known<C: Codec>(&self, codec: &C, raw_type: i32, data: &[u8]) -> Option<CachedObject> {
        let type_id = SoTypeId::from_raw(raw_type);
        if !type_id.is_decodable() {
            tracing::debug!(%type_id, "object type not decoded");
            return None;
        }
        match CachedObject::decode(codec, type_id, data, 0) {
            Ok(object) => Some(object),
            Err(e) => {
                tracing::warn!(%type_id, error = %e, "undecodable object");
                None
            }
        }
    }

    fn removal_key<C: Codec>(&self, codec: &C, obj: &SoObject) -> Option<ObjectKey> {
        let type_id = SoTypeId::from_raw(obj.type_id);
        if type_id == SoTypeId::Lobby {
            let named = codec
                .decode::<Lobby>(&obj.object_data)
                .ok()
                .map(|lobby| lobby.lobby_id)
                .filter(|id| *id != 0);
            return named.or(self.active_lobby).map(ObjectKey::lobby);
        }
        self.decode_known(codec, obj.type_id, &obj.object_data)
            .map(|object| object.key())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The active lobby.
    pub fn lobby(&self) -> Option<&Lobby> {
        let id = self.active_lobby?;
        self.objects.get(&ObjectKey::lobby(id))?.as_lobby()
    }

    pub fn lobby_id(&self) -> Option<u64> {
        self.active_lobby
    }

    /// Members of the active lobby; empty without one.
    pub fn lobby_members(&self) -> &[LobbyMember] {
        self.lobby().map(|l| l.members.as_slice()).unwrap_or(&[])
    }

    pub fn econ_items(&self) -> impl Iterator<Item = &EconItem> {
        self.objects.values().filter_map(|obj| match &obj.payload {
            ObjectPayload::EconItem(item) => Some(item),
            _ => None,
        })
    }

    pub fn map_locations(&self) -> impl Iterator<Item = &MapLocationState> {
        self.objects.values().filter_map(|obj| match &obj.payload {
            ObjectPayload::MapLocation(location) => Some(location),
            _ => None,
        })
    }

    pub fn game_account_client(&self) -> Option<&GameAccountClient> {
        self.objects.values().find_map(|obj| match &obj.payload {
            ObjectPayload::GameAccountClient(account) => Some(account),
            _ => None,
        })
    }

    pub fn get(&self, key: &ObjectKey) -> Option<&CachedObject> {
        self.objects.get(key)
    }

    /// Version held of an owner's cache.
    pub fn version_of(&self, owner: SoIdOwner) -> Option<u64> {
        self.versions.get(&owner).copied()
    }

    /// Every subscribed cache and its version, as announced in a hello.
    pub fn cache_versions(&self) -> Vec<SoCacheVersion> {
        self.versions
            .iter()
            .map(|(owner, version)| SoCacheVersion {
                owner_soid: *owner,
                version: *version,
            })
            .collect()
    }

    /// Number of objects held.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

//! Shared-object cache replication records.

use serde::{Deserialize, Serialize};

/// Identifies whose cache an object belongs to: an account, a lobby, a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoIdOwner {
    #[serde(rename = "type")]
    pub owner_type: u32,
    pub id: u64,
}

impl SoIdOwner {
    /// Owner type of an individual account's cache.
    pub const ACCOUNT: u32 = 1;
    /// Owner type of a lobby's cache.
    pub const LOBBY: u32 = 3;

    pub const fn new(owner_type: u32, id: u64) -> Self {
        Self { owner_type, id }
    }
}

/// A cache and the version the holder has of it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoCacheVersion {
    pub owner_soid: SoIdOwner,
    pub version: u64,
}

/// All objects of one type within a subscription snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscribedType {
    pub type_id: i32,
    pub object_data: Vec<Vec<u8>>,
}

/// A full snapshot of one owner's cache.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoCacheSubscribed {
    pub owner_soid: SoIdOwner,
    pub objects: Vec<SubscribedType>,
    pub version: u64,
}

/// The subscription to an owner's cache ended.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoCacheUnsubscribed {
    pub owner_soid: SoIdOwner,
}

/// The cache we hold for an owner is already current.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoCacheSubscribedUpToDate {
    pub owner_soid: SoIdOwner,
    pub version: u64,
}

/// Asks the coordinator to resend a cache snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSubscriptionRefresh {
    pub owner_soid: SoIdOwner,
}

/// One object created, updated or destroyed. Shared by the three
/// single-object messages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoSingleObject {
    pub owner_soid: SoIdOwner,
    pub type_id: i32,
    pub object_data: Vec<u8>,
    pub version: u64,
}

/// A typed object inside a multi-object envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoObject {
    pub type_id: i32,
    pub object_data: Vec<u8>,
}

/// Several changes to one owner's cache in one envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoMultipleObjects {
    pub owner_soid: SoIdOwner,
    pub version: u64,
    pub objects_modified: Vec<SoObject>,
    pub objects_added: Vec<SoObject>,
    pub objects_removed: Vec<SoObject>,
}

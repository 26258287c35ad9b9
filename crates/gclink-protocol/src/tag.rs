//! Message-type tags.
//!
//! Every GC message carries a 32-bit type tag. The low 31 bits are the
//! message id; the top bit says whether the body is a structured record
//! (as opposed to a legacy fixed-layout struct). Ids are compared with the
//! flag stripped, and every message this crate sends sets it.

use std::fmt;

/// The "body is a structured record" flag bit.
pub const PROTO_FLAG: u32 = 0x8000_0000;

/// A decomposed message-type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MsgTag {
    /// Message id with the flag bit stripped.
    pub id: u32,
    /// Whether the structured-format flag was set.
    pub structured: bool,
}

impl MsgTag {
    /// A structured tag for the given message id.
    pub const fn structured(id: u32) -> Self {
        Self {
            id: id & !PROTO_FLAG,
            structured: true,
        }
    }

    /// Splits a raw wire tag into id and flag.
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            id: raw & !PROTO_FLAG,
            structured: raw & PROTO_FLAG != 0,
        }
    }

    /// Re-assembles the raw wire tag.
    pub const fn into_raw(self) -> u32 {
        if self.structured {
            self.id | PROTO_FLAG
        } else {
            self.id
        }
    }
}

impl fmt::Display for MsgTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.structured {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} (legacy)", self.id)
        }
    }
}

//! Packets: a tag, an optional job id and an encoded record body.
//!
//! [`GcPacket`] is the unit the session layer works with. It converts from
//! the transport's [`InboundPacket`] and into its [`OutboundPacket`], so the
//! layers above never handle raw tags.

use gclink_transport::{InboundPacket, OutboundPacket};
use serde::{Serialize, de::DeserializeOwned};

use crate::{Codec, JobId, MsgTag, ProtocolError};

/// A record bound to the message id it travels under.
///
/// Implemented for every typed record in this crate via the
/// `gc_message!` macro in `records.rs`.
pub trait GcMessage: Serialize + DeserializeOwned {
    /// Flag-stripped message id.
    const ID: u32;
}

/// A GC message with its body still encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcPacket {
    pub tag: MsgTag,
    pub job_id: Option<JobId>,
    pub payload: Vec<u8>,
}

impl GcPacket {
    /// Encodes a typed record into a structured packet.
    pub fn encode<C: Codec, M: GcMessage>(codec: &C, msg: &M) -> Result<Self, ProtocolError> {
        Ok(Self {
            tag: MsgTag::structured(M::ID),
            job_id: None,
            payload: codec.encode(msg)?,
        })
    }

    /// Decodes the body as `M`, after checking that the tag is `M`'s.
    pub fn decode<C: Codec, M: GcMessage>(&self, codec: &C) -> Result<M, ProtocolError> {
        if self.tag.id != M::ID {
            return Err(ProtocolError::UnexpectedMessage {
                expected: M::ID,
                actual: self.tag,
            });
        }
        codec.decode(&self.payload)
    }

    /// Decodes the body as any record, without checking the tag.
    ///
    /// Used for bodies shared by several ids (create, update and destroy
    /// all carry the same single-object record).
    pub fn decode_body<C: Codec, T: DeserializeOwned>(&self, codec: &C) -> Result<T, ProtocolError> {
        codec.decode(&self.payload)
    }

    /// Attaches a correlation id.
    pub fn with_job(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }

    /// Converts into the transport's outbound form, addressed to `app_id`.
    pub fn into_outbound(self, app_id: u32) -> OutboundPacket {
        OutboundPacket {
            app_id,
            msg_type: self.tag.into_raw(),
            source_job: self.job_id.map(JobId::into_inner),
            payload: self.payload,
        }
    }
}

impl From<InboundPacket> for GcPacket {
    fn from(packet: InboundPacket) -> Self {
        Self {
            tag: MsgTag::from_raw(packet.msg_type),
            job_id: packet.target_job.map(JobId::new),
            payload: packet.payload,
        }
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientWelcome, JsonCodec, MatchDetailsRequest, msg, tag::PROTO_FLAG};

    #[test]
    fn test_encode_sets_structured_tag() {
        let packet = GcPacket::encode(&JsonCodec, &MatchDetailsRequest { match_id: 1 }).unwrap();
        assert_eq!(packet.tag, MsgTag::structured(msg::dota::MATCH_DETAILS_REQUEST));
        assert_eq!(packet.job_id, None);
    }

    #[test]
    fn test_decode_wrong_record_is_unexpected_message() {
        let packet = GcPacket::encode(&JsonCodec, &MatchDetailsRequest { match_id: 1 }).unwrap();
        let result: Result<ClientWelcome, _> = packet.decode(&JsonCodec);
        assert!(matches!(
            result,
            Err(ProtocolError::UnexpectedMessage {
                expected: msg::base::CLIENT_WELCOME,
                ..
            })
        ));
    }

    #[test]
    fn test_into_outbound_carries_job_and_flag() {
        let packet = GcPacket::encode(&JsonCodec, &MatchDetailsRequest { match_id: 9 })
            .unwrap()
            .with_job(JobId::new(5));
        let out = packet.into_outbound(570);
        assert_eq!(out.app_id, 570);
        assert_eq!(out.msg_type, PROTO_FLAG | msg::dota::MATCH_DETAILS_REQUEST);
        assert_eq!(out.source_job, Some(5));
    }

    #[test]
    fn test_from_inbound_splits_tag_and_job() {
        let inbound = InboundPacket {
            app_id: 570,
            msg_type: PROTO_FLAG | msg::dota::MATCH_DETAILS_RESPONSE,
            target_job: Some(12),
            payload: b"{}".to_vec(),
        };
        let packet = GcPacket::from(inbound);
        assert_eq!(packet.tag.id, msg::dota::MATCH_DETAILS_RESPONSE);
        assert!(packet.tag.structured);
        assert_eq!(packet.job_id, Some(JobId::new(12)));
    }
}

//! Codec trait and implementations for record bodies.
//!
//! The game coordinator speaks in structured records. How a record becomes
//! bytes is not this workspace's concern: anything that implements [`Codec`]
//! can be plugged in. [`JsonCodec`] is the stand-in used by the tests and the
//! demo, and makes captured traffic readable in logs.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes records to bytes and decodes them back.
///
/// `Send + Sync + 'static` because the codec is shared between the inbound
/// loop and every caller issuing commands, all of which may run on different
/// runtime threads.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a record into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the record cannot be represented
    /// in this format.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a record.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or do not
    /// match the expected record.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use gclink_protocol::{Codec, JsonCodec, MatchDetailsRequest};
///
/// let codec = JsonCodec;
/// let request = MatchDetailsRequest { match_id: 3111014659 };
///
/// let bytes = codec.encode(&request).unwrap();
/// let decoded: MatchDetailsRequest = codec.decode(&bytes).unwrap();
/// assert_eq!(request, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientHello, Engine};

    #[test]
    fn test_json_codec_encodes_readable_json() {
        let hello = ClientHello {
            engine: Engine::Source2,
            client_session_need: 104,
            ..Default::default()
        };
        let bytes = JsonCodec.encode(&hello).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"client_session_need\":104"));
        assert!(text.contains("\"Source2\""));
    }

    #[test]
    fn test_json_codec_decode_garbage_is_decode_error() {
        let result: Result<ClientHello, _> = JsonCodec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_fills_missing_fields_with_defaults() {
        // Records are tolerant: fields the sender omits decode as defaults.
        let hello: ClientHello = JsonCodec.decode(b"{}").unwrap();
        assert_eq!(hello, ClientHello::default());
    }
}

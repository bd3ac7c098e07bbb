//! Inscription payload codecs.
//!
//! Two wire formats: JSON (canonical form) and CBOR, the latter preferred
//! for size. The content type always names the codec actually used, so a
//! fetched inscription decodes by its recorded content type.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use crate::asset::Original;
use crate::log::EventLog;
use crate::{canonical, Error, Result};

/// Protocol tag for full-asset inscriptions.
pub const PROTOCOL: &str = "originals";

/// Protocol tag for log-only inscriptions.
pub const LOG_PROTOCOL: &str = "originals-log";

/// Protocol version carried in inscription metadata.
pub const PROTOCOL_VERSION: &str = "2.0";

/// Wire format of an inscription payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Codec {
    /// Canonical JSON, `application/json`.
    Json,

    /// CBOR, `application/cbor`.
    #[default]
    Cbor,
}

impl Codec {
    /// The content type announcing this codec.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Cbor => "application/cbor",
        }
    }

    /// The codec a content type announces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an unknown content type.
    pub fn from_content_type(content_type: &str) -> Result<Self> {
        match content_type {
            "application/json" => Ok(Self::Json),
            "application/cbor" => Ok(Self::Cbor),
            other => Err(Error::Validation(format!("unknown inscription content type: {other}"))),
        }
    }

    fn encode(self, value: &impl Serialize) -> Result<Vec<u8>> {
        match self {
            Self::Json => canonical::canonicalize(value),
            Self::Cbor => serde_cbor::to_vec(value)
                .map_err(|e| Error::Encoding(format!("CBOR encoding failed: {e}"))),
        }
    }

    fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T> {
        match self {
            Self::Json => serde_json::from_slice(bytes)
                .map_err(|e| Error::Encoding(format!("JSON decoding failed: {e}"))),
            Self::Cbor => serde_cbor::from_slice(bytes)
                .map_err(|e| Error::Encoding(format!("CBOR decoding failed: {e}"))),
        }
    }
}

/// Serialize a full Original for inscription.
///
/// # Errors
///
/// Returns [`Error::Encoding`] on serialization failure.
pub fn encode_original(original: &Original, codec: Codec) -> Result<Vec<u8>> {
    codec.encode(original)
}

/// Decode a full Original from inscribed bytes.
///
/// # Errors
///
/// Returns [`Error::Encoding`] when the bytes do not decode as an Original.
pub fn decode_original(bytes: &[u8], codec: Codec) -> Result<Original> {
    codec.decode(bytes)
}

/// Serialize an event log for a log-only inscription.
///
/// # Errors
///
/// Returns [`Error::Encoding`] on serialization failure.
pub fn encode_log(log: &EventLog, codec: Codec) -> Result<Vec<u8>> {
    codec.encode(log)
}

/// Decode an event log from inscribed bytes.
///
/// # Errors
///
/// Returns [`Error::Encoding`] when the bytes do not decode as a log.
pub fn decode_log(bytes: &[u8], codec: Codec) -> Result<EventLog> {
    codec.decode(bytes)
}

/// Metadata carried with a full-asset inscription.
#[must_use]
pub fn original_metadata(original: &Original) -> Value {
    json!({
        "protocol": PROTOCOL,
        "version": PROTOCOL_VERSION,
        "originalDid": original.did,
        "layer": original.layer,
    })
}

/// Metadata carried with a log-only inscription.
#[must_use]
pub fn log_metadata(log: &EventLog) -> Value {
    json!({
        "protocol": LOG_PROTOCOL,
        "version": PROTOCOL_VERSION,
        "events": log.events.len(),
    })
}

//! # Bitcoin Ordinals Layer Adapter
//!
//! Bridges the engine to an external ordinals provider: serializing an
//! Original (or just its log) into an inscription payload, submitting it,
//! deriving the `did:btco` identifier from the reveal transaction, and
//! fetching assets back by DID.

mod adapter;
mod codec;
mod fee;

use std::future::Future;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use adapter::{Anchor, OrdinalsAdapter, OrdinalsConfig};
pub use codec::{
    decode_log, decode_original, encode_log, encode_original, log_metadata, original_metadata,
    Codec, LOG_PROTOCOL, PROTOCOL, PROTOCOL_VERSION,
};
pub use fee::{estimate_fee, FeeEstimate, COMMIT_VBYTES, REVEAL_BASE_VBYTES};

static INSCRIPTION_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-f0-9]{64}i[0-9]+$").expect("should compile"));

/// Whether a string is a well-formed inscription id (`<txid>i<vout>`).
#[must_use]
pub fn is_valid_inscription_id(id: &str) -> bool {
    INSCRIPTION_ID_REGEX.is_match(id)
}

/// A request to inscribe content.
#[derive(Clone, Debug)]
pub struct InscriptionRequest {
    /// The payload bytes.
    pub content: Vec<u8>,

    /// `application/json` or `application/cbor`.
    pub content_type: String,

    /// Fee rate in sats/vbyte, when the caller wants to pin one.
    pub fee_rate: Option<u64>,

    /// Protocol metadata carried alongside the payload.
    pub metadata: Option<Value>,
}

/// An inscription as reported by the provider.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InscriptionRecord {
    /// `<txid>i<vout>`.
    pub inscription_id: String,

    /// Reveal transaction id.
    pub txid: String,

    /// Output index of the inscription.
    pub vout: u64,

    /// The satoshi carrying the inscription, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satoshi: Option<u64>,

    /// The inscribed bytes.
    pub content: Vec<u8>,

    /// Content type of the inscribed bytes.
    pub content_type: String,
}

/// The external ordinals provider: transaction building, signing, and
/// broadcast all live behind this boundary.
pub trait OrdinalsProvider: Send + Sync {
    /// Build, sign, and broadcast a commit/reveal pair carrying the content.
    fn create_inscription(
        &self, request: &InscriptionRequest,
    ) -> impl Future<Output = anyhow::Result<InscriptionRecord>> + Send;

    /// Look up an inscription by id. `None` when unknown.
    fn get_inscription(
        &self, inscription_id: &str,
    ) -> impl Future<Output = anyhow::Result<Option<InscriptionRecord>>> + Send;
}

/// Optional provider operations. Split out so minimal providers need not
/// stub them.
pub trait OrdinalsProviderExt: OrdinalsProvider {
    /// Transfer an inscription to an address, returning the txid.
    fn transfer_inscription(
        &self, inscription_id: &str, to_address: &str,
    ) -> impl Future<Output = anyhow::Result<String>> + Send;

    /// Broadcast a raw transaction, returning the txid.
    fn broadcast_transaction(
        &self, raw_tx: &[u8],
    ) -> impl Future<Output = anyhow::Result<String>> + Send;

    /// The provider's current fee-rate estimate in sats/vbyte.
    fn estimate_fee_rate(&self) -> impl Future<Output = anyhow::Result<u64>> + Send;
}

//! # Capability Traits
//!
//! The engine consumes signatures, verification, publication, and inscription
//! through these narrow capabilities. Implementers may be local (in-memory
//! keys) or remote (custodians, KMS, hosted services); the engine neither
//! reads nor writes key material itself.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::asset::Original;
use crate::log::EventLog;
use crate::proof::Proof;

/// Produces authorship proofs over event payloads.
///
/// `sign` is async and fallible because the implementer may hold keys behind
/// a remote custodian.
pub trait Signer: Send + Sync {
    /// Sign an event payload, returning a complete proof.
    fn sign(&self, data: &Value) -> impl Future<Output = anyhow::Result<Proof>> + Send;

    /// The verification-method URL the proof will carry, `<DID>#<key-id>`.
    fn verification_method(&self) -> impl Future<Output = anyhow::Result<String>> + Send;
}

/// Validates proofs against event payloads.
///
/// Verification is total: a malformed proof or unresolvable key returns
/// `false`, never an error.
pub trait Verifier: Send + Sync {
    /// Whether the proof is a valid signature over the payload.
    fn verify(&self, proof: &Proof, data: &Value) -> impl Future<Output = bool> + Send;
}

/// Receipt returned by a webvh publication callback.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishReceipt {
    /// The `did:webvh:…` identifier assigned by the host.
    pub did: String,
}

/// Receipt returned by an ordinals inscription callback.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InscriptionReceipt {
    /// The `did:btco:…` identifier derived from the reveal transaction.
    pub did: String,

    /// The reveal transaction id.
    pub txid: String,
}

/// Publishes an Original's provenance to a webvh host during migration.
///
/// Implemented by [`WebVhPublisher`](crate::webvh::WebVhPublisher); callers
/// may substitute their own host integration.
pub trait Publisher: Send + Sync {
    /// Publish the asset's current identity and log, returning the new DID.
    fn publish(
        &self, did: &str, log: &EventLog,
    ) -> impl Future<Output = anyhow::Result<PublishReceipt>> + Send;
}

/// Inscribes an Original onto Bitcoin during migration.
///
/// Implemented by [`OrdinalsAdapter`](crate::btco::OrdinalsAdapter); callers
/// may substitute their own provider integration.
pub trait Inscriber: Send + Sync {
    /// Inscribe the serialized asset, returning the new DID and reveal txid.
    fn inscribe(
        &self, original: &Original,
    ) -> impl Future<Output = anyhow::Result<InscriptionReceipt>> + Send;
}

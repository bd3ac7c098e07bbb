//! Contract of the external webvh host, and the signer-shape adapter it
//! expects.
//!
//! The host signs log entries through a narrow shape of its own: it hands
//! back a `{document, proof}` pair and expects a bare `proofValue` plus a
//! verification-method id. [`HostSigner`] adapts the engine's [`Signer`] to
//! that shape.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::document::{DidDocument, Service, VerificationMethodEntry};
use super::log::HostLogEntry;
use crate::provider::Signer;

/// What the host signs: the document under change and the proof
/// configuration, both as the host constructed them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HostSigningInput {
    /// The document state being signed.
    pub document: Value,

    /// The proof configuration, without its value.
    pub proof: Value,
}

/// The host-shaped signing result: just the signature value.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSignature {
    /// Multibase signature over the input.
    pub proof_value: String,
}

/// The signer shape the host consumes.
pub trait HostSigning: Send + Sync {
    /// Sign a `{document, proof}` pair.
    fn sign_entry(
        &self, input: &HostSigningInput,
    ) -> impl Future<Output = anyhow::Result<HostSignature>> + Send;

    /// The verification-method id proofs will reference.
    fn verification_method_id(&self) -> impl Future<Output = anyhow::Result<String>> + Send;
}

/// Adapts an engine [`Signer`] to the host's signer shape: the document and
/// proof configuration are signed as one payload and the proof's `value` is
/// handed back as the host's `proofValue`.
pub struct HostSigner<'a, S> {
    signer: &'a S,
}

impl<'a, S: Signer> HostSigner<'a, S> {
    /// Wrap an engine signer.
    #[must_use]
    pub const fn new(signer: &'a S) -> Self {
        Self { signer }
    }
}

impl<S: Signer> HostSigning for HostSigner<'_, S> {
    async fn sign_entry(&self, input: &HostSigningInput) -> anyhow::Result<HostSignature> {
        let payload = json!({
            "document": input.document,
            "proof": input.proof,
        });
        let proof = self.signer.sign(&payload).await?;
        Ok(HostSignature {
            proof_value: proof.value,
        })
    }

    async fn verification_method_id(&self) -> anyhow::Result<String> {
        self.signer.verification_method().await
    }
}

/// Request to create a hosted DID.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDidRequest {
    /// Host domain the DID will live under.
    pub domain: String,

    /// Optional path below the domain, e.g. a user slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Multikeys authorized to sign log entries.
    pub update_keys: Vec<String>,

    /// Verification methods for the initial document.
    pub verification_methods: Vec<VerificationMethodEntry>,

    /// JSON-LD contexts for the initial document.
    pub context: Vec<String>,
}

/// Request to update a hosted DID.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDidRequest {
    /// The full current log.
    pub log: Vec<HostLogEntry>,

    /// Replacement update keys, if rotating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_keys: Option<Vec<String>>,

    /// Replacement services, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Service>>,
}

/// State returned by every mutating host operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HostDidState {
    /// The hosted DID.
    pub did: String,

    /// The resolved document.
    pub doc: DidDocument,

    /// The full hosted log.
    pub log: Vec<HostLogEntry>,

    /// Host metadata.
    pub meta: HostDidMeta,
}

/// Host metadata for a DID.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostDidMeta {
    /// The self-certifying identifier.
    pub scid: String,

    /// Current version id.
    pub version_id: String,

    /// When the DID was created.
    pub created: DateTime<Utc>,

    /// When the DID was last updated.
    pub updated: DateTime<Utc>,

    /// Whether the DID is deactivated.
    pub deactivated: bool,

    /// Currently authorized update keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_keys: Option<Vec<String>>,
}

/// Resolution result: a document with metadata, or an error description.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Resolution {
    /// The resolved document, when resolution succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<DidDocument>,

    /// Host metadata, when resolution succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<HostDidMeta>,

    /// Why resolution failed, otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The external webvh host.
pub trait WebVhHost: Send + Sync {
    /// Create a hosted DID from the initial document material.
    fn create_did<S: HostSigning>(
        &self, request: &CreateDidRequest, signer: &S,
    ) -> impl Future<Output = anyhow::Result<HostDidState>> + Send;

    /// Append an update to the hosted log.
    fn update_did<S: HostSigning>(
        &self, request: &UpdateDidRequest, signer: &S,
    ) -> impl Future<Output = anyhow::Result<HostDidState>> + Send;

    /// Deactivate the hosted DID.
    fn deactivate_did<S: HostSigning>(
        &self, log: &[HostLogEntry], signer: &S,
    ) -> impl Future<Output = anyhow::Result<HostDidState>> + Send;

    /// Resolve a hosted DID.
    fn resolve_did(&self, did: &str) -> impl Future<Output = anyhow::Result<Resolution>> + Send;
}

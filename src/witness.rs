//! # Witnessing
//!
//! Third-party attestation of log entries. A witness signs an
//! already-constructed entry's event payload and stamps the attestation with
//! the time it observed the entry; the resulting proof is appended to the
//! entry's proof vector after the author's.
//!
//! Collection fans out to all services in parallel under a shared per-call
//! deadline and never throws on an individual witness failure: the outcome
//! carries the successes alongside error records tagged by witness id.
//!
//! The [`WitnessService`] trait is also the extension point for prospective
//! witness kinds such as Bitcoin timestamp calendars.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::keyring::KeyPairSigner;
use crate::log::LogEntry;
use crate::proof::Proof;
use crate::provider::Signer as _;

/// Default fan-out deadline per witness.
pub const DEFAULT_WITNESS_TIMEOUT: Duration = Duration::from_secs(30);

/// An independent party that attests to log entries.
pub trait WitnessService: Send + Sync {
    /// Stable identifier used to tag this witness's failures.
    fn id(&self) -> &str;

    /// Produce a witness attestation over the entry. The returned proof must
    /// carry `witnessedAt`.
    fn witness(&self, entry: &LogEntry) -> impl Future<Output = anyhow::Result<Proof>> + Send;
}

/// Options for a collection round.
#[derive(Clone, Debug)]
pub struct WitnessOptions {
    /// Minimum number of attestations for `threshold_met`.
    pub threshold: usize,

    /// Deadline applied to each witness call.
    pub timeout: Duration,
}

impl Default for WitnessOptions {
    fn default() -> Self {
        Self {
            threshold: 1,
            timeout: DEFAULT_WITNESS_TIMEOUT,
        }
    }
}

/// A witness that failed to attest, and why.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WitnessFailure {
    /// The failing witness's id.
    pub witness_id: String,

    /// Failure description.
    pub message: String,
}

/// Result of a collection round.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WitnessOutcome {
    /// The input entry with the collected attestations appended.
    pub event: LogEntry,

    /// Attestations gathered this round, in service order.
    pub proofs: Vec<Proof>,

    /// Whether `proofs` reached the requested threshold.
    pub threshold_met: bool,

    /// Per-witness failures. Empty on a clean round.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<WitnessFailure>,
}

/// Fan out an entry to a set of witness services and collect attestations.
///
/// Each call runs under `options.timeout`; a timeout, service error, or a
/// proof missing `witnessedAt` becomes a [`WitnessFailure`] rather than an
/// error of the round.
pub async fn collect_attestations<W: WitnessService>(
    entry: &LogEntry, services: &[W], options: &WitnessOptions,
) -> WitnessOutcome {
    let results = join_all(services.iter().map(|service| async move {
        let outcome = tokio::time::timeout(options.timeout, service.witness(entry)).await;
        match outcome {
            Err(_) => Err(WitnessFailure {
                witness_id: service.id().to_string(),
                message: format!("attestation timed out after {:?}", options.timeout),
            }),
            Ok(Err(e)) => Err(WitnessFailure {
                witness_id: service.id().to_string(),
                message: e.to_string(),
            }),
            Ok(Ok(proof)) if !proof.is_witness() => Err(WitnessFailure {
                witness_id: service.id().to_string(),
                message: "attestation is missing witnessedAt".to_string(),
            }),
            Ok(Ok(proof)) => Ok(proof),
        }
    }))
    .await;

    let mut proofs = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(proof) => proofs.push(proof),
            Err(failure) => {
                tracing::warn!(witness = %failure.witness_id, "witness failed: {}", failure.message);
                errors.push(failure);
            }
        }
    }

    WitnessOutcome {
        event: entry.with_proofs(proofs.clone()),
        threshold_met: proofs.len() >= options.threshold,
        proofs,
        errors,
    }
}

/// Policy for threshold verification of an entry's witness proofs.
#[derive(Clone, Debug, Default)]
pub struct WitnessPolicy {
    /// Minimum number of trusted attestations.
    pub threshold: usize,

    /// DIDs of trusted witnesses. Empty means every witness is trusted.
    pub trusted_witnesses: Vec<String>,
}

/// Report from threshold verification. Total; never an error.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WitnessReport {
    /// Whether the trusted count met the threshold with no violations.
    pub valid: bool,

    /// All witness proofs on the entry.
    pub witness_count: usize,

    /// Witness proofs whose controller DID is trusted.
    pub trusted_count: usize,

    /// Structural violations found while counting.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Count the entry's witness proofs against a trust policy.
///
/// A proof counts as trusted when the DID portion of its method is in the
/// policy's trusted set, or unconditionally when the set is empty. Every
/// witness proof must carry its `witnessedAt` stamp; the typed timestamp
/// guarantees parseability for entries that deserialized at all.
#[must_use]
pub fn verify_witness_proofs(entry: &LogEntry, policy: &WitnessPolicy) -> WitnessReport {
    let witnesses = witness_proofs(entry);
    let witness_count = witnesses.len();
    let errors = Vec::new();

    let trusted_count = witnesses
        .iter()
        .filter(|proof| {
            policy.trusted_witnesses.is_empty()
                || policy.trusted_witnesses.iter().any(|t| t == proof.controller_did())
        })
        .count();

    WitnessReport {
        valid: trusted_count >= policy.threshold && errors.is_empty(),
        witness_count,
        trusted_count,
        errors,
    }
}

/// Whether a proof is a witness attestation.
#[must_use]
pub const fn is_witness_proof(proof: &Proof) -> bool {
    proof.is_witness()
}

/// The witness proofs on an entry, in proof order.
#[must_use]
pub fn witness_proofs(entry: &LogEntry) -> Vec<&Proof> {
    entry.proof.iter().filter(|p| p.is_witness()).collect()
}

/// Number of witness proofs on an entry.
#[must_use]
pub fn count_witness_proofs(entry: &LogEntry) -> usize {
    entry.proof.iter().filter(|p| p.is_witness()).count()
}

/// A signer-backed in-process witness, used in tests and for
/// self-attestation.
pub struct LocalWitness {
    id: String,
    signer: KeyPairSigner,
}

impl LocalWitness {
    /// Wrap a signer as a witness with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>, signer: KeyPairSigner) -> Self {
        Self {
            id: id.into(),
            signer,
        }
    }

    /// The DID this witness signs under.
    #[must_use]
    pub async fn did(&self) -> String {
        self.signer
            .verification_method()
            .await
            .map(|m| m.split('#').next().unwrap_or_default().to_string())
            .unwrap_or_default()
    }
}

impl WitnessService for LocalWitness {
    fn id(&self) -> &str {
        &self.id
    }

    async fn witness(&self, entry: &LogEntry) -> anyhow::Result<Proof> {
        let data = entry.data_value()?;
        let mut proof = self.signer.sign(&data).await?;
        proof.witnessed_at = Some(Utc::now());
        Ok(proof)
    }
}

/// A witness reached over HTTP. POSTs the entry and its hash, reads the
/// attestation back.
#[derive(Clone, Debug)]
pub struct HttpWitness {
    id: String,
    endpoint: url::Url,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttestationRequest<'a> {
    event: &'a LogEntry,
    event_hash: &'a str,
    requested_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct AttestationResponse {
    proof: Proof,
}

impl HttpWitness {
    /// A witness posting to the given endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] when the endpoint is not a valid
    /// URL.
    pub fn new(id: impl Into<String>, endpoint: &str) -> crate::Result<Self> {
        let endpoint = url::Url::parse(endpoint)
            .map_err(|e| crate::Error::Validation(format!("invalid witness endpoint: {e}")))?;
        Ok(Self {
            id: id.into(),
            endpoint,
            client: reqwest::Client::new(),
        })
    }
}

impl WitnessService for HttpWitness {
    fn id(&self) -> &str {
        &self.id
    }

    async fn witness(&self, entry: &LogEntry) -> anyhow::Result<Proof> {
        let event_hash = entry.hash()?;
        let request = AttestationRequest {
            event: entry,
            event_hash: &event_hash,
            requested_at: Utc::now(),
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let body: AttestationResponse = response.json().await?;
        Ok(body.proof)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::did::Layer;
    use crate::key::KeyType;
    use crate::log::{CreateEvent, EventData};

    fn sample_entry() -> LogEntry {
        LogEntry {
            event: EventData::Create(CreateEvent {
                did: "did:peer:0zExample".to_string(),
                layer: Layer::Peer,
                resources: vec![],
                creator: "did:key:zCreator".to_string(),
                created_at: Utc::now(),
                metadata: Some(json!({"v": 1})),
            }),
            prev: None,
            proof: vec![],
        }
    }

    #[tokio::test]
    async fn local_witness_stamps_attestation() {
        let witness = LocalWitness::new("w1", KeyPairSigner::generate(KeyType::Ed25519));
        let proof = witness.witness(&sample_entry()).await.expect("should attest");
        assert!(proof.is_witness());
    }

    #[tokio::test]
    async fn fan_out_collects_and_reports() {
        let entry = sample_entry();
        let services = vec![
            LocalWitness::new("w1", KeyPairSigner::generate(KeyType::Ed25519)),
            LocalWitness::new("w2", KeyPairSigner::generate(KeyType::Secp256k1)),
        ];
        let outcome =
            collect_attestations(&entry, &services, &WitnessOptions::default()).await;

        assert_eq!(outcome.proofs.len(), 2);
        assert!(outcome.threshold_met);
        assert!(outcome.errors.is_empty());
        assert_eq!(count_witness_proofs(&outcome.event), 2);
        // the input entry is untouched
        assert!(entry.proof.is_empty());
    }

    #[tokio::test]
    async fn threshold_counts_trusted_only() {
        let entry = sample_entry();
        let trusted = LocalWitness::new("w1", KeyPairSigner::generate(KeyType::Ed25519));
        let stranger = LocalWitness::new("w2", KeyPairSigner::generate(KeyType::Ed25519));
        let trusted_did = trusted.did().await;

        let outcome = collect_attestations(
            &entry,
            &[trusted, stranger],
            &WitnessOptions::default(),
        )
        .await;

        let report = verify_witness_proofs(
            &outcome.event,
            &WitnessPolicy {
                threshold: 2,
                trusted_witnesses: vec![trusted_did],
            },
        );
        assert!(!report.valid);
        assert_eq!(report.witness_count, 2);
        assert_eq!(report.trusted_count, 1);
    }

    #[tokio::test]
    async fn empty_trust_set_trusts_all() {
        let entry = sample_entry();
        let services = vec![LocalWitness::new("w1", KeyPairSigner::generate(KeyType::Ed25519))];
        let outcome =
            collect_attestations(&entry, &services, &WitnessOptions::default()).await;

        let report = verify_witness_proofs(
            &outcome.event,
            &WitnessPolicy {
                threshold: 1,
                trusted_witnesses: vec![],
            },
        );
        assert!(report.valid);
        assert_eq!(report.trusted_count, 1);
    }

    #[test]
    fn author_proofs_are_not_witness_proofs() {
        let mut entry = sample_entry();
        entry.proof.push(Proof {
            type_: "DataIntegrityProof".to_string(),
            suite: "eddsa-jcs-2022".to_string(),
            created: Utc::now(),
            method: "did:key:z#z".to_string(),
            purpose: "assertionMethod".to_string(),
            value: "zSig".to_string(),
            witnessed_at: None,
        });
        assert_eq!(count_witness_proofs(&entry), 0);
        assert!(witness_proofs(&entry).is_empty());
        assert!(!is_witness_proof(&entry.proof[0]));
    }
}

//! Tests for witness attestation collection and threshold verification.

use std::time::Duration;

use originals_core::witness::{self, LocalWitness, WitnessService};
use originals_core::{
    collect_attestations, verify_witness_proofs, KeyPairSigner, KeyType, LogEntry,
    MultikeyVerifier, Original, Proof, Resource, UpdateRequest, WitnessOptions, WitnessPolicy,
};
use serde_json::json;

struct BrokenWitness;

impl WitnessService for BrokenWitness {
    fn id(&self) -> &str {
        "broken"
    }

    async fn witness(&self, _entry: &LogEntry) -> anyhow::Result<Proof> {
        anyhow::bail!("attestation service offline")
    }
}

struct SlowWitness;

impl WitnessService for SlowWitness {
    fn id(&self) -> &str {
        "slow"
    }

    async fn witness(&self, _entry: &LogEntry) -> anyhow::Result<Proof> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        anyhow::bail!("unreachable")
    }
}

fn sample_resource() -> Resource {
    Resource::new("main", "image", "zQmYtUc4iTCbbfVSDNKvtQqrfyezPPnFvE33wFmutw9PBBk")
}

async fn genesis_entry(signer: &KeyPairSigner) -> LogEntry {
    Original::create(vec![sample_resource()], signer, None)
        .await
        .expect("should create")
        .log
        .events[0]
        .clone()
}

#[tokio::test]
async fn threshold_not_met_with_single_witness() {
    let signer = KeyPairSigner::generate(KeyType::Ed25519);
    let entry = genesis_entry(&signer).await;

    let services = vec![LocalWitness::new("w1", KeyPairSigner::generate(KeyType::Ed25519))];
    let outcome = collect_attestations(&entry, &services, &WitnessOptions::default()).await;
    assert_eq!(outcome.proofs.len(), 1);

    let report = verify_witness_proofs(&outcome.event, &WitnessPolicy {
        threshold: 2,
        trusted_witnesses: vec![],
    });
    assert!(!report.valid);
    assert_eq!(report.witness_count, 1);
    assert_eq!(report.trusted_count, 1);
}

#[tokio::test]
async fn threshold_met_with_enough_witnesses() {
    let signer = KeyPairSigner::generate(KeyType::Ed25519);
    let entry = genesis_entry(&signer).await;

    let services = vec![
        LocalWitness::new("w1", KeyPairSigner::generate(KeyType::Ed25519)),
        LocalWitness::new("w2", KeyPairSigner::generate(KeyType::P256)),
        LocalWitness::new("w3", KeyPairSigner::generate(KeyType::Secp256k1)),
    ];
    let options = WitnessOptions {
        threshold: 2,
        ..WitnessOptions::default()
    };
    let outcome = collect_attestations(&entry, &services, &options).await;
    assert!(outcome.threshold_met);
    assert!(outcome.errors.is_empty());
    assert_eq!(witness::count_witness_proofs(&outcome.event), 3);

    let report = verify_witness_proofs(&outcome.event, &WitnessPolicy {
        threshold: 2,
        trusted_witnesses: vec![],
    });
    assert!(report.valid);
    assert_eq!(report.trusted_count, 3);
}

#[tokio::test]
async fn untrusted_witnesses_do_not_count() {
    let signer = KeyPairSigner::generate(KeyType::Ed25519);
    let entry = genesis_entry(&signer).await;

    let trusted = LocalWitness::new("w1", KeyPairSigner::generate(KeyType::Ed25519));
    let trusted_did = trusted.did().await;
    let services = vec![
        trusted,
        LocalWitness::new("w2", KeyPairSigner::generate(KeyType::Ed25519)),
    ];
    let outcome = collect_attestations(&entry, &services, &WitnessOptions::default()).await;

    let report = verify_witness_proofs(&outcome.event, &WitnessPolicy {
        threshold: 2,
        trusted_witnesses: vec![trusted_did],
    });
    assert!(!report.valid);
    assert_eq!(report.witness_count, 2);
    assert_eq!(report.trusted_count, 1);
}

#[tokio::test]
async fn broken_witness_is_reported_not_thrown() {
    let signer = KeyPairSigner::generate(KeyType::Ed25519);
    let entry = genesis_entry(&signer).await;

    let outcome =
        collect_attestations(&entry, &[BrokenWitness], &WitnessOptions::default()).await;
    assert!(outcome.proofs.is_empty());
    assert!(!outcome.threshold_met);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].witness_id, "broken");
    assert!(outcome.errors[0].message.contains("offline"));
}

#[tokio::test]
async fn slow_witness_times_out() {
    let signer = KeyPairSigner::generate(KeyType::Ed25519);
    let entry = genesis_entry(&signer).await;

    let options = WitnessOptions {
        threshold: 1,
        timeout: Duration::from_millis(20),
    };
    let outcome = collect_attestations(&entry, &[SlowWitness], &options).await;
    assert!(outcome.proofs.is_empty());
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].message.contains("timed out"));
}

#[tokio::test]
async fn witnessed_entry_verifies_in_chain() {
    let signer = KeyPairSigner::generate(KeyType::Ed25519);
    let mut original = Original::create(vec![sample_resource()], &signer, None)
        .await
        .expect("should create");

    // witness the genesis entry before appending anything: the next entry's
    // prev hash commits to the attestations
    let services = vec![LocalWitness::new("w1", KeyPairSigner::generate(KeyType::Ed25519))];
    let outcome = collect_attestations(
        &original.log.events[0],
        &services,
        &WitnessOptions::default(),
    )
    .await;
    original.log.events[0] = outcome.event;

    let updated = original
        .update(UpdateRequest::with_metadata(json!({"v": 2})), &signer)
        .await
        .expect("should update");

    let report = updated.verify(Some(&MultikeyVerifier)).await;
    assert!(report.valid, "unexpected errors: {:?}", report.errors);
    assert_eq!(witness::count_witness_proofs(&updated.log.events[0]), 1);
}

#[tokio::test]
async fn witnessing_after_append_breaks_the_chain() {
    let signer = KeyPairSigner::generate(KeyType::Ed25519);
    let original = Original::create(vec![sample_resource()], &signer, None)
        .await
        .expect("should create");
    let mut updated = original
        .update(UpdateRequest::with_metadata(json!({"v": 2})), &signer)
        .await
        .expect("should update");

    // attesting a committed entry invalidates the successor's prev hash
    let services = vec![LocalWitness::new("w1", KeyPairSigner::generate(KeyType::Ed25519))];
    let outcome = collect_attestations(
        &updated.log.events[0],
        &services,
        &WitnessOptions::default(),
    )
    .await;
    updated.log.events[0] = outcome.event;

    let report = updated.verify(Some(&MultikeyVerifier)).await;
    assert!(!report.valid);
    assert!(report.errors.iter().any(|e| e.contains("hash chain")));
}

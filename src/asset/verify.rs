//! Verify operation: walk the chain and report every violation.
//!
//! Verification is total. It never fails early: chain breaks, missing
//! proofs, and invalid signatures are all collected so a caller can diagnose
//! a damaged asset in a single pass. Timestamps are not compared for
//! monotonicity; chain order is purely positional.

use serde::{Deserialize, Serialize};

use super::Original;
use crate::provider::Verifier;

/// Outcome of verifying an Original's provenance chain.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationReport {
    /// `true` iff no violation was found.
    pub valid: bool,

    /// One message per independent violation.
    pub errors: Vec<String>,
}

impl Original {
    /// Verify the hash chain and, when a verifier is supplied, every proof
    /// on every entry. Proofs are checked against the entry's event payload.
    pub async fn verify<V: Verifier>(&self, verifier: Option<&V>) -> VerificationReport {
        let mut errors = Vec::new();

        if self.log.events.is_empty() {
            errors.push("event log is empty".to_string());
        }

        let mut previous_hash: Option<String> = None;
        for (index, entry) in self.log.events.iter().enumerate() {
            if index == 0 {
                if entry.prev.is_some() {
                    errors.push("hash chain broken: first entry must not have prev".to_string());
                }
            } else {
                match (&entry.prev, &previous_hash) {
                    (Some(prev), Some(expected)) if prev == expected => {}
                    _ => errors.push(format!("hash chain broken at entry {index}")),
                }
            }

            if entry.proof.is_empty() {
                errors.push(format!("entry {index} has no proof"));
            }

            if let Some(verifier) = verifier {
                match entry.data_value() {
                    Ok(data) => {
                        for (position, proof) in entry.proof.iter().enumerate() {
                            if !verifier.verify(proof, &data).await {
                                errors.push(format!(
                                    "invalid proof {position} on entry {index}"
                                ));
                            }
                        }
                    }
                    Err(e) => errors.push(format!("entry {index} payload is unserializable: {e}")),
                }
            }

            match entry.hash() {
                Ok(hash) => previous_hash = Some(hash),
                Err(e) => {
                    errors.push(format!("entry {index} cannot be hashed: {e}"));
                    previous_hash = None;
                }
            }
        }

        if !errors.is_empty() {
            tracing::warn!(did = %self.did, violations = errors.len(), "verification failed");
        }

        VerificationReport {
            valid: errors.is_empty(),
            errors,
        }
    }
}

//! # Data-Integrity Proofs
//!
//! Construction and verification of the embedded proofs carried by every log
//! entry, following the W3C Data Integrity shape with the `eddsa-jcs-2022`
//! and `ecdsa-jcs-2019` cryptosuites.
//!
//! See [W3C Data Integrity 1.0](https://www.w3.org/community/reports/credentials/CG-FINAL-data-integrity-20220722).

use chrono::{DateTime, Utc};
use multibase::Base;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::key::{self, KeyPair};
use crate::{canonical, Result};

/// The proof type carried by every proof in this protocol.
pub const PROOF_TYPE: &str = "DataIntegrityProof";

/// Proof purpose for authorship and witness attestations alike.
pub const PURPOSE_ASSERTION: &str = "assertionMethod";

/// Cryptosuite identifier for Ed25519 proofs.
pub const SUITE_EDDSA: &str = "eddsa-jcs-2022";

/// Cryptosuite identifier for secp256k1 and P-256 proofs.
pub const SUITE_ECDSA: &str = "ecdsa-jcs-2019";

/// An embedded Data-Integrity proof over a log entry's event payload.
///
/// A witness attestation is the same structure with `witnessed_at` set; the
/// timestamp marks when the witness observed the entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// The proof type. Always `DataIntegrityProof`.
    #[serde(rename = "type")]
    pub type_: String,

    /// The cryptosuite: `eddsa-jcs-2022` or `ecdsa-jcs-2019`.
    pub suite: String,

    /// UTC timestamp at signing time.
    pub created: DateTime<Utc>,

    /// Verification-method URL, `<DID>#<key-id>`.
    pub method: String,

    /// The reason for the proof. `assertionMethod` for both authorship and
    /// witness proofs.
    pub purpose: String,

    /// Multibase-encoded raw signature bytes.
    pub value: String,

    /// Set on witness attestations only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witnessed_at: Option<DateTime<Utc>>,
}

impl Proof {
    /// The DID portion of the verification method, before the `#` fragment.
    #[must_use]
    pub fn controller_did(&self) -> &str {
        self.method.split('#').next().unwrap_or(&self.method)
    }

    /// The fragment of the verification method, after the `#`.
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.method.split_once('#').map(|(_, fragment)| fragment)
    }

    /// Whether this proof is a witness attestation.
    #[must_use]
    pub const fn is_witness(&self) -> bool {
        self.witnessed_at.is_some()
    }
}

/// Sign an event payload with the given key pair, producing an authorship
/// proof. The signature covers the canonical bytes of `data`; for the ECDSA
/// curves the curve layer additionally hashes with SHA-256.
///
/// # Errors
///
/// Returns [`Error::Encoding`](crate::Error::Encoding) if the payload cannot
/// be canonicalized.
pub fn create_proof(keypair: &KeyPair, method: &str, data: &Value) -> Result<Proof> {
    let payload = canonical::canonicalize(data)?;
    let signature = keypair.sign(&payload);
    Ok(Proof {
        type_: PROOF_TYPE.to_string(),
        suite: keypair.key_type().suite().to_string(),
        created: Utc::now(),
        method: method.to_string(),
        purpose: PURPOSE_ASSERTION.to_string(),
        value: multibase::encode(Base::Base58Btc, signature),
        witnessed_at: None,
    })
}

/// Verify a proof against an event payload and a multibase public key.
///
/// Total: an unknown proof type, a suite that does not match the key, or any
/// decoding failure returns `false` rather than an error.
#[must_use]
pub fn verify_proof(proof: &Proof, data: &Value, public_multikey: &str) -> bool {
    if proof.type_ != PROOF_TYPE {
        return false;
    }
    let Ok((key_type, key_bytes)) = key::decode_public_multikey(public_multikey) else {
        return false;
    };
    if proof.suite != key_type.suite() {
        return false;
    }
    let Ok((_, signature)) = multibase::decode(&proof.value) else {
        return false;
    };
    let Ok(payload) = canonical::canonicalize(data) else {
        return false;
    };
    key::verify_signature(key_type, &key_bytes, &payload, &signature)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::key::KeyType;

    #[test]
    fn sign_verify_each_suite() {
        let data = json!({"did": "did:peer:0zExample", "layer": "peer"});
        for key_type in [KeyType::Ed25519, KeyType::Secp256k1, KeyType::P256] {
            let pair = KeyPair::generate(key_type);
            let method = format!("did:key:{0}#{0}", pair.public_key_multibase());
            let proof = create_proof(&pair, &method, &data).expect("should sign");

            assert_eq!(proof.type_, PROOF_TYPE);
            assert_eq!(proof.suite, key_type.suite());
            assert_eq!(proof.purpose, PURPOSE_ASSERTION);
            assert!(verify_proof(&proof, &data, &pair.public_key_multibase()));
            assert!(!verify_proof(&proof, &json!({"layer": "webvh"}), &pair.public_key_multibase()));
        }
    }

    #[test]
    fn wrong_key_fails_closed() {
        let data = json!({"v": 1});
        let signer = KeyPair::generate(KeyType::Ed25519);
        let other = KeyPair::generate(KeyType::Ed25519);
        let proof =
            create_proof(&signer, "did:key:z#z", &data).expect("should sign");
        assert!(!verify_proof(&proof, &data, &other.public_key_multibase()));
        assert!(!verify_proof(&proof, &data, "not-a-multikey"));
    }

    #[test]
    fn suite_mismatch_fails_closed() {
        let data = json!({"v": 1});
        let pair = KeyPair::generate(KeyType::Secp256k1);
        let mut proof = create_proof(&pair, "did:key:z#z", &data).expect("should sign");
        proof.suite = SUITE_EDDSA.to_string();
        assert!(!verify_proof(&proof, &data, &pair.public_key_multibase()));
    }

    #[test]
    fn method_accessors() {
        let pair = KeyPair::generate(KeyType::Ed25519);
        let proof = create_proof(&pair, "did:example:abc#key-1", &json!({}))
            .expect("should sign");
        assert_eq!(proof.controller_did(), "did:example:abc");
        assert_eq!(proof.key_id(), Some("key-1"));
        assert!(!proof.is_witness());
    }
}

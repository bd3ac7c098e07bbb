//! # In-Memory Keyring
//!
//! [`Signer`] and [`Verifier`] implementations backed by keys that are
//! generated and used in memory and disappear when dropped. Suitable for
//! tests, demos, and self-attesting witnesses; production deployments are
//! expected to put a custodian or KMS behind the same traits.

use serde_json::Value;

use crate::key::{KeyPair, KeyType};
use crate::proof::{self, Proof};
use crate::provider::{Signer, Verifier};

/// A signer over a locally held key pair.
///
/// The default verification method is the did:key self-reference
/// `did:key:<pub>#<pub>`, which [`MultikeyVerifier`] can dereference without
/// any lookup. Attach a controller DID to anchor proofs to another identity.
pub struct KeyPairSigner {
    keypair: KeyPair,
    method: String,
}

impl KeyPairSigner {
    /// Generate a fresh signer for the given curve.
    #[must_use]
    pub fn generate(key_type: KeyType) -> Self {
        Self::from_keypair(KeyPair::generate(key_type))
    }

    /// Wrap an existing key pair.
    #[must_use]
    pub fn from_keypair(keypair: KeyPair) -> Self {
        let key = keypair.public_key_multibase();
        Self {
            method: format!("did:key:{key}#{key}"),
            keypair,
        }
    }

    /// Re-anchor the verification method to `<controller>#<pub-multikey>`.
    #[must_use]
    pub fn with_controller(mut self, controller: &str) -> Self {
        let key = self.keypair.public_key_multibase();
        self.method = format!("{controller}#{key}");
        self
    }

    /// The public half as a multibase multikey.
    #[must_use]
    pub fn public_key_multibase(&self) -> String {
        self.keypair.public_key_multibase()
    }

    /// The underlying key pair.
    #[must_use]
    pub const fn keypair(&self) -> &KeyPair {
        &self.keypair
    }
}

impl Signer for KeyPairSigner {
    async fn sign(&self, data: &Value) -> anyhow::Result<Proof> {
        Ok(proof::create_proof(&self.keypair, &self.method, data)?)
    }

    async fn verification_method(&self) -> anyhow::Result<String> {
        Ok(self.method.clone())
    }
}

/// A verifier that resolves the public key from the proof's own verification
/// method: the fragment after `#` must be the signer's multikey, as produced
/// by [`KeyPairSigner`]. Local, no network.
#[derive(Clone, Copy, Debug, Default)]
pub struct MultikeyVerifier;

impl Verifier for MultikeyVerifier {
    async fn verify(&self, proof: &Proof, data: &Value) -> bool {
        let Some(multikey) = proof.key_id() else {
            return false;
        };
        proof::verify_proof(proof, data, multikey)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn signer_verifier_round_trip() {
        let data = json!({"updatedAt": "2026-01-01T00:00:00Z"});
        for key_type in [KeyType::Ed25519, KeyType::Secp256k1, KeyType::P256] {
            let signer = KeyPairSigner::generate(key_type);
            let proof = signer.sign(&data).await.expect("should sign");
            assert!(MultikeyVerifier.verify(&proof, &data).await);
            assert!(!MultikeyVerifier.verify(&proof, &json!({"other": true})).await);
        }
    }

    #[tokio::test]
    async fn controller_anchors_method() {
        let signer = KeyPairSigner::generate(KeyType::Ed25519).with_controller("did:webvh:w.io:a");
        let method = signer.verification_method().await.expect("should have method");
        assert!(method.starts_with("did:webvh:w.io:a#z"));

        // key material still resolves from the fragment
        let data = json!({"n": 1});
        let proof = signer.sign(&data).await.expect("should sign");
        assert!(MultikeyVerifier.verify(&proof, &data).await);
    }

    #[tokio::test]
    async fn verifier_fails_closed_without_fragment() {
        let signer = KeyPairSigner::generate(KeyType::Ed25519);
        let data = json!({"n": 1});
        let mut proof = signer.sign(&data).await.expect("should sign");
        proof.method = "did:key:no-fragment".to_string();
        assert!(!MultikeyVerifier.verify(&proof, &data).await);
    }
}

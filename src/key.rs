//! # Key Material
//!
//! Key generation, multikey encoding, and raw signing/verification for the
//! three supported curves: Ed25519, secp256k1, and P-256.
//!
//! Public and private keys are exchanged as multibase strings carrying an
//! unsigned-varint multicodec prefix followed by the raw key bytes (compressed
//! SEC1 form for the ECDSA curves). Signatures are multibase-encoded raw bytes
//! without a multicodec prefix; the ECDSA curves use the compact 64-byte
//! `r || s` form.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use ed25519_dalek::{Signer as _, Verifier as _};
use k256::ecdsa::signature::{Signer as _, Verifier as _};
use multibase::Base;
use rand_core::OsRng;

use crate::{Error, Result};

// Multicodec codes, varint-encoded into the multikey prefix.
const ED25519_PUB: u64 = 0xed;
const ED25519_PRIV: u64 = 0x1300;
const SECP256K1_PUB: u64 = 0xe7;
const SECP256K1_PRIV: u64 = 0x1301;
const P256_PUB: u64 = 0x1200;
const P256_PRIV: u64 = 0x1306;

/// Key types supported for signing and verification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Ed25519 (pure EdDSA).
    #[default]
    Ed25519,

    /// secp256k1 (ECDSA over SHA-256).
    Secp256k1,

    /// NIST P-256 (ECDSA over SHA-256).
    P256,
}

impl KeyType {
    /// The Data-Integrity cryptosuite identifier for this key type.
    #[must_use]
    pub const fn suite(self) -> &'static str {
        match self {
            Self::Ed25519 => "eddsa-jcs-2022",
            Self::Secp256k1 | Self::P256 => "ecdsa-jcs-2019",
        }
    }

    const fn public_code(self) -> u64 {
        match self {
            Self::Ed25519 => ED25519_PUB,
            Self::Secp256k1 => SECP256K1_PUB,
            Self::P256 => P256_PUB,
        }
    }

    const fn private_code(self) -> u64 {
        match self {
            Self::Ed25519 => ED25519_PRIV,
            Self::Secp256k1 => SECP256K1_PRIV,
            Self::P256 => P256_PRIV,
        }
    }

    const fn from_public_code(code: u64) -> Option<Self> {
        match code {
            ED25519_PUB => Some(Self::Ed25519),
            SECP256K1_PUB => Some(Self::Secp256k1),
            P256_PUB => Some(Self::P256),
            _ => None,
        }
    }

    const fn from_private_code(code: u64) -> Option<Self> {
        match code {
            ED25519_PRIV => Some(Self::Ed25519),
            SECP256K1_PRIV => Some(Self::Secp256k1),
            P256_PRIV => Some(Self::P256),
            _ => None,
        }
    }
}

impl Display for KeyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "Ed25519"),
            Self::Secp256k1 => write!(f, "secp256k1"),
            Self::P256 => write!(f, "P-256"),
        }
    }
}

impl FromStr for KeyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Ed25519" => Ok(Self::Ed25519),
            "secp256k1" => Ok(Self::Secp256k1),
            "P-256" => Ok(Self::P256),
            _ => Err(Error::Validation(format!("unsupported key type: {s}"))),
        }
    }
}

enum SecretMaterial {
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
    P256(p256::ecdsa::SigningKey),
}

/// An asymmetric key pair held in memory.
///
/// The engine itself never stores key pairs; they live behind the caller's
/// [`Signer`](crate::provider::Signer) capability. This type backs the
/// in-memory keyring and tests.
pub struct KeyPair {
    key_type: KeyType,
    secret: SecretMaterial,
}

impl KeyPair {
    /// Generate a fresh key pair for the given curve.
    #[must_use]
    pub fn generate(key_type: KeyType) -> Self {
        let secret = match key_type {
            KeyType::Ed25519 => {
                SecretMaterial::Ed25519(ed25519_dalek::SigningKey::generate(&mut OsRng))
            }
            KeyType::Secp256k1 => {
                SecretMaterial::Secp256k1(k256::ecdsa::SigningKey::random(&mut OsRng))
            }
            KeyType::P256 => SecretMaterial::P256(p256::ecdsa::SigningKey::random(&mut OsRng)),
        };
        Self { key_type, secret }
    }

    /// Reconstruct a key pair from a multibase-encoded private key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the string is not valid multibase or the
    /// multicodec prefix does not name a supported private-key type, and
    /// [`Error::Validation`] if the key bytes are malformed for the curve.
    pub fn from_private_multibase(encoded: &str) -> Result<Self> {
        let (key_type, bytes) = decode_private_multikey(encoded)?;
        let secret = match key_type {
            KeyType::Ed25519 => {
                let seed: [u8; 32] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| Error::Validation("Ed25519 private key must be 32 bytes".to_string()))?;
                SecretMaterial::Ed25519(ed25519_dalek::SigningKey::from_bytes(&seed))
            }
            KeyType::Secp256k1 => SecretMaterial::Secp256k1(
                k256::ecdsa::SigningKey::from_slice(&bytes)
                    .map_err(|e| Error::Validation(format!("invalid secp256k1 private key: {e}")))?,
            ),
            KeyType::P256 => SecretMaterial::P256(
                p256::ecdsa::SigningKey::from_slice(&bytes)
                    .map_err(|e| Error::Validation(format!("invalid P-256 private key: {e}")))?,
            ),
        };
        Ok(Self { key_type, secret })
    }

    /// The curve this pair was generated for.
    #[must_use]
    pub const fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Raw public-key bytes: 32 bytes for Ed25519, 33-byte compressed SEC1
    /// form for the ECDSA curves.
    #[must_use]
    pub fn public_key_bytes(&self) -> Vec<u8> {
        match &self.secret {
            SecretMaterial::Ed25519(key) => key.verifying_key().to_bytes().to_vec(),
            SecretMaterial::Secp256k1(key) => {
                key.verifying_key().to_encoded_point(true).as_bytes().to_vec()
            }
            SecretMaterial::P256(key) => {
                key.verifying_key().to_encoded_point(true).as_bytes().to_vec()
            }
        }
    }

    /// The public key as a multibase multikey string.
    #[must_use]
    pub fn public_key_multibase(&self) -> String {
        encode_multikey(self.key_type.public_code(), &self.public_key_bytes())
    }

    /// The private key as a multibase multikey string.
    #[must_use]
    pub fn private_key_multibase(&self) -> String {
        let bytes = match &self.secret {
            SecretMaterial::Ed25519(key) => key.to_bytes().to_vec(),
            SecretMaterial::Secp256k1(key) => key.to_bytes().as_slice().to_vec(),
            SecretMaterial::P256(key) => key.to_bytes().as_slice().to_vec(),
        };
        encode_multikey(self.key_type.private_code(), &bytes)
    }

    /// Sign a message: pure Ed25519 over the message, or ECDSA over the
    /// SHA-256 of the message for the ECDSA curves. Returns the raw signature
    /// bytes (64-byte `r || s` for ECDSA).
    #[must_use]
    pub fn sign(&self, msg: &[u8]) -> Vec<u8> {
        match &self.secret {
            SecretMaterial::Ed25519(key) => {
                let signature: ed25519_dalek::Signature = key.sign(msg);
                signature.to_bytes().to_vec()
            }
            SecretMaterial::Secp256k1(key) => {
                let signature: k256::ecdsa::Signature = key.sign(msg);
                signature.to_bytes().as_slice().to_vec()
            }
            SecretMaterial::P256(key) => {
                let signature: p256::ecdsa::Signature = key.sign(msg);
                signature.to_bytes().as_slice().to_vec()
            }
        }
    }
}

/// Verify a raw signature against a message and public-key bytes. Total:
/// malformed keys or signatures return `false`.
#[must_use]
pub fn verify_signature(key_type: KeyType, public_key: &[u8], msg: &[u8], signature: &[u8]) -> bool {
    match key_type {
        KeyType::Ed25519 => {
            let Ok(bytes) = <[u8; 32]>::try_from(public_key) else {
                return false;
            };
            let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(&bytes) else {
                return false;
            };
            let Ok(sig) = ed25519_dalek::Signature::from_slice(signature) else {
                return false;
            };
            key.verify(msg, &sig).is_ok()
        }
        KeyType::Secp256k1 => {
            let Ok(key) = k256::ecdsa::VerifyingKey::from_sec1_bytes(public_key) else {
                return false;
            };
            let Ok(sig) = k256::ecdsa::Signature::from_slice(signature) else {
                return false;
            };
            key.verify(msg, &sig).is_ok()
        }
        KeyType::P256 => {
            let Ok(key) = p256::ecdsa::VerifyingKey::from_sec1_bytes(public_key) else {
                return false;
            };
            let Ok(sig) = p256::ecdsa::Signature::from_slice(signature) else {
                return false;
            };
            key.verify(msg, &sig).is_ok()
        }
    }
}

/// Decode a multibase multikey into its key type and raw public-key bytes.
///
/// # Errors
///
/// Returns [`Error::Encoding`] for invalid multibase or an unrecognized
/// public-key multicodec prefix.
pub fn decode_public_multikey(encoded: &str) -> Result<(KeyType, Vec<u8>)> {
    let (code, bytes) = decode_multikey(encoded)?;
    let key_type = KeyType::from_public_code(code)
        .ok_or_else(|| Error::Encoding(format!("unknown public-key multicodec: 0x{code:x}")))?;
    Ok((key_type, bytes))
}

/// Decode a multibase multikey into its key type and raw private-key bytes.
///
/// # Errors
///
/// Returns [`Error::Encoding`] for invalid multibase or an unrecognized
/// private-key multicodec prefix.
pub fn decode_private_multikey(encoded: &str) -> Result<(KeyType, Vec<u8>)> {
    let (code, bytes) = decode_multikey(encoded)?;
    let key_type = KeyType::from_private_code(code)
        .ok_or_else(|| Error::Encoding(format!("unknown private-key multicodec: 0x{code:x}")))?;
    Ok((key_type, bytes))
}

fn encode_multikey(code: u64, key: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(key.len() + 2);
    encode_uvarint(code, &mut bytes);
    bytes.extend_from_slice(key);
    multibase::encode(Base::Base58Btc, bytes)
}

fn decode_multikey(encoded: &str) -> Result<(u64, Vec<u8>)> {
    let (base, bytes) = multibase::decode(encoded)
        .map_err(|e| Error::Encoding(format!("invalid multibase: {e}")))?;
    if base != Base::Base58Btc {
        return Err(Error::Encoding(format!("unsupported multibase encoding: {base:?}")));
    }
    let (code, read) = decode_uvarint(&bytes)?;
    Ok((code, bytes[read..].to_vec()))
}

fn encode_uvarint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

fn decode_uvarint(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value = 0u64;
    let mut shift = 0u32;
    for (i, byte) in bytes.iter().enumerate() {
        if shift > 56 {
            return Err(Error::Encoding("multicodec varint overflow".to_string()));
        }
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }
    Err(Error::Encoding("truncated multicodec varint".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_round_trip() {
        for code in [ED25519_PUB, ED25519_PRIV, SECP256K1_PUB, SECP256K1_PRIV, P256_PUB, P256_PRIV]
        {
            let mut buf = Vec::new();
            encode_uvarint(code, &mut buf);
            let (decoded, read) = decode_uvarint(&buf).expect("should decode");
            assert_eq!(decoded, code);
            assert_eq!(read, buf.len());
        }
    }

    #[test]
    fn varint_prefixes_match_wire_form() {
        // The two-byte wire prefixes are the varint encodings of the codes.
        let mut buf = Vec::new();
        encode_uvarint(ED25519_PUB, &mut buf);
        assert_eq!(buf, vec![0xed, 0x01]);

        buf.clear();
        encode_uvarint(ED25519_PRIV, &mut buf);
        assert_eq!(buf, vec![0x80, 0x26]);

        buf.clear();
        encode_uvarint(P256_PUB, &mut buf);
        assert_eq!(buf, vec![0x80, 0x24]);
    }

    #[test]
    fn multikey_round_trip() {
        for key_type in [KeyType::Ed25519, KeyType::Secp256k1, KeyType::P256] {
            let pair = KeyPair::generate(key_type);

            let public = pair.public_key_multibase();
            assert!(public.starts_with('z'));
            let (decoded_type, bytes) = decode_public_multikey(&public).expect("should decode");
            assert_eq!(decoded_type, key_type);
            assert_eq!(bytes, pair.public_key_bytes());

            let restored = KeyPair::from_private_multibase(&pair.private_key_multibase())
                .expect("should restore");
            assert_eq!(restored.public_key_multibase(), public);
        }
    }

    #[test]
    fn sign_verify_round_trip() {
        let msg = b"provenance is a chain of signatures";
        for key_type in [KeyType::Ed25519, KeyType::Secp256k1, KeyType::P256] {
            let pair = KeyPair::generate(key_type);
            let signature = pair.sign(msg);
            assert_eq!(signature.len(), 64);
            assert!(verify_signature(key_type, &pair.public_key_bytes(), msg, &signature));
            assert!(!verify_signature(key_type, &pair.public_key_bytes(), b"other", &signature));
        }
    }

    #[test]
    fn verify_is_total_on_garbage() {
        assert!(!verify_signature(KeyType::Ed25519, &[0u8; 4], b"msg", &[0u8; 64]));
        assert!(!verify_signature(KeyType::Secp256k1, &[0u8; 33], b"msg", &[1u8; 12]));
    }

    #[test]
    fn cross_curve_key_rejected() {
        let pair = KeyPair::generate(KeyType::Ed25519);
        let public = pair.public_key_multibase();
        // Private decoder must not accept a public-key prefix.
        assert!(decode_private_multikey(&public).is_err());
    }
}

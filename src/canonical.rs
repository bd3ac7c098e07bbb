//! # Canonicalization and Hashing
//!
//! Deterministic serialization and the multihash/multibase wrapping used
//! everywhere a value is hashed onto the wire.
//!
//! Canonical bytes follow the JSON Canonicalization Scheme (JCS, RFC 8785):
//! object keys are sorted by codepoint at every nesting level, so structurally
//! equal values hash identically regardless of construction order.
//!
//! The only hash form used on the wire is SHA-256 wrapped as a multihash
//! (code `0x12`, length `0x20`) and encoded in multibase `base58btc` with the
//! `z` prefix.

use multibase::Base;
use multihash::Multihash;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

const SHA2_256: u64 = 0x12;

/// Serialize a value to canonical (JCS) bytes.
///
/// # Errors
///
/// Returns [`Error::Encoding`] when the value cannot be serialized to JSON,
/// e.g. a non-finite float or a map with non-string keys.
pub fn canonicalize(value: &impl Serialize) -> Result<Vec<u8>> {
    serde_json_canonicalizer::to_vec(value)
        .map_err(|e| Error::Encoding(format!("canonicalization failed: {e}")))
}

/// Hash a value: SHA-256 over the canonical bytes, multihash-wrapped and
/// multibase-encoded.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the value cannot be canonicalized.
pub fn hash(value: &impl Serialize) -> Result<String> {
    let bytes = canonicalize(value)?;
    hash_bytes(&bytes)
}

/// Hash raw bytes into the wire form. Used for resource content hashes, where
/// the hash is over the external bytes rather than a serialized record.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the digest cannot be multihash-wrapped.
pub fn hash_bytes(data: &[u8]) -> Result<String> {
    let digest = Sha256::digest(data);
    let wrapped = Multihash::<64>::wrap(SHA2_256, &digest)
        .map_err(|e| Error::Encoding(format!("multihash wrap failed: {e}")))?;
    Ok(multibase::encode(Base::Base58Btc, wrapped.to_bytes()))
}

/// Re-hash a value and compare against an expected wire hash. Total: any
/// serialization failure compares unequal.
pub fn verify_hash(value: &impl Serialize, expected: &str) -> bool {
    hash(value).is_ok_and(|computed| computed == expected)
}

/// Decode a wire hash back to its SHA-256 digest, validating the multibase
/// prefix and multihash structure.
///
/// # Errors
///
/// Returns [`Error::Encoding`] for an unknown multibase prefix, a multihash
/// with an unexpected code, or a truncated payload.
pub fn decode_multihash(encoded: &str) -> Result<Vec<u8>> {
    let (base, bytes) = multibase::decode(encoded)
        .map_err(|e| Error::Encoding(format!("invalid multibase: {e}")))?;
    if base != Base::Base58Btc {
        return Err(Error::Encoding(format!("unsupported multibase encoding: {base:?}")));
    }
    let wrapped = Multihash::<64>::from_bytes(&bytes)
        .map_err(|e| Error::Encoding(format!("invalid multihash: {e}")))?;
    if wrapped.code() != SHA2_256 {
        return Err(Error::Encoding(format!("unexpected multihash code: 0x{:x}", wrapped.code())));
    }
    Ok(wrapped.digest().to_vec())
}

//! # DID Methods
//!
//! Construction and parsing for the three identifier schemes an Original
//! moves through, and the layer each scheme anchors:
//!
//! - `did:peer`: self-certifying, derived from resource content; resolves
//!   locally with no network.
//! - `did:webvh`: web-hosted with verifiable history. See
//!   <https://identity.foundation/didwebvh/next/>.
//! - `did:btco`: anchored to a Bitcoin ordinal inscription.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::asset::Resource;
use crate::{canonical, Error, Result};

static DID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^did:[a-z0-9]+:.+$").expect("should compile"));

static BTCO_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^did:btco:([a-f0-9]{64})i([0-9]+)$").expect("should compile"));

/// Anchoring layers, ordered by the strength of the provenance guarantee.
///
/// The ordering is total (`peer < webvh < btco`) and migrations advance
/// through it one layer at a time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Offline, self-certifying.
    #[default]
    Peer,

    /// Hosted on the web with a verifiable history.
    Webvh,

    /// Anchored to a Bitcoin inscription.
    Btco,
}

impl Layer {
    /// The layer a valid migration from this one must target, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Peer => Some(Self::Webvh),
            Self::Webvh => Some(Self::Btco),
            Self::Btco => None,
        }
    }

    /// Check that migrating from this layer to `to` advances exactly one
    /// step. Skipping a layer, regressing, and re-targeting the current
    /// layer are all rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Layer`] for any invalid progression.
    pub fn validate_progression(self, to: Self) -> Result<()> {
        if self.next() == Some(to) {
            Ok(())
        } else {
            Err(Error::Layer(format!("Cannot migrate from {self} to {to}")))
        }
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Peer => write!(f, "peer"),
            Self::Webvh => write!(f, "webvh"),
            Self::Btco => write!(f, "btco"),
        }
    }
}

impl FromStr for Layer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "peer" => Ok(Self::Peer),
            "webvh" => Ok(Self::Webvh),
            "btco" => Ok(Self::Btco),
            _ => Err(Error::Validation(format!("unsupported layer: {s}"))),
        }
    }
}

/// Derive the self-certifying `did:peer` identifier from a resource set.
///
/// The identifier is `did:peer:0<hash>` where the hash covers the canonical
/// form of the resources, so the same content always yields the same DID.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the resources cannot be canonicalized.
pub fn create_peer_did(resources: &[Resource]) -> Result<String> {
    let content_hash = canonical::hash(&resources)?;
    Ok(format!("did:peer:0{content_hash}"))
}

/// Parse a `did:peer` identifier, returning its content hash.
///
/// # Errors
///
/// Returns [`Error::Validation`] for a wrong method or transform prefix and
/// [`Error::Encoding`] for a malformed content hash.
pub fn parse_peer_did(did: &str) -> Result<String> {
    let Some(id) = did.strip_prefix("did:peer:") else {
        return Err(Error::Validation(format!("not a did:peer: {did}")));
    };
    let Some(content_hash) = id.strip_prefix('0') else {
        return Err(Error::Validation(format!("unsupported did:peer transform: {did}")));
    };
    canonical::decode_multihash(content_hash)?;
    Ok(content_hash.to_string())
}

/// A parsed `did:webvh` identifier.
///
/// The method-specific id is `<scid>:<domain>[:<path-segment>]*` per the
/// didwebvh method; a single-segment id is a bare domain with no SCID. The
/// SCID position is defined by the method, not guessed from the segment's
/// shape, so numeric hosts such as `127.0.0.1` parse correctly in the
/// domain-only form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebVhDid {
    /// The self-certifying identifier, absent in the domain-only form.
    pub scid: Option<String>,

    /// The decoded host, with any `%3A` port separator restored to `:`.
    pub domain: String,

    /// Path segments following the domain.
    pub path: Vec<String>,
}

impl WebVhDid {
    /// Parse a `did:webvh` identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a wrong method or empty segments.
    pub fn parse(did: &str) -> Result<Self> {
        let Some(id) = did.strip_prefix("did:webvh:") else {
            return Err(Error::Validation(format!("not a did:webvh: {did}")));
        };
        let segments: Vec<&str> = id.split(':').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(Error::Validation(format!("empty segment in did:webvh: {did}")));
        }
        let (scid, domain, path) = match segments.as_slice() {
            [] => return Err(Error::Validation(format!("empty did:webvh id: {did}"))),
            [domain] => (None, (*domain).to_string(), Vec::new()),
            [scid, domain, path @ ..] => (
                Some((*scid).to_string()),
                (*domain).to_string(),
                path.iter().map(|s| (*s).to_string()).collect(),
            ),
        };
        Ok(Self {
            scid,
            domain: domain.replace("%3A", ":"),
            path,
        })
    }

    /// The HTTPS URL for a file hosted under this DID. The domain-only form
    /// resolves under `/.well-known/`.
    #[must_use]
    pub fn http_url(&self, file: &str) -> String {
        if self.path.is_empty() {
            format!("https://{}/.well-known/{file}", self.domain)
        } else {
            format!("https://{}/{}/{file}", self.domain, self.path.join("/"))
        }
    }

    /// URL of the DID document (`did.jsonld`).
    #[must_use]
    pub fn document_url(&self) -> String {
        self.http_url("did.jsonld")
    }

    /// URL of the DID log (`did.jsonl`).
    #[must_use]
    pub fn log_url(&self) -> String {
        self.http_url("did.jsonl")
    }
}

/// A parsed `did:btco` identifier: a reveal txid and output index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BtcoDid {
    /// Reveal transaction id, 64 lowercase hex digits.
    pub txid: String,

    /// Output index.
    pub vout: u64,
}

impl BtcoDid {
    /// Parse a `did:btco` identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the txid or vout grammar does not
    /// match.
    pub fn parse(did: &str) -> Result<Self> {
        let Some(caps) = BTCO_REGEX.captures(did) else {
            return Err(Error::Validation(format!("not a valid did:btco: {did}")));
        };
        let vout = caps[2]
            .parse::<u64>()
            .map_err(|_| Error::Validation(format!("invalid vout in did:btco: {did}")))?;
        Ok(Self {
            txid: caps[1].to_string(),
            vout,
        })
    }

    /// The ordinals inscription id, `<txid>i<vout>`.
    #[must_use]
    pub fn inscription_id(&self) -> String {
        format!("{}i{}", self.txid, self.vout)
    }
}

impl Display for BtcoDid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "did:btco:{}i{}", self.txid, self.vout)
    }
}

/// Infer the anchoring layer from a DID's method.
///
/// # Errors
///
/// Returns [`Error::Validation`] for an unsupported method.
pub fn layer_of(did: &str) -> Result<Layer> {
    if did.starts_with("did:peer:") {
        Ok(Layer::Peer)
    } else if did.starts_with("did:webvh:") {
        Ok(Layer::Webvh)
    } else if did.starts_with("did:btco:") {
        Ok(Layer::Btco)
    } else {
        Err(Error::Validation(format!("unsupported DID method: {did}")))
    }
}

/// Whether the string is syntactically a DID (`did:<method>:<id>`).
#[must_use]
pub fn is_valid_did(did: &str) -> bool {
    DID_REGEX.is_match(did)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resources() -> Vec<Resource> {
        vec![Resource::new(
            "main",
            "image",
            "zQmYtUc4iTCbbfVSDNKvtQqrfyezPPnFvE33wFmutw9PBBk",
        )]
    }

    #[test]
    fn peer_did_is_deterministic() {
        let did = create_peer_did(&sample_resources()).expect("should derive");
        assert!(did.starts_with("did:peer:0z"));
        assert_eq!(did, create_peer_did(&sample_resources()).expect("should derive"));

        let content_hash = parse_peer_did(&did).expect("should parse");
        assert!(content_hash.starts_with('z'));
    }

    #[test]
    fn peer_did_rejects_other_transforms() {
        assert!(parse_peer_did("did:peer:2zabc").is_err());
        assert!(parse_peer_did("did:web:example.com").is_err());
    }

    #[test]
    fn webvh_domain_only() {
        let parsed = WebVhDid::parse("did:webvh:127.0.0.1%3A8080").expect("should parse");
        assert_eq!(parsed.scid, None);
        assert_eq!(parsed.domain, "127.0.0.1:8080");
        assert_eq!(parsed.log_url(), "https://127.0.0.1:8080/.well-known/did.jsonl");
        assert_eq!(parsed.document_url(), "https://127.0.0.1:8080/.well-known/did.jsonld");
    }

    #[test]
    fn webvh_with_scid_and_path() {
        let parsed = WebVhDid::parse(
            "did:webvh:QmaJp6pmb6RUk4oaDyWQcjeqYbvxsc3kvmHWPpz7B5JwDU:example.com:dids:issuer",
        )
        .expect("should parse");
        assert_eq!(
            parsed.scid.as_deref(),
            Some("QmaJp6pmb6RUk4oaDyWQcjeqYbvxsc3kvmHWPpz7B5JwDU")
        );
        assert_eq!(parsed.domain, "example.com");
        assert_eq!(parsed.path, vec!["dids".to_string(), "issuer".to_string()]);
        assert_eq!(parsed.log_url(), "https://example.com/dids/issuer/did.jsonl");
    }

    #[test]
    fn webvh_rejects_empty_segments() {
        assert!(WebVhDid::parse("did:webvh:").is_err());
        assert!(WebVhDid::parse("did:webvh:a::b").is_err());
    }

    #[test]
    fn btco_round_trip() {
        let txid = "a".repeat(64);
        let did = format!("did:btco:{txid}i0");
        let parsed = BtcoDid::parse(&did).expect("should parse");
        assert_eq!(parsed.txid, txid);
        assert_eq!(parsed.vout, 0);
        assert_eq!(parsed.inscription_id(), format!("{txid}i0"));
        assert_eq!(parsed.to_string(), did);
    }

    #[test]
    fn btco_rejects_bad_grammar() {
        assert!(BtcoDid::parse("did:btco:abci0").is_err());
        let upper = format!("did:btco:{}i0", "A".repeat(64));
        assert!(BtcoDid::parse(&upper).is_err());
        let no_vout = format!("did:btco:{}", "a".repeat(64));
        assert!(BtcoDid::parse(&no_vout).is_err());
    }

    #[test]
    fn layer_inference() {
        assert_eq!(layer_of("did:peer:0zabc").expect("should infer"), Layer::Peer);
        assert_eq!(layer_of("did:webvh:example.com:x").expect("should infer"), Layer::Webvh);
        let btco = format!("did:btco:{}i0", "b".repeat(64));
        assert_eq!(layer_of(&btco).expect("should infer"), Layer::Btco);
        assert!(layer_of("did:web:example.com").is_err());
    }

    #[test]
    fn layer_progression() {
        assert!(Layer::Peer.validate_progression(Layer::Webvh).is_ok());
        assert!(Layer::Webvh.validate_progression(Layer::Btco).is_ok());

        let err = Layer::Peer.validate_progression(Layer::Btco).expect_err("should reject");
        assert_eq!(err.to_string(), "Cannot migrate from peer to btco");
        let err = Layer::Btco.validate_progression(Layer::Peer).expect_err("should reject");
        assert_eq!(err.to_string(), "Cannot migrate from btco to peer");
        assert!(Layer::Webvh.validate_progression(Layer::Webvh).is_err());
    }

    #[test]
    fn did_syntax() {
        assert!(is_valid_did("did:peer:0zabc"));
        assert!(is_valid_did("did:example:123"));
        assert!(!is_valid_did("did:peer:"));
        assert!(!is_valid_did("DID:peer:0z"));
        assert!(!is_valid_did("peer:0z"));
    }
}

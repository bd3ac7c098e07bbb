//! # Originals
//!
//! The top-level asset and its lifecycle. An [`Original`] couples a stable
//! logical identity (a DID that is rewritten on migration), a set of
//! content-addressed resources, and the signed event log that records every
//! state transition.
//!
//! All lifecycle operations are value-oriented: each takes the current asset
//! by reference and returns a new one, never mutating its input. Callers that
//! need linearizability across concurrent updates must serialize the calls
//! themselves.

mod create;
mod deactivate;
mod migrate;
mod update;
mod verify;

use serde::{Deserialize, Serialize};

pub use self::update::UpdateRequest;
pub use self::verify::VerificationReport;

use crate::did::Layer;
use crate::log::EventLog;
use crate::{canonical, Error, Result};

/// A content-addressed attachment of an Original.
///
/// The `hash` covers the external content bytes the resource points at, not
/// the resource record itself; a record-level hash can be recomputed on
/// demand with [`canonical::hash`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Stable identifier within the Original.
    pub id: String,

    /// Free-form category, e.g. `image` or `data`.
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Multibase-encoded multihash of the content bytes.
    pub hash: String,

    /// Media type of the content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// Locations the content can be fetched from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Vec<String>>,

    /// Content size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Resource {
    /// A resource from an already-computed content hash.
    #[must_use]
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            hash: hash.into(),
            media_type: None,
            url: None,
            size: None,
        }
    }

    /// A resource whose hash and size are computed from the content bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the digest cannot be wrapped.
    pub fn from_content(
        id: impl Into<String>, resource_type: impl Into<String>, content: &[u8],
    ) -> Result<Self> {
        let mut resource = Self::new(id, resource_type, canonical::hash_bytes(content)?);
        resource.size = Some(content.len() as u64);
        Ok(resource)
    }
}

/// A layered, provenance-bearing digital asset.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Original {
    /// The current identifier. Rewritten on migration.
    pub did: String,

    /// The current anchoring layer. Monotonically advancing.
    pub layer: Layer,

    /// Resources, set-like by `id`.
    pub resources: Vec<Resource>,

    /// The provenance chain.
    pub log: EventLog,

    /// Set by `deactivate`; terminal.
    #[serde(default)]
    pub deactivated: bool,
}

impl Original {
    pub(crate) fn ensure_active(&self) -> Result<()> {
        if self.deactivated {
            return Err(Error::Deactivated("Original is deactivated".to_string()));
        }
        Ok(())
    }
}

/// Merge an update's resource list into an existing one, by id: an entry
/// with a known id replaces that entry in place, new ids are appended in
/// their given order, and existing ids the update does not mention are kept.
#[must_use]
pub fn merge_resources(existing: &[Resource], updates: &[Resource]) -> Vec<Resource> {
    let mut merged = existing.to_vec();
    for update in updates {
        if let Some(slot) = merged.iter_mut().find(|r| r.id == update.id) {
            *slot = update.clone();
        } else {
            merged.push(update.clone());
        }
    }
    merged
}

pub(crate) fn validate_resources(resources: &[Resource]) -> Result<()> {
    for resource in resources {
        if resource.id.is_empty() {
            return Err(Error::Validation("resource id must not be empty".to_string()));
        }
        canonical::decode_multihash(&resource.hash).map_err(|e| {
            Error::Validation(format!("resource {} has an invalid content hash: {e}", resource.id))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(id: &str, hash_seed: &[u8]) -> Resource {
        Resource::from_content(id, "data", hash_seed).expect("should hash")
    }

    #[test]
    fn merge_replaces_appends_and_keeps() {
        let existing = vec![res("a", b"1"), res("b", b"2"), res("c", b"3")];
        let updates = vec![res("b", b"2-new"), res("d", b"4"), res("e", b"5")];

        let merged = merge_resources(&existing, &updates);
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d", "e"]);
        assert_eq!(merged[1].hash, res("b", b"2-new").hash);
        assert_eq!(merged[0].hash, res("a", b"1").hash);
    }

    #[test]
    fn merge_with_empty_update_is_identity() {
        let existing = vec![res("a", b"1")];
        assert_eq!(merge_resources(&existing, &[]), existing);
    }

    #[test]
    fn content_resource_carries_size() {
        let resource = res("main", b"content");
        assert_eq!(resource.size, Some(7));
        assert!(resource.hash.starts_with('z'));
    }

    #[test]
    fn resource_validation() {
        assert!(validate_resources(&[res("ok", b"x")]).is_ok());
        assert!(validate_resources(&[Resource::new("", "data", "zQm")]).is_err());
        assert!(validate_resources(&[Resource::new("bad", "data", "not-multibase!")]).is_err());
    }
}

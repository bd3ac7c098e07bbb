//! Minimal DID document shape exchanged with the webvh host.

use serde::{Deserialize, Serialize};

use crate::asset::Original;

/// Base DID context.
pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Context for Multikey verification material.
pub const MULTIKEY_CONTEXT: &str = "https://w3id.org/security/multikey/v1";

/// A DID document as published to and returned by the host.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    /// JSON-LD contexts.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// The document's DID.
    pub id: String,

    /// Alternative identifiers, e.g. resource URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub also_known_as: Option<Vec<String>>,

    /// Verification material.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verification_method: Vec<VerificationMethodEntry>,

    /// References into `verification_method` authorized for assertions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertion_method: Vec<String>,

    /// Service endpoints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<Service>,
}

/// A verification method carrying a multikey.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethodEntry {
    /// `<DID>#<key-id>`.
    pub id: String,

    /// Always `Multikey`.
    #[serde(rename = "type")]
    pub method_type: String,

    /// The controlling DID.
    pub controller: String,

    /// The public key as a multibase multikey.
    pub public_key_multibase: String,
}

/// A service endpoint on the document.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Endpoint id.
    pub id: String,

    /// Endpoint type.
    #[serde(rename = "type")]
    pub service_type: String,

    /// Endpoint URL.
    pub service_endpoint: String,
}

impl Original {
    /// Project this asset's identity to a minimal DID document: the current
    /// DID plus the resources' URLs as `alsoKnownAs`. Verification material
    /// is added by the publication path from configured update keys.
    #[must_use]
    pub fn did_document(&self) -> DidDocument {
        let urls: Vec<String> = self
            .resources
            .iter()
            .filter_map(|r| r.url.clone())
            .flatten()
            .collect();
        DidDocument {
            context: vec![DID_CONTEXT.to_string()],
            id: self.did.clone(),
            also_known_as: if urls.is_empty() { None } else { Some(urls) },
            ..DidDocument::default()
        }
    }
}

/// Build the document published for a DID, attaching one Multikey
/// verification method per update key.
#[must_use]
pub fn build_document(
    did: &str, also_known_as: Option<Vec<String>>, update_keys: &[String],
) -> DidDocument {
    let verification_method: Vec<VerificationMethodEntry> = update_keys
        .iter()
        .map(|key| VerificationMethodEntry {
            id: format!("{did}#{key}"),
            method_type: "Multikey".to_string(),
            controller: did.to_string(),
            public_key_multibase: key.clone(),
        })
        .collect();
    let assertion_method = verification_method.iter().map(|vm| vm.id.clone()).collect();

    DidDocument {
        context: vec![DID_CONTEXT.to_string(), MULTIKEY_CONTEXT.to_string()],
        id: did.to_string(),
        also_known_as,
        verification_method,
        assertion_method,
        service: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_carries_update_keys() {
        let keys = vec!["z6MkKey1".to_string(), "z6MkKey2".to_string()];
        let doc = build_document("did:webvh:scid:example.com", None, &keys);

        assert_eq!(doc.verification_method.len(), 2);
        assert_eq!(doc.verification_method[0].id, "did:webvh:scid:example.com#z6MkKey1");
        assert_eq!(doc.assertion_method.len(), 2);
        assert!(doc.context.contains(&MULTIKEY_CONTEXT.to_string()));
    }
}

//! Create operation: mint an Original at the `peer` layer.

use chrono::Utc;
use serde_json::Value;

use super::{validate_resources, Original, Resource};
use crate::did::{self, Layer};
use crate::log::{CreateEvent, EventData, EventLog, LogEntry};
use crate::provider::Signer;
use crate::{Error, Result};

impl Original {
    /// Create a new Original from a resource set.
    ///
    /// Derives the self-certifying `did:peer` identifier from the resources,
    /// records the signer's DID as the creator, and signs the genesis entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a malformed resource,
    /// [`Error::Encoding`] if the event cannot be serialized, and
    /// [`Error::External`] if the signer fails.
    pub async fn create<S: Signer>(
        resources: Vec<Resource>, signer: &S, metadata: Option<Value>,
    ) -> Result<Self> {
        validate_resources(&resources)?;

        let did = did::create_peer_did(&resources)?;
        let method = signer.verification_method().await.map_err(Error::External)?;
        let creator = method.split('#').next().unwrap_or(&method).to_string();

        let event = CreateEvent {
            did: did.clone(),
            layer: Layer::Peer,
            resources: resources.clone(),
            creator,
            created_at: Utc::now(),
            metadata,
        };
        let data = serde_json::to_value(&event)
            .map_err(|e| Error::Encoding(format!("event payload serialization failed: {e}")))?;
        let proof = signer.sign(&data).await.map_err(Error::External)?;

        let entry = LogEntry {
            event: EventData::Create(event),
            prev: None,
            proof: vec![proof],
        };
        tracing::debug!(%did, "created original");

        Ok(Self {
            did,
            layer: Layer::Peer,
            resources,
            log: EventLog {
                events: vec![entry],
                previous_log: None,
            },
            deactivated: false,
        })
    }
}

//! Update operation: append resources and metadata to the chain.

use chrono::Utc;
use serde_json::Value;

use super::{merge_resources, validate_resources, Original, Resource};
use crate::log::{EventData, LogEntry, UpdateEvent};
use crate::provider::Signer;
use crate::{Error, Result};

/// Inputs to an update. The event records this delta as submitted; the
/// returned Original carries the merged resource set.
#[derive(Clone, Debug, Default)]
pub struct UpdateRequest {
    /// Resources to merge in by id.
    pub resources: Option<Vec<Resource>>,

    /// Caller-supplied metadata.
    pub metadata: Option<Value>,

    /// Free-form reason recorded on the event.
    pub reason: Option<String>,
}

impl UpdateRequest {
    /// An update carrying only resources.
    #[must_use]
    pub fn with_resources(resources: Vec<Resource>) -> Self {
        Self {
            resources: Some(resources),
            ..Self::default()
        }
    }

    /// An update carrying only metadata.
    #[must_use]
    pub fn with_metadata(metadata: Value) -> Self {
        Self {
            metadata: Some(metadata),
            ..Self::default()
        }
    }
}

impl Original {
    /// Append an update event, merging the submitted resources by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Deactivated`] on a deactivated asset,
    /// [`Error::Validation`] for a malformed resource, [`Error::Chain`] if
    /// the log is unexpectedly empty, and [`Error::External`] if the signer
    /// fails.
    pub async fn update<S: Signer>(&self, request: UpdateRequest, signer: &S) -> Result<Self> {
        self.ensure_active()?;
        if let Some(resources) = &request.resources {
            validate_resources(resources)?;
        }

        let prev = self
            .log
            .tip_hash()?
            .ok_or_else(|| Error::Chain("event log has no entries".to_string()))?;

        let event = UpdateEvent {
            resources: request.resources.clone(),
            metadata: request.metadata,
            updated_at: Utc::now(),
            reason: request.reason,
        };
        let data = serde_json::to_value(&event)
            .map_err(|e| Error::Encoding(format!("event payload serialization failed: {e}")))?;
        let proof = signer.sign(&data).await.map_err(Error::External)?;

        let entry = LogEntry {
            event: EventData::Update(event),
            prev: Some(prev),
            proof: vec![proof],
        };

        let resources = request
            .resources
            .map_or_else(|| self.resources.clone(), |updates| merge_resources(&self.resources, &updates));

        let mut log = self.log.clone();
        log.events.push(entry);
        tracing::debug!(did = %self.did, entries = log.events.len(), "appended update");

        Ok(Self {
            did: self.did.clone(),
            layer: self.layer,
            resources,
            log,
            deactivated: false,
        })
    }
}

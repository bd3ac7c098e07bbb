//! Deactivate operation: retire an Original. Terminal.

use chrono::Utc;

use super::Original;
use crate::log::{DeactivateEvent, EventData, LogEntry};
use crate::provider::Signer;
use crate::{Error, Result};

impl Original {
    /// Append a deactivation event and mark the asset terminal. No further
    /// operation succeeds afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Deactivated`] if the asset is already deactivated,
    /// [`Error::Chain`] if the log is unexpectedly empty, and
    /// [`Error::External`] if the signer fails.
    pub async fn deactivate<S: Signer>(&self, reason: Option<String>, signer: &S) -> Result<Self> {
        if self.deactivated {
            return Err(Error::Deactivated("Original is already deactivated".to_string()));
        }

        let prev = self
            .log
            .tip_hash()?
            .ok_or_else(|| Error::Chain("event log has no entries".to_string()))?;

        let event = DeactivateEvent {
            deactivated_at: Utc::now(),
            reason,
        };
        let data = serde_json::to_value(&event)
            .map_err(|e| Error::Encoding(format!("event payload serialization failed: {e}")))?;
        let proof = signer.sign(&data).await.map_err(Error::External)?;

        let entry = LogEntry {
            event: EventData::Deactivate(event),
            prev: Some(prev),
            proof: vec![proof],
        };

        let mut log = self.log.clone();
        log.events.push(entry);
        tracing::debug!(did = %self.did, "deactivated original");

        Ok(Self {
            did: self.did.clone(),
            layer: self.layer,
            resources: self.resources.clone(),
            log,
            deactivated: true,
        })
    }
}

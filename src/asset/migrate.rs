//! Migrate operations: advance an Original to the next anchoring layer.
//!
//! Layers are totally ordered `peer < webvh < btco` and a migration must
//! advance exactly one step; skipping `webvh` or moving backward is rejected
//! before any provider is called.

use chrono::Utc;

use super::Original;
use crate::did::{self, BtcoDid, Layer};
use crate::log::{EventData, LogEntry, MigrateEvent};
use crate::provider::{Inscriber, Publisher, Signer};
use crate::{Error, Result};

impl Original {
    /// Migrate to the `webvh` layer by publishing the asset's provenance to
    /// a web host. The host assigns the new `did:webvh:…` identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Deactivated`] or [`Error::Layer`] before the host is
    /// contacted, [`Error::External`] if publication fails, and
    /// [`Error::Validation`] if the host returns a DID of the wrong method.
    pub async fn migrate_to_webvh<S: Signer, P: Publisher>(
        &self, signer: &S, publisher: &P,
    ) -> Result<Self> {
        self.ensure_can_migrate(Layer::Webvh)?;

        let receipt = publisher.publish(&self.did, &self.log).await.map_err(Error::External)?;
        if !matches!(did::layer_of(&receipt.did), Ok(Layer::Webvh)) {
            return Err(Error::Validation(format!(
                "host returned a non-webvh DID: {}",
                receipt.did
            )));
        }

        self.finish_migration(Layer::Webvh, receipt.did, None, signer).await
    }

    /// Migrate to the `btco` layer by inscribing the serialized asset onto
    /// Bitcoin. The inscription's reveal transaction yields the new
    /// `did:btco:…` identifier, and its txid is recorded on the event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Deactivated`] or [`Error::Layer`] before the
    /// provider is contacted, [`Error::External`] if inscription fails, and
    /// [`Error::Validation`] if the returned DID does not parse.
    pub async fn migrate_to_btco<S: Signer, I: Inscriber>(
        &self, signer: &S, inscriber: &I,
    ) -> Result<Self> {
        self.ensure_can_migrate(Layer::Btco)?;

        let receipt = inscriber.inscribe(self).await.map_err(Error::External)?;
        BtcoDid::parse(&receipt.did)?;
        if receipt.txid.is_empty() {
            return Err(Error::Validation("inscription receipt has no txid".to_string()));
        }

        self.finish_migration(Layer::Btco, receipt.did, Some(receipt.txid), signer).await
    }

    /// Check that this asset may migrate to `to` without contacting any
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Deactivated`] on a deactivated asset and
    /// [`Error::Layer`] for an invalid progression.
    pub fn ensure_can_migrate(&self, to: Layer) -> Result<()> {
        self.ensure_active()?;
        self.layer.validate_progression(to)
    }

    async fn finish_migration<S: Signer>(
        &self, to_layer: Layer, new_did: String, txid: Option<String>, signer: &S,
    ) -> Result<Self> {
        let prev = self
            .log
            .tip_hash()?
            .ok_or_else(|| Error::Chain("event log has no entries".to_string()))?;

        let event = MigrateEvent {
            from_layer: self.layer,
            to_layer,
            new_did: new_did.clone(),
            migrated_at: Utc::now(),
            txid,
        };
        let data = serde_json::to_value(&event)
            .map_err(|e| Error::Encoding(format!("event payload serialization failed: {e}")))?;
        let proof = signer.sign(&data).await.map_err(Error::External)?;

        let entry = LogEntry {
            event: EventData::Migrate(event),
            prev: Some(prev),
            proof: vec![proof],
        };

        let mut log = self.log.clone();
        log.events.push(entry);
        tracing::debug!(from = %self.did, to = %new_did, layer = %to_layer, "migrated original");

        Ok(Self {
            did: new_did,
            layer: to_layer,
            resources: self.resources.clone(),
            log,
            deactivated: false,
        })
    }
}

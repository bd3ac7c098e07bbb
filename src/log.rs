//! # Event Log
//!
//! The hash-linked, append-only provenance chain. Every entry records one
//! state transition, signed by its author and optionally attested by
//! witnesses. The chain rule is positional: each entry's `prev` is the hash
//! of the entry before it, and the first entry carries no `prev` at all.
//!
//! The hash of an entry covers `{type, data, prev, proof}` verbatim, so a
//! retroactive edit to any committed entry invalidates every later `prev`.
//! Signatures cover the event payload alone; a proof never signs itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::asset::Resource;
use crate::did::Layer;
use crate::proof::Proof;
use crate::{canonical, Error, Result};

/// The provenance chain of an Original.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    /// Entries in insertion order.
    pub events: Vec<LogEntry>,

    /// Hash pointer to an earlier chunk, for chunked logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_log: Option<String>,
}

impl EventLog {
    /// The most recent entry, if any.
    #[must_use]
    pub fn tail(&self) -> Option<&LogEntry> {
        self.events.last()
    }

    /// The hash of the most recent entry, used as the `prev` of the next one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the tail cannot be canonicalized.
    pub fn tip_hash(&self) -> Result<Option<String>> {
        self.events.last().map(LogEntry::hash).transpose()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A single signed state transition.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    /// The event, serialized as adjacent `type`/`data` fields.
    #[serde(flatten)]
    pub event: EventData,

    /// Hash of the preceding entry; absent on the first entry only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,

    /// Author proof first, witness attestations after.
    pub proof: Vec<Proof>,
}

impl LogEntry {
    /// Hash this entry for chaining. Covers the full entry, proofs included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the entry cannot be canonicalized.
    pub fn hash(&self) -> Result<String> {
        canonical::hash(self)
    }

    /// The event type tag: `create`, `update`, `migrate`, or `deactivate`.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match &self.event {
            EventData::Create(_) => "create",
            EventData::Update(_) => "update",
            EventData::Migrate(_) => "migrate",
            EventData::Deactivate(_) => "deactivate",
        }
    }

    /// The event payload as a JSON value. This is what proofs sign.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the payload cannot be serialized.
    pub fn data_value(&self) -> Result<Value> {
        let value = match &self.event {
            EventData::Create(event) => serde_json::to_value(event),
            EventData::Update(event) => serde_json::to_value(event),
            EventData::Migrate(event) => serde_json::to_value(event),
            EventData::Deactivate(event) => serde_json::to_value(event),
        };
        value.map_err(|e| Error::Encoding(format!("event payload serialization failed: {e}")))
    }

    /// A copy of this entry with extra proofs appended. The input entry is
    /// left untouched.
    #[must_use]
    pub fn with_proofs(&self, extra: Vec<Proof>) -> Self {
        let mut appended = self.clone();
        appended.proof.extend(extra);
        appended
    }
}

/// The event carried by a log entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum EventData {
    /// The asset came into existence.
    Create(CreateEvent),

    /// Resources or metadata changed.
    Update(UpdateEvent),

    /// The asset advanced to the next layer.
    Migrate(MigrateEvent),

    /// The asset was retired. Terminal.
    Deactivate(DeactivateEvent),
}

/// Payload of a `create` event.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    /// The self-certifying `did:peer` identifier.
    pub did: String,

    /// Always `peer` at creation.
    pub layer: Layer,

    /// The initial resource set.
    pub resources: Vec<Resource>,

    /// DID of the creator, taken from the signer's verification method.
    pub creator: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Caller-supplied metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Payload of an `update` event. Records the submitted delta; the merged
/// resource set lives on the returned Original.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    /// Resources submitted with the update, merged by id into the asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,

    /// Caller-supplied metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    /// Update timestamp.
    pub updated_at: DateTime<Utc>,

    /// Free-form reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Payload of a `migrate` event.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MigrateEvent {
    /// Layer before the migration.
    pub from_layer: Layer,

    /// Layer after the migration.
    pub to_layer: Layer,

    /// The identifier assigned at the target layer.
    pub new_did: String,

    /// Migration timestamp.
    pub migrated_at: DateTime<Utc>,

    /// Reveal transaction id. Present iff the target layer is `btco`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
}

/// Payload of a `deactivate` event.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateEvent {
    /// Deactivation timestamp.
    pub deactivated_at: DateTime<Utc>,

    /// Free-form reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

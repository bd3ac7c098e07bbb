//! Adapter between the engine and an ordinals provider.

use super::codec::{self, Codec};
use super::{is_valid_inscription_id, InscriptionRecord, InscriptionRequest, OrdinalsProvider};
use crate::asset::Original;
use crate::did::BtcoDid;
use crate::log::EventLog;
use crate::provider::{Inscriber, InscriptionReceipt};
use crate::{Error, Result};

/// Inscription configuration.
#[derive(Clone, Debug, Default)]
pub struct OrdinalsConfig {
    /// Wire format for payloads. CBOR by default.
    pub codec: Codec,

    /// Fee rate in sats/vbyte to pin on requests, when set.
    pub fee_rate: Option<u64>,
}

/// An inscribed Original and the identifier it anchors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    /// The `did:btco:…` identifier derived from the reveal transaction.
    pub did: String,

    /// The inscription as reported by the provider.
    pub inscription: InscriptionRecord,
}

/// Wraps an [`OrdinalsProvider`] with codec and fee configuration.
pub struct OrdinalsAdapter<P> {
    provider: P,
    config: OrdinalsConfig,
}

impl<P: OrdinalsProvider> OrdinalsAdapter<P> {
    /// An adapter over the given provider.
    #[must_use]
    pub const fn new(provider: P, config: OrdinalsConfig) -> Self {
        Self { provider, config }
    }

    /// Inscribe a full Original, returning the anchor it is now bound to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the payload cannot be serialized,
    /// [`Error::External`] if the provider fails, and [`Error::Validation`]
    /// if the provider reports a malformed inscription id.
    pub async fn inscribe_original(&self, original: &Original) -> Result<Anchor> {
        let request = InscriptionRequest {
            content: codec::encode_original(original, self.config.codec)?,
            content_type: self.config.codec.content_type().to_string(),
            fee_rate: self.config.fee_rate,
            metadata: Some(codec::original_metadata(original)),
        };
        let inscription = self.submit(request).await?;
        let did = format!("did:btco:{}i{}", inscription.txid, inscription.vout);
        tracing::debug!(%did, inscription = %inscription.inscription_id, "inscribed original");
        Ok(Anchor { did, inscription })
    }

    /// Inscribe an event log on its own, for post-creation updates.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::inscribe_original`].
    pub async fn inscribe_log(&self, log: &EventLog) -> Result<InscriptionRecord> {
        let request = InscriptionRequest {
            content: codec::encode_log(log, self.config.codec)?,
            content_type: self.config.codec.content_type().to_string(),
            fee_rate: self.config.fee_rate,
            metadata: Some(codec::log_metadata(log)),
        };
        self.submit(request).await
    }

    /// Fetch an Original back by its `did:btco` identifier. `None` when the
    /// provider does not know the inscription.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a malformed DID, [`Error::External`]
    /// if the provider fails, and [`Error::Encoding`] when the inscribed
    /// bytes do not decode under their recorded content type.
    pub async fn fetch_original(&self, did: &str) -> Result<Option<Original>> {
        let parsed = BtcoDid::parse(did)?;
        let Some(record) = self
            .provider
            .get_inscription(&parsed.inscription_id())
            .await
            .map_err(Error::External)?
        else {
            return Ok(None);
        };
        let codec = Codec::from_content_type(&record.content_type)?;
        Ok(Some(codec::decode_original(&record.content, codec)?))
    }

    async fn submit(&self, request: InscriptionRequest) -> Result<InscriptionRecord> {
        let record = self.provider.create_inscription(&request).await.map_err(Error::External)?;
        if !is_valid_inscription_id(&record.inscription_id) {
            return Err(Error::Validation(format!(
                "provider returned a malformed inscription id: {}",
                record.inscription_id
            )));
        }
        Ok(record)
    }
}

impl<P: OrdinalsProvider> Inscriber for OrdinalsAdapter<P> {
    async fn inscribe(&self, original: &Original) -> anyhow::Result<InscriptionReceipt> {
        let anchor = self.inscribe_original(original).await?;
        Ok(InscriptionReceipt {
            did: anchor.did,
            txid: anchor.inscription.txid,
        })
    }
}

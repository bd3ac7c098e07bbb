//! Adapter between the engine and a webvh host.

use super::document::{build_document, Service};
use super::host::{
    CreateDidRequest, HostDidState, HostSigner, Resolution, UpdateDidRequest, WebVhHost,
};
use super::log::HostLogEntry;
use crate::asset::Original;
use crate::log::EventLog;
use crate::provider::{Publisher, PublishReceipt, Signer};
use crate::{Error, Result};

/// Where and under which keys a host publication lands.
#[derive(Clone, Debug, Default)]
pub struct WebVhConfig {
    /// Host domain.
    pub domain: String,

    /// Multikeys authorized to sign hosted log entries.
    pub update_keys: Vec<String>,

    /// Optional path below the domain, e.g. a user slug.
    pub path: Option<String>,
}

/// Wraps a [`WebVhHost`] with publication configuration.
pub struct WebVhAdapter<H> {
    host: H,
    config: WebVhConfig,
}

impl<H: WebVhHost> WebVhAdapter<H> {
    /// An adapter over the given host.
    #[must_use]
    pub const fn new(host: H, config: WebVhConfig) -> Self {
        Self { host, config }
    }

    /// Publish an Original's identity, producing the hosted DID state.
    ///
    /// The published document is built from the asset's DID-document
    /// projection plus the configured update keys, and the engine signer is
    /// adapted to the host's signer shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::External`] if the host fails.
    pub async fn publish<S: Signer>(
        &self, original: &Original, signer: &S,
    ) -> Result<HostDidState> {
        let projection = original.did_document();
        self.publish_identity(&original.did, projection.also_known_as, signer).await
    }

    /// Append a document update to the hosted log.
    ///
    /// # Errors
    ///
    /// Returns [`Error::External`] if the host fails.
    pub async fn update<S: Signer>(
        &self, log: &[HostLogEntry], signer: &S, update_keys: Option<Vec<String>>,
        services: Option<Vec<Service>>,
    ) -> Result<HostDidState> {
        let request = UpdateDidRequest {
            log: log.to_vec(),
            update_keys,
            services,
        };
        let host_signer = HostSigner::new(signer);
        self.host.update_did(&request, &host_signer).await.map_err(Error::External)
    }

    /// Deactivate the hosted DID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::External`] if the host fails.
    pub async fn deactivate<S: Signer>(
        &self, log: &[HostLogEntry], signer: &S,
    ) -> Result<HostDidState> {
        let host_signer = HostSigner::new(signer);
        self.host.deactivate_did(log, &host_signer).await.map_err(Error::External)
    }

    /// Resolve a hosted DID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::External`] if the host fails outright; a resolution
    /// failure the host could describe comes back in [`Resolution::error`].
    pub async fn resolve(&self, did: &str) -> Result<Resolution> {
        self.host.resolve_did(did).await.map_err(Error::External)
    }

    /// Bind a signer, yielding the [`Publisher`] used by
    /// [`Original::migrate_to_webvh`].
    #[must_use]
    pub const fn publisher<'a, S: Signer>(&'a self, signer: &'a S) -> WebVhPublisher<'a, H, S> {
        WebVhPublisher {
            adapter: self,
            signer,
        }
    }

    async fn publish_identity<S: Signer>(
        &self, did: &str, also_known_as: Option<Vec<String>>, signer: &S,
    ) -> Result<HostDidState> {
        let document = build_document(did, also_known_as, &self.config.update_keys);
        let request = CreateDidRequest {
            domain: self.config.domain.clone(),
            path: self.config.path.clone(),
            update_keys: self.config.update_keys.clone(),
            verification_methods: document.verification_method,
            context: document.context,
        };
        let host_signer = HostSigner::new(signer);
        let state = self.host.create_did(&request, &host_signer).await.map_err(Error::External)?;
        tracing::debug!(did = %state.did, scid = %state.meta.scid, "published to webvh host");
        Ok(state)
    }
}

/// A [`WebVhAdapter`] bound to a signer, usable as the publish callback of a
/// webvh migration.
pub struct WebVhPublisher<'a, H, S> {
    adapter: &'a WebVhAdapter<H>,
    signer: &'a S,
}

impl<H: WebVhHost, S: Signer> Publisher for WebVhPublisher<'_, H, S> {
    async fn publish(&self, did: &str, _log: &EventLog) -> anyhow::Result<PublishReceipt> {
        let state = self.adapter.publish_identity(did, None, self.signer).await?;
        Ok(PublishReceipt { did: state.did })
    }
}

//! # Originals Protocol Core
//!
//! A layered, cryptographically verifiable provenance engine for digital
//! assets. Each asset (an [`Original`]) couples a stable logical identity, a
//! set of content-addressed resources, and a hash-linked append-only log of
//! signed state transitions.
//!
//! Assets progress through up to three anchoring layers, each more public
//! and immutable than the last:
//!
//! - `peer`: an offline, self-certifying identifier derived from resource
//!   content,
//! - `webvh`: a web-hosted identifier with verifiable history,
//! - `btco`: a Bitcoin-anchored identifier carried by an ordinal
//!   inscription.
//!
//! The engine constructs and validates the event log, derives identifiers,
//! signs entries through a caller-supplied [`Signer`], verifies whole chains,
//! collects threshold-verified witness attestations, and serializes assets
//! into the webvh and inscription wire formats. Key custody, the web host,
//! and the Bitcoin transaction machinery all live behind capability traits;
//! the engine never touches private keys.
//!
//! ```no_run
//! use originals_core::{KeyPairSigner, KeyType, MultikeyVerifier, Original, Resource};
//!
//! # async fn demo() -> originals_core::Result<()> {
//! let signer = KeyPairSigner::generate(KeyType::Ed25519);
//! let resource = Resource::from_content("main", "image", b"...png bytes...")?;
//!
//! let original = Original::create(vec![resource], &signer, None).await?;
//! let report = original.verify(Some(&MultikeyVerifier)).await;
//! assert!(report.valid);
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod btco;
pub mod canonical;
pub mod did;
mod error;
pub mod key;
pub mod keyring;
pub mod log;
pub mod proof;
pub mod provider;
pub mod webvh;
pub mod witness;

pub use crate::asset::{merge_resources, Original, Resource, UpdateRequest, VerificationReport};
pub use crate::did::Layer;
pub use crate::error::{Error, Result};
pub use crate::key::{KeyPair, KeyType};
pub use crate::keyring::{KeyPairSigner, MultikeyVerifier};
pub use crate::log::{
    CreateEvent, DeactivateEvent, EventData, EventLog, LogEntry, MigrateEvent, UpdateEvent,
};
pub use crate::proof::Proof;
pub use crate::provider::{
    Inscriber, InscriptionReceipt, Publisher, PublishReceipt, Signer, Verifier,
};
pub use crate::witness::{
    collect_attestations, verify_witness_proofs, WitnessOptions, WitnessOutcome, WitnessPolicy,
    WitnessReport, WitnessService,
};

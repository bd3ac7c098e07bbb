//! # WebVH Layer Adapter
//!
//! Bridges the engine to an external `did:webvh` host: publication of an
//! Original's identity, later document updates and deactivation, resolution,
//! and the JSONL wire format of the hosted DID log.
//!
//! See <https://identity.foundation/didwebvh/next/> for the method contract
//! the host side implements.

mod adapter;
mod document;
mod host;
mod log;

pub use adapter::{WebVhAdapter, WebVhConfig, WebVhPublisher};
pub use document::{DidDocument, Service, VerificationMethodEntry, DID_CONTEXT, MULTIKEY_CONTEXT};
pub use host::{
    CreateDidRequest, HostDidMeta, HostDidState, HostSignature, HostSigner, HostSigning,
    HostSigningInput, Resolution, UpdateDidRequest, WebVhHost,
};
pub use log::{hosting_path, parse_log, serialize_log, HostLogEntry};

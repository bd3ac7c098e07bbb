//! # Errors
//!
//! Tagged error kinds surfaced by the provenance engine. Mutating operations
//! fail fast with one of these; `verify` and the witness threshold check are
//! total and collect violations into reports instead.

use thiserror::Error;

/// Returns engine-specific errors.
pub type Result<T> = core::result::Result<T, Error>;

/// Error kinds raised by the engine.
///
/// `Deactivated` and `Layer` are permanent at the logical level; `External`
/// wraps a provider failure and may be retried by the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// Input fails shape or range constraints: missing required field,
    /// invalid DID syntax, malformed multibase.
    #[error("validation error: {0}")]
    Validation(String),

    /// A `prev` hash is missing or does not match the preceding entry.
    #[error("chain error: {0}")]
    Chain(String),

    /// Missing proofs or a failed signature verification.
    #[error("proof error: {0}")]
    Proof(String),

    /// Operation attempted on a deactivated Original.
    #[error("{0}")]
    Deactivated(String),

    /// Invalid layer progression: skipping a layer, going backward, or
    /// migrating to the current layer.
    #[error("{0}")]
    Layer(String),

    /// An error raised by a provider callback (publish, inscribe, witness,
    /// host).
    #[error("external provider error: {0}")]
    External(anyhow::Error),

    /// Multibase, multihash, or canonicalization failure.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl Error {
    /// Returns `true` for errors wrapping a provider failure, which callers
    /// may treat as transient.
    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_error_displays_bare_message() {
        let err = Error::Layer("Cannot migrate from btco to peer".to_string());
        assert_eq!(err.to_string(), "Cannot migrate from btco to peer");
    }

    #[test]
    fn external_is_transient() {
        let err = Error::External(anyhow::anyhow!("connection refused"));
        assert!(err.is_external());
        assert!(!Error::Validation("bad".to_string()).is_external());
    }
}

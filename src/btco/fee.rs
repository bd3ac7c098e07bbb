//! Informational fee estimate for a commit/reveal inscription pair.
//!
//! The true fee is the provider's responsibility; this helper only sizes the
//! pair so callers can sanity-check a fee rate before submitting.

use serde::{Deserialize, Serialize};

/// Assumed vbytes of the commit transaction.
pub const COMMIT_VBYTES: u64 = 150;

/// Assumed base vbytes of the reveal transaction, before content.
pub const REVEAL_BASE_VBYTES: u64 = 150;

/// An estimated commit/reveal fee split.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
    /// Commit transaction vbytes.
    pub commit_vbytes: u64,

    /// Reveal transaction vbytes, including the witness-discounted content.
    pub reveal_vbytes: u64,

    /// Total vbytes across the pair.
    pub total_vbytes: u64,

    /// Total fee at the given rate, in sats.
    pub fee_sats: u64,
}

/// Estimate the fee for inscribing `content_size` bytes at `fee_rate`
/// sats/vbyte. Content counts at a quarter weight in the reveal witness.
#[must_use]
pub fn estimate_fee(content_size: usize, fee_rate: u64) -> FeeEstimate {
    let reveal_vbytes = REVEAL_BASE_VBYTES + (content_size as u64).div_ceil(4);
    let total_vbytes = COMMIT_VBYTES + reveal_vbytes;
    FeeEstimate {
        commit_vbytes: COMMIT_VBYTES,
        reveal_vbytes,
        total_vbytes,
        fee_sats: total_vbytes * fee_rate,
    }
}

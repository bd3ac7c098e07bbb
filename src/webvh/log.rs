//! JSONL codec for the hosted DID log.
//!
//! The log file is one JSON object per line. A trailing newline is written
//! on serialization; blank lines are tolerated on parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::proof::Proof;
use crate::{Error, Result};

/// One line of the hosted `did.jsonl` file.
///
/// `parameters` and `state` are host-owned shapes and pass through opaquely.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HostLogEntry {
    /// Version number, a dash, and the entry hash.
    pub version_id: String,

    /// UTC timestamp of this version.
    pub version_time: DateTime<Utc>,

    /// Method parameters in force from this entry on.
    pub parameters: Value,

    /// The DID document as of this version.
    pub state: Value,

    /// Data-integrity proofs over the entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proof: Vec<Proof>,
}

/// Parse a JSONL log. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`Error::Encoding`] naming the offending line number when a line
/// is not a valid entry.
pub fn parse_log(text: &str) -> Result<Vec<HostLogEntry>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line).map_err(|e| {
                Error::Encoding(format!("invalid DID log entry on line {}: {e}", number + 1))
            })
        })
        .collect()
}

/// Serialize a log to JSONL, one entry per line with a trailing newline.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if an entry cannot be serialized.
pub fn serialize_log(entries: &[HostLogEntry]) -> Result<String> {
    let mut out = String::new();
    for entry in entries {
        let line = serde_json::to_string(entry)
            .map_err(|e| Error::Encoding(format!("DID log entry serialization failed: {e}")))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// The hosting path for a path-based DID log:
/// `/.well-known/did/<scid>/did.jsonl`.
#[must_use]
pub fn hosting_path(scid: &str) -> String {
    format!("/.well-known/did/{scid}/did.jsonl")
}

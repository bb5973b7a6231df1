//! Version history shapes
//!
//! `KeyModification` is what the substrate yields for one committed version
//! of a key. `HistoryEntry` and `VersionEntry` are the two derived views the
//! registries return from their `*History` functions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One committed version of a key, oldest first when iterated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyModification {
    /// Transaction that committed this version
    pub tx_id: String,

    /// Commit time in seconds since the Unix epoch
    pub timestamp: i64,

    /// Raw stored bytes (empty for deletions)
    pub value: Vec<u8>,

    /// Whether this version deleted the key
    pub is_delete: bool,
}

/// A meaningful balance change reconstructed from account history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Balance after minus balance before
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub delta: Decimal,

    /// Commit time of the version that produced the change
    #[serde(rename = "timestampSeconds")]
    pub timestamp_seconds: i64,
}

/// One raw version of a non-numeric record, as returned by person and card history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    /// 1-based position in the key's history
    pub sequence: usize,

    /// Transaction that committed the version
    pub tx_id: String,

    /// Commit time in seconds since the Unix epoch
    pub timestamp_seconds: i64,

    /// Whether the version deleted the key
    pub is_delete: bool,

    /// The stored record; `null` for deletions, a string if it was not JSON
    pub value: serde_json::Value,
}

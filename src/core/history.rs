//! History reconstruction
//!
//! Replays the committed versions of one key and reduces them to a view:
//! - `balance_deltas`: meaningful balance changes of an account
//! - `version_entries`: one structured entry per version of any record
//! - `legacy_transcript`: the concatenated single-string audit format
//!
//! Balances are compared as exact decimals against the last reported balance.
//! A change counts only when it exceeds the epsilon; smaller steps are noise
//! and leave the baseline where it was, so a run of them is reported once it
//! adds up. The baseline before the first version is zero and a delete marker
//! reads as a zero balance.

use crate::types::{BankAccount, HistoryEntry, KeyModification, RegistryError, VersionEntry};
use rust_decimal::Decimal;
use serde::Serialize;

/// Reduce account versions to the balance changes larger than `epsilon`
///
/// # Arguments
///
/// * `versions` - Committed versions of one account key, oldest first
/// * `epsilon` - Largest absolute change still treated as noise
///
/// # Errors
///
/// Returns `RegistryError::Persistence` if a stored version is not a
/// readable account record, or `RegistryError::ArithmeticOverflow` if a
/// difference cannot be represented.
pub fn balance_deltas<I>(versions: I, epsilon: Decimal) -> Result<Vec<HistoryEntry>, RegistryError>
where
    I: IntoIterator<Item = KeyModification>,
{
    let mut previous = Decimal::ZERO;
    let mut entries = Vec::new();

    for version in versions {
        let current = version_balance(&version)?;
        let delta = current.checked_sub(previous).ok_or_else(|| {
            RegistryError::arithmetic_overflow("history", &version.tx_id)
        })?;

        if delta.abs() > epsilon {
            entries.push(HistoryEntry {
                delta: delta.normalize(),
                timestamp_seconds: version.timestamp,
            });
            previous = current;
        }
    }

    Ok(entries)
}

fn version_balance(version: &KeyModification) -> Result<Decimal, RegistryError> {
    if version.is_delete {
        return Ok(Decimal::ZERO);
    }
    BankAccount::parse(&version.value)
        .map(|account| account.balance)
        .map_err(|e| {
            RegistryError::persistence(format!(
                "version {} is not a readable account: {}",
                version.tx_id, e
            ))
        })
}

/// One structured entry per version, numbered from 1
pub fn version_entries<I>(versions: I) -> Vec<VersionEntry>
where
    I: IntoIterator<Item = KeyModification>,
{
    versions
        .into_iter()
        .enumerate()
        .map(|(index, version)| {
            let value = if version.is_delete {
                serde_json::Value::Null
            } else {
                serde_json::from_slice(&version.value).unwrap_or_else(|_| {
                    serde_json::Value::String(String::from_utf8_lossy(&version.value).into_owned())
                })
            };

            VersionEntry {
                sequence: index + 1,
                tx_id: version.tx_id,
                timestamp_seconds: version.timestamp,
                is_delete: version.is_delete,
                value,
            }
        })
        .collect()
}

/// Concatenated `<n> record : <txId> <rawValue>` fragments, no separators
pub fn legacy_transcript<I>(versions: I) -> String
where
    I: IntoIterator<Item = KeyModification>,
{
    versions
        .into_iter()
        .enumerate()
        .map(|(index, version)| {
            format!(
                "{} record : {} {}",
                index + 1,
                version.tx_id,
                String::from_utf8_lossy(&version.value)
            )
        })
        .collect()
}

/// Render the history of a non-numeric record as a response payload
///
/// Structured JSON by default, the concatenated transcript when `legacy` is set.
pub fn record_history_payload<I>(versions: I, legacy: bool) -> Result<Vec<u8>, RegistryError>
where
    I: IntoIterator<Item = KeyModification>,
{
    if legacy {
        return Ok(legacy_transcript(versions).into_bytes());
    }
    to_payload(&version_entries(versions))
}

/// Encode a history view as JSON
pub fn to_payload<T: Serialize + ?Sized>(view: &T) -> Result<Vec<u8>, RegistryError> {
    serde_json::to_vec(view)
        .map_err(|e| RegistryError::persistence(format!("failed to encode history: {e}")))
}

//! Core traits at the seams between registries, the substrate and each other
//!
//! - `LedgerStub`: what a registry sees of the substrate during one invocation
//! - `RegistryRouter`: how a stub reaches sibling registries
//! - `PersonLookup` / `AccountLookup`: read-only cross-registry capabilities
//!   injected into the registries that need them
//! - `Registry`: a dispatchable record-keeper

use crate::core::ledger::Transaction;
use crate::types::{KeyModification, RegistryError, Response};

/// Chronological iterator over all committed versions of one key
pub type HistoryIter = Box<dyn Iterator<Item = KeyModification>>;

/// Namespace-scoped view of the substrate for one invocation
///
/// Reads observe the invocation's own pending writes. Writes become visible
/// to other invocations only when the host commits the invocation.
pub trait LedgerStub {
    /// Read the current value of a key
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, RegistryError>;

    /// Write a new version of a key
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), RegistryError>;

    /// Delete a key (appends a delete marker to its history)
    fn del_state(&self, key: &str) -> Result<(), RegistryError>;

    /// All committed versions of a key, oldest first
    fn history_for_key(&self, key: &str) -> Result<HistoryIter, RegistryError>;

    /// Call a function on a sibling registry within the same unit of work
    fn invoke_registry(&self, registry: &str, function: &str, args: &[String]) -> Response;

    /// Channel the invocation runs on, passed unchanged to nested calls
    fn channel_id(&self) -> &str;
}

/// Routes nested invocations to registries by name
pub trait RegistryRouter {
    fn route(&self, registry: &str, function: &str, args: &[String], tx: &Transaction) -> Response;
}

/// Read-only access to the person registry
pub trait PersonLookup {
    /// Fetch a serialized person
    ///
    /// # Errors
    ///
    /// `RegistryError::Dependency` if the call fails or returns nothing.
    fn get_person(&self, passport_id: &str) -> Result<Vec<u8>, RegistryError>;
}

/// Read-only access to the account registry
pub trait AccountLookup {
    /// Fetch a serialized bank account
    ///
    /// # Errors
    ///
    /// `RegistryError::Dependency` if the call fails or returns nothing.
    fn get_account(&self, account_number: &str) -> Result<Vec<u8>, RegistryError>;
}

/// A record-keeper that owns one key namespace
pub trait Registry: Send + Sync {
    /// Registry name, doubling as its key namespace
    fn name(&self) -> &'static str;

    /// Dispatch a function call against the given stub
    fn invoke(&self, function: &str, args: &[String], stub: &dyn LedgerStub) -> Response;
}

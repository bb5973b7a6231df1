//! Core ledger module
//!
//! This module contains the registries and the substrate they run on:
//! - `traits` - Seams between registries, the substrate and each other
//! - `ledger` - In-memory versioned key-value store with per-invocation transactions
//! - `record_store` - Typed record access over a stub
//! - `client` - Cross-registry lookup capabilities
//! - `dispatch` - Function-name to command resolution
//! - `person_registry`, `account_registry`, `card_registry` - The registries
//! - `transfer` - Balance moves between two accounts
//! - `history` - History reconstruction
//! - `host` - Registry table, commit on success
//! - `config` - Ledger settings

pub mod account_registry;
pub mod card_registry;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod history;
pub mod host;
pub mod ledger;
pub mod person_registry;
pub mod record_store;
pub mod traits;
pub mod transfer;

/// Name and key namespace of the person registry
pub const PERSON_REGISTRY: &str = "person";

/// Name and key namespace of the account registry
pub const ACCOUNT_REGISTRY: &str = "account";

/// Name and key namespace of the card registry
pub const CARD_REGISTRY: &str = "card";

pub use account_registry::AccountRegistry;
pub use card_registry::CardRegistry;
pub use config::LedgerConfig;
pub use host::LedgerHost;
pub use ledger::{Ledger, ScopedStub, StateKey, Transaction};
pub use person_registry::PersonRegistry;
pub use record_store::RecordStore;

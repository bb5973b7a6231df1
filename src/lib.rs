//! Ledger Registries Library
//! # Overview
//!
//! Person, account and card registries over a shared versioned key-value
//! ledger, with cross-registry integrity checks, balance transfers and
//! history reconstruction. Invocation scripts run through a sync or an
//! async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Records, history shapes, invocations and the error taxonomy
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Registries and the substrate they run on:
//!   - [`core::ledger`] - Versioned store with per-invocation transactions
//!   - [`core::host`] - Registry table, commits successful invocations
//!   - [`core::transfer`] - Non-negative balance rule and account writes
//!   - [`core::history`] - Balance deltas and version listings
//! - [`io`] - Script reading and outcome writing
//! - [`strategy`] - Sync and async script pipelines
//!
//! # Registries
//!
//! - **person**: `addPerson`, `getPerson`, `updatePerson`, `deletePerson`, `personHistory`
//! - **account**: `addAccount`, `getAccount`, `updateAccount`, `deleteAccount`,
//!   `getBalance`, `transfer`, `accountHistory` (alias `getHistory`)
//! - **card**: `addCard`, `getCard`, `updateCard`, `deleteAccount` (alias
//!   `deleteCard`), `cardHistory`
//!
//! Every function takes exactly one string argument.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use crate::core::{LedgerConfig, LedgerHost};
pub use io::write_outcomes_csv;
pub use types::{
    AccountId, BankAccount, CardNumber, CardRecord, CreditCard, DebitCard, HistoryEntry,
    Invocation, PassportId, Person, RegistryError, Response, Status, Transfer, VersionEntry,
};

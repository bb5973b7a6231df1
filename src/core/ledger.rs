//! In-memory versioned key-value ledger
//!
//! This module provides the substrate the registries run on:
//! - `Ledger` keeps every committed version of every key, per channel and namespace
//! - `Transaction` buffers the writes of one invocation until the host commits it
//! - `ScopedStub` exposes one namespace of a transaction through `LedgerStub`
//!
//! # Atomicity
//!
//! All writes of an invocation, including writes made by nested calls into
//! sibling registries, land in one write set. `Ledger::commit` appends them
//! with a single transaction id and timestamp; a failed invocation drops its
//! `Transaction` and nothing is written. A `transfer` therefore never leaves
//! one account updated and the other not.
//!
//! # Thread Safety
//!
//! Versions live in a `DashMap`, so reads from other threads never block on
//! unrelated keys. Ordering between invocations is the host's job.

use crate::core::traits::{HistoryIter, LedgerStub, RegistryRouter};
use crate::types::{KeyModification, RegistryError, Response};
use dashmap::DashMap;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Fully qualified key: channel, owning namespace, record key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey {
    pub channel: String,
    pub namespace: String,
    pub key: String,
}

impl StateKey {
    pub fn new(channel: &str, namespace: &str, key: &str) -> Self {
        StateKey {
            channel: channel.to_string(),
            namespace: namespace.to_string(),
            key: key.to_string(),
        }
    }
}

/// Append-only version store
pub struct Ledger {
    /// Every committed version per key, oldest first
    versions: DashMap<StateKey, Vec<KeyModification>>,

    /// Sequence used to mint transaction ids
    next_tx: AtomicU64,

    /// Commit timestamp source, seconds since the epoch
    clock: Clock,
}

impl Ledger {
    /// Create an empty ledger stamping commits with the wall clock
    pub fn new() -> Self {
        Self::with_clock(|| chrono::Utc::now().timestamp())
    }

    /// Create an empty ledger with a custom commit clock
    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        Ledger {
            versions: DashMap::new(),
            next_tx: AtomicU64::new(0),
            clock: Arc::new(clock),
        }
    }

    /// Open a transaction on a channel
    pub fn begin(&self, channel: &str) -> Transaction {
        let sequence = self.next_tx.fetch_add(1, Ordering::SeqCst) + 1;
        Transaction::new(format!("tx{sequence:08}"), channel)
    }

    /// Latest committed value of a key, `None` if absent or deleted
    pub fn current(&self, key: &StateKey) -> Option<Vec<u8>> {
        let versions = self.versions.get(key)?;
        let latest = versions.last()?;
        if latest.is_delete {
            None
        } else {
            Some(latest.value.clone())
        }
    }

    /// Snapshot of all committed versions of a key, oldest first
    pub fn history(&self, key: &StateKey) -> Vec<KeyModification> {
        self.versions
            .get(key)
            .map(|versions| versions.value().clone())
            .unwrap_or_default()
    }

    /// Apply a transaction's write set
    ///
    /// Deleting a key that holds no committed value appends nothing.
    ///
    /// # Returns
    ///
    /// The number of versions appended
    pub fn commit(&self, tx: Transaction) -> usize {
        let timestamp = (self.clock)();
        let Transaction { tx_id, writes, .. } = tx;

        let mut appended = 0;
        for (key, value) in writes.into_inner() {
            let is_delete = value.is_none();
            if is_delete && self.current(&key).is_none() {
                continue;
            }

            self.versions
                .entry(key)
                .or_default()
                .push(KeyModification {
                    tx_id: tx_id.clone(),
                    timestamp,
                    value: value.unwrap_or_default(),
                    is_delete,
                });
            appended += 1;
        }

        debug!(tx_id = %tx_id, appended, "committed transaction");
        appended
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Pending writes of one invocation
///
/// Dropping a transaction without committing it discards the writes.
#[derive(Debug)]
pub struct Transaction {
    tx_id: String,
    channel: String,
    writes: RefCell<BTreeMap<StateKey, Option<Vec<u8>>>>,
}

impl Transaction {
    fn new(tx_id: String, channel: &str) -> Self {
        Transaction {
            tx_id,
            channel: channel.to_string(),
            writes: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Read through the write set, falling back to committed state
    pub fn read(&self, ledger: &Ledger, key: &StateKey) -> Option<Vec<u8>> {
        if let Some(pending) = self.writes.borrow().get(key) {
            return pending.clone();
        }
        ledger.current(key)
    }

    pub fn write(&self, key: StateKey, value: Vec<u8>) {
        self.writes.borrow_mut().insert(key, Some(value));
    }

    pub fn delete(&self, key: StateKey) {
        self.writes.borrow_mut().insert(key, None);
    }

    /// Number of keys touched so far
    pub fn pending_writes(&self) -> usize {
        self.writes.borrow().len()
    }
}

/// A transaction seen through one registry's namespace
pub struct ScopedStub<'a> {
    ledger: &'a Ledger,
    tx: &'a Transaction,
    namespace: &'a str,
    router: Option<&'a dyn RegistryRouter>,
}

impl<'a> ScopedStub<'a> {
    /// Stub without access to sibling registries
    pub fn new(ledger: &'a Ledger, tx: &'a Transaction, namespace: &'a str) -> Self {
        ScopedStub {
            ledger,
            tx,
            namespace,
            router: None,
        }
    }

    /// Route nested registry calls through `router`
    pub fn with_router(mut self, router: &'a dyn RegistryRouter) -> Self {
        self.router = Some(router);
        self
    }

    fn state_key(&self, key: &str) -> Result<StateKey, RegistryError> {
        if key.is_empty() {
            return Err(RegistryError::persistence(format!(
                "empty key in namespace {}",
                self.namespace
            )));
        }
        Ok(StateKey::new(self.tx.channel(), self.namespace, key))
    }
}

impl LedgerStub for ScopedStub<'_> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, RegistryError> {
        let key = self.state_key(key)?;
        Ok(self.tx.read(self.ledger, &key))
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), RegistryError> {
        let key = self.state_key(key)?;
        self.tx.write(key, value.to_vec());
        Ok(())
    }

    fn del_state(&self, key: &str) -> Result<(), RegistryError> {
        let key = self.state_key(key)?;
        self.tx.delete(key);
        Ok(())
    }

    fn history_for_key(&self, key: &str) -> Result<HistoryIter, RegistryError> {
        let key = self.state_key(key)?;
        Ok(Box::new(self.ledger.history(&key).into_iter()))
    }

    fn invoke_registry(&self, registry: &str, function: &str, args: &[String]) -> Response {
        match self.router {
            Some(router) => router.route(registry, function, args, self.tx),
            None => Response::error(format!("no route to registry {registry}")),
        }
    }

    fn channel_id(&self) -> &str {
        self.tx.channel()
    }
}

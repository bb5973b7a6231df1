//! Ledger host
//!
//! Wires the three registries to one `Ledger` and runs invocations against
//! it. Each top-level invocation gets its own `Transaction`; nested calls a
//! registry makes into its siblings reuse that transaction and its channel.
//! The host commits the transaction when the top-level response is a
//! success and drops it otherwise.
//!
//! Top-level invocations are serialized by a mutex, so a registry never sees
//! another invocation's half-built write set.

use crate::core::account_registry::AccountRegistry;
use crate::core::card_registry::CardRegistry;
use crate::core::config::LedgerConfig;
use crate::core::ledger::{Ledger, ScopedStub, Transaction};
use crate::core::person_registry::PersonRegistry;
use crate::core::traits::{Registry, RegistryRouter};
use crate::types::{Invocation, Response};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Registry table plus the ledger they share
pub struct LedgerHost {
    ledger: Ledger,
    registries: HashMap<&'static str, Box<dyn Registry>>,
    config: LedgerConfig,
    serial: Mutex<()>,
}

impl LedgerHost {
    /// Host with an empty wall-clock ledger
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_ledger(config, Ledger::new())
    }

    /// Host over a caller-supplied ledger
    pub fn with_ledger(config: LedgerConfig, ledger: Ledger) -> Self {
        let registries: Vec<Box<dyn Registry>> = vec![
            Box::new(PersonRegistry::new(config.legacy_history)),
            Box::new(AccountRegistry::new(config.clone())),
            Box::new(CardRegistry::new(config.legacy_history)),
        ];

        LedgerHost {
            ledger,
            registries: registries
                .into_iter()
                .map(|registry| (registry.name(), registry))
                .collect(),
            config,
            serial: Mutex::new(()),
        }
    }

    /// Run one top-level invocation and commit it if it succeeds
    pub fn invoke(&self, registry: &str, function: &str, args: &[String]) -> Response {
        let _serial = self
            .serial
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let tx = self.ledger.begin(&self.config.channel);
        let response = self.route(registry, function, args, &tx);

        if response.is_ok() {
            self.ledger.commit(tx);
        } else {
            debug!(
                tx_id = tx.tx_id(),
                pending = tx.pending_writes(),
                "discarding failed invocation"
            );
        }
        response
    }

    pub fn invoke_invocation(&self, invocation: &Invocation) -> Response {
        self.invoke(
            &invocation.registry,
            &invocation.function,
            &invocation.args,
        )
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }
}

impl RegistryRouter for LedgerHost {
    fn route(&self, registry: &str, function: &str, args: &[String], tx: &Transaction) -> Response {
        match self.registries.get(registry) {
            Some(target) => {
                let stub = ScopedStub::new(&self.ledger, tx, target.name()).with_router(self);
                target.invoke(function, args, &stub)
            }
            None => Response::error(format!("unknown registry {registry}")),
        }
    }
}

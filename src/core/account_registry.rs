//! Account registry
//!
//! Owns `BankAccount` records keyed by account number. Every account must
//! belong to a registered person, checked through `PersonLookup` before any
//! write. Balance moves go through the transfer engine and balance history
//! through the history reconstructor.

use crate::core::client::RegistryClient;
use crate::core::config::LedgerConfig;
use crate::core::dispatch::{respond, AccountCommand};
use crate::core::history::{balance_deltas, to_payload};
use crate::core::record_store::RecordStore;
use crate::core::traits::{LedgerStub, PersonLookup, Registry};
use crate::core::transfer::execute_transfer;
use crate::core::ACCOUNT_REGISTRY;
use crate::types::{BankAccount, RegistryError, Response, Transfer};
use tracing::{debug, info};

pub struct AccountRegistry {
    config: LedgerConfig,
}

impl AccountRegistry {
    pub fn new(config: LedgerConfig) -> Self {
        AccountRegistry { config }
    }

    /// Run one command against the account namespace
    ///
    /// # Arguments
    ///
    /// * `command` - The parsed command
    /// * `store` - Record access scoped to the account namespace
    /// * `persons` - Person registry capability used by add and update
    pub fn execute(
        &self,
        command: AccountCommand,
        store: &RecordStore,
        persons: &dyn PersonLookup,
    ) -> Result<Option<Vec<u8>>, RegistryError> {
        match command {
            AccountCommand::Add(payload) => {
                let account = BankAccount::parse(payload.as_bytes())?;
                persons.get_person(&account.person_id)?;
                store.insert_new(&account.account_number, payload.as_bytes())?;
                info!(
                    account = %account.account_number,
                    person = %account.person_id,
                    "account added"
                );
                Ok(None)
            }
            AccountCommand::Get(account_number) => {
                debug!(%account_number, "account lookup");
                store.require(&account_number).map(Some)
            }
            AccountCommand::Update(payload) => {
                let account = BankAccount::parse(payload.as_bytes())?;
                persons.get_person(&account.person_id)?;
                store.replace_existing(&account.account_number, payload.as_bytes())?;
                info!(account = %account.account_number, "account updated");
                Ok(None)
            }
            AccountCommand::Delete(account_number) => {
                store.remove(&account_number)?;
                info!(%account_number, "account deleted");
                Ok(None)
            }
            AccountCommand::GetBalance(account_number) => {
                let account = store.load(&account_number, BankAccount::parse)?;
                Ok(Some(account.balance.normalize().to_string().into_bytes()))
            }
            AccountCommand::Transfer(payload) => {
                let transfer = Transfer::parse(&payload)?;
                execute_transfer(store, &transfer, &self.config)?;
                Ok(None)
            }
            AccountCommand::History(account_number) => {
                let versions = store.history(&account_number)?;
                let entries = balance_deltas(versions, self.config.history_epsilon)?;
                to_payload(&entries).map(Some)
            }
        }
    }
}

impl Registry for AccountRegistry {
    fn name(&self) -> &'static str {
        ACCOUNT_REGISTRY
    }

    fn invoke(&self, function: &str, args: &[String], stub: &dyn LedgerStub) -> Response {
        let store = RecordStore::new(stub, "account");
        let persons = RegistryClient::new(stub);
        let result = AccountCommand::parse(ACCOUNT_REGISTRY, function, args)
            .and_then(|command| self.execute(command, &store, &persons));
        respond(ACCOUNT_REGISTRY, function, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::{Ledger, ScopedStub};
    use rust_decimal::Decimal;
    use std::collections::HashSet;

    /// Person lookup backed by a fixed set of passport ids
    struct KnownPersons(HashSet<&'static str>);

    impl PersonLookup for KnownPersons {
        fn get_person(&self, passport_id: &str) -> Result<Vec<u8>, RegistryError> {
            if self.0.contains(passport_id) {
                Ok(b"{}".to_vec())
            } else {
                Err(RegistryError::dependency(
                    "person",
                    passport_id,
                    format!("person with key {passport_id} does not exist"),
                ))
            }
        }
    }

    fn persons() -> KnownPersons {
        KnownPersons(["P1", "P2"].into_iter().collect())
    }

    fn account_json(person: &str, id: &str, balance: &str) -> String {
        format!(r#"{{"person_id":"{person}","account_number":"{id}","balance":{balance}}}"#)
    }

    /// Run a command in its own committed transaction
    fn run(ledger: &Ledger, command: AccountCommand) -> Result<Option<Vec<u8>>, RegistryError> {
        let registry = AccountRegistry::new(LedgerConfig::default());
        let tx = ledger.begin("ch");
        let result = {
            let stub = ScopedStub::new(ledger, &tx, ACCOUNT_REGISTRY);
            let store = RecordStore::new(&stub, "account");
            registry.execute(command, &store, &persons())
        };
        if result.is_ok() {
            ledger.commit(tx);
        }
        result
    }

    fn balance(ledger: &Ledger, id: &str) -> String {
        let payload = run(ledger, AccountCommand::GetBalance(id.to_string()))
            .unwrap()
            .unwrap();
        String::from_utf8(payload).unwrap()
    }

    fn transfer(from: &str, to: &str, value: &str) -> AccountCommand {
        AccountCommand::Transfer(format!(r#"{{"from":"{from}","to":"{to}","value":{value}}}"#))
    }

    fn seeded() -> Ledger {
        let ledger = Ledger::new();
        for (person, id, amount) in [("P1", "A", "100"), ("P2", "B", "20"), ("P1", "0", "0")] {
            run(&ledger, AccountCommand::Add(account_json(person, id, amount))).unwrap();
        }
        ledger
    }

    #[test]
    fn test_add_requires_known_person() {
        let ledger = Ledger::new();

        let result = run(&ledger, AccountCommand::Add(account_json("P9", "A", "1")));

        assert!(matches!(result, Err(RegistryError::Dependency { .. })));
        assert!(run(&ledger, AccountCommand::Get("A".to_string())).is_err());
    }

    #[test]
    fn test_add_rejects_duplicate_account() {
        let ledger = seeded();
        assert_eq!(
            run(&ledger, AccountCommand::Add(account_json("P1", "A", "5"))),
            Err(RegistryError::duplicate_key("account", "A"))
        );
    }

    #[test]
    fn test_get_balance_returns_balance_only() {
        let ledger = seeded();
        assert_eq!(balance(&ledger, "A"), "100");
    }

    #[test]
    fn test_transfer_moves_funds() {
        let ledger = seeded();

        run(&ledger, transfer("A", "B", "30.5")).unwrap();

        assert_eq!(balance(&ledger, "A"), "69.5");
        assert_eq!(balance(&ledger, "B"), "50.5");
    }

    #[test]
    fn test_balance_and_transfer_keep_every_digit() {
        let ledger = seeded();
        run(&ledger, AccountCommand::Add(account_json("P1", "C", "1234567890.123456789"))).unwrap();
        assert_eq!(balance(&ledger, "C"), "1234567890.123456789");

        run(&ledger, transfer("C", "B", "0.000000001")).unwrap();

        assert_eq!(balance(&ledger, "C"), "1234567890.123456788");
        assert_eq!(balance(&ledger, "B"), "20.000000001");
    }

    #[test]
    fn test_insufficient_transfer_leaves_both_accounts_unchanged() {
        let ledger = seeded();

        let result = run(&ledger, transfer("A", "B", "150"));

        assert_eq!(
            result,
            Err(RegistryError::insufficient_balance(
                "A",
                Decimal::from(100),
                Decimal::from(150)
            ))
        );
        assert_eq!(balance(&ledger, "A"), "100");
        assert_eq!(balance(&ledger, "B"), "20");
    }

    #[test]
    fn test_issuance_account_may_go_negative() {
        let ledger = seeded();

        run(&ledger, transfer("0", "B", "1000000")).unwrap();

        assert_eq!(balance(&ledger, "0"), "-1000000");
        assert_eq!(balance(&ledger, "B"), "1000020");
    }

    #[test]
    fn test_update_rechecks_person() {
        let ledger = seeded();

        let result = run(&ledger, AccountCommand::Update(account_json("P9", "A", "1")));
        assert!(matches!(result, Err(RegistryError::Dependency { .. })));

        run(&ledger, AccountCommand::Update(account_json("P2", "A", "7"))).unwrap();
        assert_eq!(balance(&ledger, "A"), "7");
    }

    #[test]
    fn test_delete_missing_account_is_not_found() {
        let ledger = seeded();
        assert_eq!(
            run(&ledger, AccountCommand::Delete("Z".to_string())),
            Err(RegistryError::not_found("account", "Z"))
        );
    }

    #[test]
    fn test_history_reports_transfers() {
        let ledger = seeded();
        run(&ledger, transfer("A", "B", "40")).unwrap();
        run(&ledger, transfer("B", "A", "10")).unwrap();

        let payload = run(&ledger, AccountCommand::History("A".to_string()))
            .unwrap()
            .unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_slice(&payload).unwrap();

        let deltas: Vec<f64> = entries
            .iter()
            .map(|entry| entry["delta"].as_f64().unwrap())
            .collect();
        assert_eq!(deltas, vec![100.0, -40.0, 10.0]);
    }

    #[test]
    fn test_invoke_without_person_registry_is_dependency_error() {
        let ledger = Ledger::new();
        let tx = ledger.begin("ch");
        let stub = ScopedStub::new(&ledger, &tx, ACCOUNT_REGISTRY);

        let response = AccountRegistry::new(LedgerConfig::default()).invoke(
            "addAccount",
            &[account_json("P1", "A", "1")],
            &stub,
        );

        assert!(response
            .message
            .starts_with("Dependency check against registry person failed for P1"));
    }
}

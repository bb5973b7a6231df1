//! Transfer engine
//!
//! Moves funds between two stored accounts. The balance rule is applied to
//! in-memory records first (`apply_transfer`); only then are both records
//! written back. Both writes land in the invocation's write set, so the host
//! commits them together or not at all.

use crate::core::config::LedgerConfig;
use crate::core::record_store::RecordStore;
use crate::types::{BankAccount, RegistryError, Transfer};
use rust_decimal::Decimal;
use tracing::info;

/// Move `value` from `source` to `destination`
///
/// Only `source` may be exempt from the non-negative balance rule, and only
/// when `issuance` is set. Records are left untouched on error.
///
/// # Errors
///
/// Returns an error if:
/// - The source would go below zero and is not an issuance account
/// - Either balance overflows
pub fn apply_transfer(
    source: &mut BankAccount,
    destination: &mut BankAccount,
    value: Decimal,
    issuance: bool,
) -> Result<(), RegistryError> {
    let new_source = source
        .balance
        .checked_sub(value)
        .ok_or_else(|| RegistryError::arithmetic_overflow("transfer", &source.account_number))?;

    if new_source.is_sign_negative() && !new_source.is_zero() && !issuance {
        return Err(RegistryError::insufficient_balance(
            &source.account_number,
            source.balance,
            value,
        ));
    }

    let new_destination = destination
        .balance
        .checked_add(value)
        .ok_or_else(|| {
            RegistryError::arithmetic_overflow("transfer", &destination.account_number)
        })?;

    source.balance = new_source;
    destination.balance = new_destination;
    Ok(())
}

/// Run a transfer against the account namespace
///
/// Reads both accounts, applies the balance rule and writes both back. Both
/// writes are attempted even if the first one fails.
///
/// # Errors
///
/// Returns an error if:
/// - Either account does not exist
/// - A stored account is unreadable
/// - The balance rule rejects the transfer
/// - Either write fails (`RegistryError::Persistence`)
pub fn execute_transfer(
    store: &RecordStore,
    transfer: &Transfer,
    config: &LedgerConfig,
) -> Result<(), RegistryError> {
    let mut source = store.load(&transfer.from, BankAccount::parse)?;
    let mut destination = store.load(&transfer.to, BankAccount::parse)?;
    let issuance = config.is_issuance_account(&source.account_number);

    apply_transfer(&mut source, &mut destination, transfer.value, issuance)?;

    let source_write = store.save(&transfer.from, &source);
    let destination_write = store.save(&transfer.to, &destination);
    source_write.and(destination_write).map_err(as_persistence)?;

    info!(
        from = %transfer.from,
        to = %transfer.to,
        value = %transfer.value,
        "transfer applied"
    );
    Ok(())
}

fn as_persistence(error: RegistryError) -> RegistryError {
    match error {
        RegistryError::Persistence { .. } => error,
        other => RegistryError::persistence(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::{Ledger, ScopedStub};
    use crate::core::traits::{HistoryIter, LedgerStub};
    use crate::types::Response;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn account(id: &str, balance: i64) -> BankAccount {
        BankAccount::new("P1", id, Decimal::from(balance))
    }

    #[rstest]
    #[case::plain(100, 30, false, Some((70, 30)))]
    #[case::drain_to_zero(100, 100, false, Some((0, 100)))]
    #[case::insufficient(100, 150, false, None)]
    #[case::issuance_goes_negative(0, 500, true, Some((-500, 500)))]
    #[case::zero_value(10, 0, false, Some((10, 0)))]
    fn test_apply_transfer(
        #[case] source_balance: i64,
        #[case] value: i64,
        #[case] issuance: bool,
        #[case] expected: Option<(i64, i64)>,
    ) {
        let mut source = account("A", source_balance);
        let mut destination = account("B", 0);

        let result = apply_transfer(&mut source, &mut destination, Decimal::from(value), issuance);

        match expected {
            Some((source_after, destination_after)) => {
                assert!(result.is_ok());
                assert_eq!(source.balance, Decimal::from(source_after));
                assert_eq!(destination.balance, Decimal::from(destination_after));
            }
            None => {
                assert_eq!(
                    result,
                    Err(RegistryError::insufficient_balance(
                        "A",
                        Decimal::from(source_balance),
                        Decimal::from(value)
                    ))
                );
                assert_eq!(source.balance, Decimal::from(source_balance));
                assert_eq!(destination.balance, Decimal::ZERO);
            }
        }
    }

    #[test]
    fn test_apply_transfer_overflow_leaves_records_untouched() {
        let mut source = account("0", 0);
        let mut destination = BankAccount::new("P1", "B", Decimal::MAX);

        let result = apply_transfer(&mut source, &mut destination, Decimal::ONE, true);

        assert_eq!(result, Err(RegistryError::arithmetic_overflow("transfer", "B")));
        assert_eq!(source.balance, Decimal::ZERO);
    }

    #[test]
    fn test_execute_transfer_conserves_total() {
        let ledger = Ledger::new();
        let tx = ledger.begin("ch");
        let stub = ScopedStub::new(&ledger, &tx, "account");
        let store = RecordStore::new(&stub, "account");
        store.save("A", &account("A", 100)).unwrap();
        store.save("B", &account("B", 5)).unwrap();

        let transfer = Transfer {
            from: "A".to_string(),
            to: "B".to_string(),
            value: Decimal::new(255, 1),
        };
        execute_transfer(&store, &transfer, &LedgerConfig::default()).unwrap();

        let a = store.load("A", BankAccount::parse).unwrap();
        let b = store.load("B", BankAccount::parse).unwrap();
        assert_eq!(a.balance, Decimal::new(745, 1));
        assert_eq!(b.balance, Decimal::new(305, 1));
        assert_eq!(a.balance + b.balance, Decimal::from(105));
    }

    #[rstest]
    #[case::issuance_source("0", Ok("-50"))]
    #[case::regular_source("A", Err(()))]
    fn test_execute_transfer_checks_issuance_set(
        #[case] source: &str,
        #[case] expected: Result<&str, ()>,
    ) {
        let ledger = Ledger::new();
        let tx = ledger.begin("ch");
        let stub = ScopedStub::new(&ledger, &tx, "account");
        let store = RecordStore::new(&stub, "account");
        store.save(source, &account(source, 0)).unwrap();
        store.save("B", &account("B", 0)).unwrap();

        let transfer = Transfer {
            from: source.to_string(),
            to: "B".to_string(),
            value: Decimal::from(50),
        };
        let result = execute_transfer(&store, &transfer, &LedgerConfig::default());

        match expected {
            Ok(balance) => {
                assert!(result.is_ok());
                let after = store.load(source, BankAccount::parse).unwrap();
                assert_eq!(after.balance.to_string(), balance);
            }
            Err(()) => assert!(matches!(
                result,
                Err(RegistryError::InsufficientBalance { .. })
            )),
        }
    }

    #[test]
    fn test_execute_transfer_keeps_full_precision() {
        let ledger = Ledger::new();
        let tx = ledger.begin("ch");
        let stub = ScopedStub::new(&ledger, &tx, "account");
        let store = RecordStore::new(&stub, "account");
        store
            .put("A", br#"{"person_id":"P1","account_number":"A","balance":1234567890.123456789}"#)
            .unwrap();
        store.save("B", &account("B", 0)).unwrap();

        let transfer = Transfer::parse(r#"{"from":"A","to":"B","value":0.000000001}"#).unwrap();
        execute_transfer(&store, &transfer, &LedgerConfig::default()).unwrap();

        let a = store.load("A", BankAccount::parse).unwrap();
        let b = store.load("B", BankAccount::parse).unwrap();
        assert_eq!(a.balance.to_string(), "1234567890.123456788");
        assert_eq!(b.balance.to_string(), "0.000000001");
        assert_eq!(
            (a.balance + b.balance).to_string(),
            "1234567890.123456789"
        );
    }

    #[test]
    fn test_execute_transfer_missing_destination() {
        let ledger = Ledger::new();
        let tx = ledger.begin("ch");
        let stub = ScopedStub::new(&ledger, &tx, "account");
        let store = RecordStore::new(&stub, "account");
        store.save("A", &account("A", 100)).unwrap();

        let transfer = Transfer {
            from: "A".to_string(),
            to: "B".to_string(),
            value: Decimal::ONE,
        };

        assert_eq!(
            execute_transfer(&store, &transfer, &LedgerConfig::default()),
            Err(RegistryError::not_found("account", "B"))
        );
    }

    /// Stub whose writes to one key always fail
    struct FailingWrites {
        records: RefCell<HashMap<String, Vec<u8>>>,
        failing_key: &'static str,
        attempted: RefCell<Vec<String>>,
    }

    impl LedgerStub for FailingWrites {
        fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, RegistryError> {
            Ok(self.records.borrow().get(key).cloned())
        }

        fn put_state(&self, key: &str, value: &[u8]) -> Result<(), RegistryError> {
            self.attempted.borrow_mut().push(key.to_string());
            if key == self.failing_key {
                return Err(RegistryError::validation("disk full"));
            }
            self.records
                .borrow_mut()
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        fn del_state(&self, _key: &str) -> Result<(), RegistryError> {
            Ok(())
        }

        fn history_for_key(&self, _key: &str) -> Result<HistoryIter, RegistryError> {
            Ok(Box::new(std::iter::empty()))
        }

        fn invoke_registry(&self, registry: &str, _function: &str, _args: &[String]) -> Response {
            Response::error(format!("no route to registry {registry}"))
        }

        fn channel_id(&self) -> &str {
            "ch"
        }
    }

    #[test]
    fn test_failed_write_is_persistence_error_and_both_writes_attempted() {
        let mut records = HashMap::new();
        for (id, balance) in [("A", 100), ("B", 0)] {
            records.insert(id.to_string(), serde_json::to_vec(&account(id, balance)).unwrap());
        }
        let stub = FailingWrites {
            records: RefCell::new(records),
            failing_key: "A",
            attempted: RefCell::new(Vec::new()),
        };
        let store = RecordStore::new(&stub, "account");
        let transfer = Transfer {
            from: "A".to_string(),
            to: "B".to_string(),
            value: Decimal::TEN,
        };

        let result = execute_transfer(&store, &transfer, &LedgerConfig::default());

        assert!(matches!(result, Err(RegistryError::Persistence { .. })));
        assert_eq!(*stub.attempted.borrow(), vec!["A".to_string(), "B".to_string()]);
    }
}

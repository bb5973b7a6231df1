//! Bank account and transfer types
//!
//! Balances are `Decimal` in memory and plain JSON numbers on the wire. The
//! number text is read and written digit for digit
//! (`rust_decimal::serde::arbitrary_precision`), never through `f64`.

use super::error::RegistryError;
use super::person::PassportId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account identifier, the key of a bank account record
pub type AccountId = String;

/// A bank account owned by a registered person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Passport id of the owning person
    pub person_id: PassportId,

    /// The account identifier (record key)
    pub account_number: AccountId,

    /// Current balance
    ///
    /// Only issuance accounts may hold a negative balance.
    #[serde(with = "rust_decimal::serde::arbitrary_precision", default)]
    pub balance: Decimal,
}

impl BankAccount {
    /// Create an account record
    pub fn new(person_id: &str, account_number: &str, balance: Decimal) -> Self {
        BankAccount {
            person_id: person_id.to_string(),
            account_number: account_number.to_string(),
            balance,
        }
    }

    /// Parse and validate a serialized account
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` if the payload does not parse or
    /// either identifier is blank.
    pub fn parse(payload: &[u8]) -> Result<Self, RegistryError> {
        let account: BankAccount = serde_json::from_slice(payload)?;
        if account.account_number.trim().is_empty() {
            return Err(RegistryError::validation("account_number must not be empty"));
        }
        if account.person_id.trim().is_empty() {
            return Err(RegistryError::validation("person_id must not be empty"));
        }
        Ok(account)
    }
}

/// A request to move funds between two accounts
///
/// Transfers are never persisted; they only drive the two account writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    /// Source account id
    pub from: AccountId,

    /// Destination account id
    pub to: AccountId,

    /// Amount to move, must be non-negative
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub value: Decimal,
}

impl Transfer {
    /// Parse and validate a serialized transfer request
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` if the payload does not parse, the
    /// value is negative, or source and destination are the same account.
    pub fn parse(payload: &str) -> Result<Self, RegistryError> {
        let transfer: Transfer = serde_json::from_str(payload)?;
        if transfer.value.is_sign_negative() && !transfer.value.is_zero() {
            return Err(RegistryError::validation(format!(
                "transfer value must not be negative, got {}",
                transfer.value
            )));
        }
        if transfer.from == transfer.to {
            return Err(RegistryError::validation(format!(
                "transfer source and destination must differ, got {} twice",
                transfer.from
            )));
        }
        Ok(transfer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_account_balance_reads_json_numbers() {
        let account =
            BankAccount::parse(br#"{"person_id":"P1","account_number":"A1","balance":100.25}"#)
                .unwrap();

        assert_eq!(account.balance, Decimal::new(10025, 2));
    }

    #[test]
    fn test_account_balance_keeps_every_digit() {
        let payload = br#"{"person_id":"P1","account_number":"A1","balance":1234567890.123456789}"#;
        let account = BankAccount::parse(payload).unwrap();

        assert_eq!(account.balance.to_string(), "1234567890.123456789");
        assert_eq!(serde_json::to_vec(&account).unwrap(), payload.to_vec());
    }

    #[test]
    fn test_account_balance_defaults_to_zero() {
        let account = BankAccount::parse(br#"{"person_id":"P1","account_number":"A1"}"#).unwrap();
        assert_eq!(account.balance, Decimal::ZERO);
    }

    #[test]
    fn test_account_serializes_balance_as_number() {
        let account = BankAccount::new("P1", "A1", Decimal::new(505, 1));
        let json = serde_json::to_string(&account).unwrap();
        assert_eq!(
            json,
            r#"{"person_id":"P1","account_number":"A1","balance":50.5}"#
        );
    }

    #[rstest]
    #[case::blank_account(r#"{"person_id":"P1","account_number":"","balance":1}"#)]
    #[case::blank_person(r#"{"person_id":"","account_number":"A1","balance":1}"#)]
    #[case::not_json("account A1")]
    fn test_account_parse_errors(#[case] payload: &str) {
        let result = BankAccount::parse(payload.as_bytes());
        assert!(matches!(result, Err(RegistryError::Validation { .. })));
    }

    #[rstest]
    #[case::negative(r#"{"from":"A","to":"B","value":-1}"#)]
    #[case::same_account(r#"{"from":"A","to":"A","value":1}"#)]
    #[case::missing_value(r#"{"from":"A","to":"B"}"#)]
    fn test_transfer_parse_errors(#[case] payload: &str) {
        let result = Transfer::parse(payload);
        assert!(matches!(result, Err(RegistryError::Validation { .. })));
    }

    #[test]
    fn test_transfer_parse_accepts_zero() {
        let transfer = Transfer::parse(r#"{"from":"A","to":"B","value":0}"#).unwrap();
        assert_eq!(transfer.value, Decimal::ZERO);
    }
}

//! Error types for the ledger registries
//!
//! Every registry handler returns either a success payload or one of these
//! errors. Errors are terminal for the invocation that raised them: the
//! dispatcher folds them into a failure response carrying the display
//! message, and the host discards the invocation's pending writes.
//!
//! # Error Categories
//!
//! - **Validation**: malformed payloads, wrong argument counts, invalid transfer values
//! - **Key errors**: duplicate keys on create, missing keys on read/update/delete
//! - **Cross-registry errors**: failed dependency lookups, ownership mismatches
//! - **Balance errors**: insufficient balance, arithmetic overflow
//! - **Persistence**: substrate read/write failures and corrupt stored records

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for registry invocations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// Malformed input or wrong argument count
    #[error("Validation failed: {message}")]
    Validation {
        /// Description of what was rejected
        message: String,
    },

    /// Create on a key that already holds a record
    #[error("{entity} with key {key} already exists")]
    DuplicateKey {
        /// Entity kind stored under the key (person, account, card)
        entity: String,
        /// The conflicting key
        key: String,
    },

    /// Read, update or delete on an absent key
    #[error("{entity} with key {key} does not exist")]
    NotFound {
        /// Entity kind looked up
        entity: String,
        /// The missing key
        key: String,
    },

    /// A required cross-registry existence check failed or came back empty
    ///
    /// Transport failures and explicit rejections by the callee are not
    /// distinguished.
    #[error("Dependency check against registry {registry} failed for {key}: {message}")]
    Dependency {
        /// Registry that was queried
        registry: String,
        /// Key that was looked up
        key: String,
        /// Callee message, or a note that the payload was empty
        message: String,
    },

    /// A card was linked to an account owned by somebody else
    #[error("Ownership mismatch: account {account} belongs to person {owner}, not {claimant}")]
    Ownership {
        /// The linked account
        account: String,
        /// Person that owns the account
        owner: String,
        /// Person named on the card
        claimant: String,
    },

    /// Transfer would take a non-issuance account below zero
    #[error("Insufficient balance on account {account}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// Source account
        account: String,
        /// Balance before the transfer
        balance: Decimal,
        /// Transfer value
        requested: Decimal,
    },

    /// Checked decimal arithmetic overflowed
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account being updated
        account: String,
    },

    /// Substrate read/write failure or an unreadable stored record
    #[error("Persistence failure: {message}")]
    Persistence {
        /// Description of the failure
        message: String,
    },

    /// The dispatcher has no handler for the requested function name
    #[error("unknown function name for chaincode {registry}")]
    UnknownFunction {
        /// Registry that received the invocation
        registry: String,
    },
}

impl From<serde_json::Error> for RegistryError {
    fn from(error: serde_json::Error) -> Self {
        RegistryError::Validation {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl RegistryError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        RegistryError::Validation {
            message: message.into(),
        }
    }

    /// Create a Validation error for a function invoked with the wrong number of arguments
    pub fn wrong_argument_count(function: &str, expected: usize, actual: usize) -> Self {
        RegistryError::Validation {
            message: format!("{function} expects {expected} argument(s), got {actual}"),
        }
    }

    /// Create a DuplicateKey error
    pub fn duplicate_key(entity: &str, key: &str) -> Self {
        RegistryError::DuplicateKey {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(entity: &str, key: &str) -> Self {
        RegistryError::NotFound {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    /// Create a Dependency error
    pub fn dependency(registry: &str, key: &str, message: impl Into<String>) -> Self {
        RegistryError::Dependency {
            registry: registry.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Create an Ownership error
    pub fn ownership(account: &str, owner: &str, claimant: &str) -> Self {
        RegistryError::Ownership {
            account: account.to_string(),
            owner: owner.to_string(),
            claimant: claimant.to_string(),
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(account: &str, balance: Decimal, requested: Decimal) -> Self {
        RegistryError::InsufficientBalance {
            account: account.to_string(),
            balance,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        RegistryError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }

    /// Create a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        RegistryError::Persistence {
            message: message.into(),
        }
    }

    /// Create an UnknownFunction error
    pub fn unknown_function(registry: &str) -> Self {
        RegistryError::UnknownFunction {
            registry: registry.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::validation(
        RegistryError::Validation { message: "bad payload".to_string() },
        "Validation failed: bad payload"
    )]
    #[case::duplicate_key(
        RegistryError::DuplicateKey { entity: "person".to_string(), key: "P1".to_string() },
        "person with key P1 already exists"
    )]
    #[case::not_found(
        RegistryError::NotFound { entity: "account".to_string(), key: "A1".to_string() },
        "account with key A1 does not exist"
    )]
    #[case::dependency(
        RegistryError::Dependency { registry: "person".to_string(), key: "P9".to_string(), message: "empty payload".to_string() },
        "Dependency check against registry person failed for P9: empty payload"
    )]
    #[case::ownership(
        RegistryError::Ownership { account: "A1".to_string(), owner: "P1".to_string(), claimant: "P2".to_string() },
        "Ownership mismatch: account A1 belongs to person P1, not P2"
    )]
    #[case::insufficient_balance(
        RegistryError::InsufficientBalance { account: "A1".to_string(), balance: Decimal::new(100, 0), requested: Decimal::new(150, 0) },
        "Insufficient balance on account A1: balance 100, requested 150"
    )]
    #[case::persistence(
        RegistryError::Persistence { message: "disk full".to_string() },
        "Persistence failure: disk full"
    )]
    #[case::unknown_function(
        RegistryError::UnknownFunction { registry: "person".to_string() },
        "unknown function name for chaincode person"
    )]
    fn test_error_display(#[case] error: RegistryError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::duplicate_key(
        RegistryError::duplicate_key("card", "4111"),
        RegistryError::DuplicateKey { entity: "card".to_string(), key: "4111".to_string() }
    )]
    #[case::ownership(
        RegistryError::ownership("A1", "P1", "P2"),
        RegistryError::Ownership { account: "A1".to_string(), owner: "P1".to_string(), claimant: "P2".to_string() }
    )]
    #[case::wrong_argument_count(
        RegistryError::wrong_argument_count("getPerson", 1, 3),
        RegistryError::Validation { message: "getPerson expects 1 argument(s), got 3".to_string() }
    )]
    fn test_helper_functions(#[case] result: RegistryError, #[case] expected: RegistryError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: RegistryError = json_error.into();
        assert!(matches!(error, RegistryError::Validation { .. }));
    }
}

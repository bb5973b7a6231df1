//! Ledger configuration
//!
//! Holds the knobs shared by the registries and the host. Invalid values
//! fall back to defaults with a warning instead of failing startup.

use rust_decimal::Decimal;
use tracing::warn;

/// Registry and host settings
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerConfig {
    /// Channel every top-level invocation runs on
    pub channel: String,

    /// Accounts allowed to go below zero (money issuance)
    pub issuance_accounts: Vec<String>,

    /// Balance changes at or below this size are treated as noise in history
    pub history_epsilon: Decimal,

    /// Return person and card history in the concatenated legacy format
    pub legacy_history: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            channel: "ledger".to_string(),
            issuance_accounts: vec!["0".to_string()],
            history_epsilon: Decimal::new(1, 4),
            legacy_history: false,
        }
    }
}

impl LedgerConfig {
    /// Create a LedgerConfig with custom values
    pub fn new(
        channel: String,
        issuance_accounts: Vec<String>,
        history_epsilon: Decimal,
        legacy_history: bool,
    ) -> Self {
        let default = Self::default();

        let channel = if channel.trim().is_empty() {
            warn!(default = %default.channel, "Empty channel name, using default");
            default.channel
        } else {
            channel
        };

        let history_epsilon = if history_epsilon.is_sign_negative() {
            warn!(
                epsilon = %history_epsilon,
                default = %default.history_epsilon,
                "Negative history epsilon, using default"
            );
            default.history_epsilon
        } else {
            history_epsilon
        };

        let issuance_accounts: Vec<String> = issuance_accounts
            .into_iter()
            .filter(|account| !account.trim().is_empty())
            .collect();

        Self {
            channel,
            issuance_accounts,
            history_epsilon,
            legacy_history,
        }
    }

    /// Whether `account` may hold a negative balance
    pub fn is_issuance_account(&self, account: &str) -> bool {
        self.issuance_accounts.iter().any(|id| id == account)
    }
}

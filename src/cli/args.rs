use crate::core::LedgerConfig;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Run registry invocation scripts against an in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "ledger-registries")]
#[command(about = "Run person, account and card registry invocations from a CSV script", long_about = None)]
pub struct CliArgs {
    /// Input CSV file with `registry,function,args` rows
    #[arg(value_name = "INPUT", help = "Path to the invocation script")]
    pub input_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Channel the invocations run on
    #[arg(long = "channel", value_name = "NAME", help = "Ledger channel (default: ledger)")]
    pub channel: Option<String>,

    /// Accounts exempt from the non-negative balance rule
    #[arg(
        long = "issuance-account",
        value_name = "ACCOUNT",
        help = "Issuance account id, repeatable (default: 0)"
    )]
    pub issuance_accounts: Vec<String>,

    /// Balance history noise threshold
    #[arg(
        long = "epsilon",
        value_name = "EPSILON",
        allow_negative_numbers = true,
        help = "Smallest balance change reported by account history (default: 0.0001)"
    )]
    pub epsilon: Option<Decimal>,

    /// Use the concatenated history format for persons and cards
    #[arg(long = "legacy-history", help = "Return person and card history as one concatenated string")]
    pub legacy_history: bool,

    /// Number of script rows per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of script rows per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Runtime worker threads (async mode only)
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,
}

/// Available processing strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Build the ledger configuration, filling unset options with defaults
    pub fn to_ledger_config(&self) -> LedgerConfig {
        let default = LedgerConfig::default();
        let issuance_accounts = if self.issuance_accounts.is_empty() {
            default.issuance_accounts
        } else {
            self.issuance_accounts.clone()
        };

        LedgerConfig::new(
            self.channel.clone().unwrap_or(default.channel),
            issuance_accounts,
            self.epsilon.unwrap_or(default.history_epsilon),
            self.legacy_history,
        )
    }

    /// Create a BatchConfig from CLI arguments
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.worker_threads.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.worker_threads.unwrap_or(default.worker_threads),
            )
        } else {
            BatchConfig::default()
        }
    }
}

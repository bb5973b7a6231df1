//! Ledger registries CLI
//!
//! Runs an invocation script against a fresh in-memory ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- script.csv > outcomes.csv
//! cargo run -- --strategy sync script.csv > outcomes.csv
//! cargo run -- --strategy async --batch-size 2000 --worker-threads 8 script.csv > outcomes.csv
//! cargo run -- --issuance-account 0 --issuance-account mint --legacy-history script.csv
//! ```
//!
//! Each script row is `registry,function,args...`; each output row is
//! `line,registry,function,status,payload`. Logs go to stderr (`RUST_LOG`).
//!
//! # Exit Codes
//!
//! - 0: Success (rejected invocations included)
//! - 1: Error (missing arguments, unreadable script, output failure)

use ledger_registries::cli;
use ledger_registries::strategy;
use std::process;
use tracing::error;

fn main() {
    cli::init_tracing();
    let args = cli::parse_args();

    let strategy = {
        let batch = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), args.to_ledger_config(), batch)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!(error = %e, "processing failed");
        process::exit(1);
    }
}

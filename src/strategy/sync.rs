//! Synchronous processing strategy
//!
//! Runs an invocation script on the calling thread: `SyncReader` streams
//! rows, a fresh `LedgerHost` executes them in file order, and each outcome
//! is written as soon as it is known.
//!
//! Malformed rows are logged and skipped; rejected invocations are not
//! errors of the strategy, they become `ERROR` rows in the output.

use crate::core::{LedgerConfig, LedgerHost};
use crate::io::script_format::{InvocationOutcome, OutcomeWriter};
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// ```no_run
/// use ledger_registries::core::LedgerConfig;
/// use ledger_registries::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let strategy = SyncProcessingStrategy::new(LedgerConfig::default());
/// let mut output = std::io::stdout();
/// strategy.process(Path::new("script.csv"), &mut output).expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    config: LedgerConfig,
}

impl SyncProcessingStrategy {
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let host = LedgerHost::new(self.config.clone());
        let reader = SyncReader::new(input_path)?;
        let mut writer = OutcomeWriter::new(output)?;

        let mut executed = 0usize;
        for result in reader {
            match result {
                Ok(row) => {
                    let response = host.invoke_invocation(&row.invocation);
                    writer.write(&InvocationOutcome::new(&row, &response))?;
                    executed += 1;
                }
                Err(e) => warn!(error = %e, "skipping script row"),
            }
        }

        info!(executed, "script finished");
        writer.finish()
    }
}

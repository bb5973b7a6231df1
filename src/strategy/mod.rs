//! Processing strategy module for invocation scripts
//!
//! A strategy is a complete pipeline: read a script, run every invocation
//! against a fresh ledger, write one outcome row per invocation. Synchronous
//! and asynchronous implementations are selected at runtime.

use crate::cli::StrategyType;
use crate::core::LedgerConfig;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete script pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Run the script at `input_path` and write outcomes to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - Output cannot be written
    /// - The async runtime fails
    ///
    /// Malformed rows and rejected invocations are not errors: the former are
    /// logged and skipped, the latter are written as `ERROR` rows.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `batch` is only used by the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    ledger: LedgerConfig,
    batch: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(ledger)),
        StrategyType::Async => {
            Box::new(AsyncProcessingStrategy::new(ledger, batch.unwrap_or_default()))
        }
    }
}

//! Asynchronous batch processing strategy
//!
//! Splits script processing into a reader and an executor:
//!
//! ```text
//! reader task ── AsyncReader batches ──▶ bounded mpsc ──▶ spawn_blocking(LedgerHost)
//!                                                              │
//!                                                   outcomes in script order
//! ```
//!
//! Reading the next batch overlaps with executing the current one. Batches
//! execute one at a time and rows inside a batch in order, so the output is
//! identical to the synchronous strategy.

use crate::core::{LedgerConfig, LedgerHost};
use crate::io::async_reader::AsyncReader;
use crate::io::script_format::{InvocationOutcome, OutcomeWriter, ScriptRow};
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of script rows per batch
    pub batch_size: usize,
    /// Worker threads of the tokio runtime
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    pub fn new(batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(batch_size, default = default.batch_size, "Invalid batch_size, using default");
            default.batch_size
        } else {
            batch_size
        };

        let worker_threads = if worker_threads == 0 {
            warn!(
                worker_threads,
                default = default.worker_threads,
                "Invalid worker_threads, using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            batch_size,
            worker_threads,
        }
    }
}

/// Batches kept in flight between the reader task and the executor
const CHANNEL_CAPACITY: usize = 4;

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    ledger: LedgerConfig,
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(ledger: LedgerConfig, config: BatchConfig) -> Self {
        Self { ledger, config }
    }
}

fn execute_batch(host: &LedgerHost, batch: Vec<ScriptRow>) -> Vec<InvocationOutcome> {
    batch
        .iter()
        .map(|row| InvocationOutcome::new(row, &host.invoke_invocation(&row.invocation)))
        .collect()
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let host = Arc::new(LedgerHost::new(self.ledger.clone()));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let (sender, mut receiver) = mpsc::channel::<Vec<ScriptRow>>(CHANNEL_CAPACITY);
            let batch_size = self.config.batch_size;
            let reader_task = tokio::spawn(async move {
                loop {
                    let batch = reader.read_batch(batch_size).await;
                    if batch.is_empty() {
                        break;
                    }
                    if sender.send(batch).await.is_err() {
                        break;
                    }
                }
            });

            let mut writer = OutcomeWriter::new(output)?;
            let mut executed = 0usize;
            while let Some(batch) = receiver.recv().await {
                debug!(rows = batch.len(), "executing batch");
                let worker_host = Arc::clone(&host);
                let outcomes = tokio::task::spawn_blocking(move || execute_batch(&worker_host, batch))
                    .await
                    .map_err(|e| format!("Batch execution failed: {}", e))?;

                for outcome in &outcomes {
                    writer.write(outcome)?;
                }
                executed += outcomes.len();
            }

            reader_task
                .await
                .map_err(|e| format!("Script reader failed: {}", e))?;

            info!(executed, "script finished");
            writer.finish()
        })
    }
}

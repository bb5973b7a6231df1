//! Asynchronous script reader with batch interface
//!
//! Reads invocation rows with `csv-async` and hands them out in batches.
//! Malformed rows are logged and skipped; they still consume a row number,
//! so batches number rows exactly like `SyncReader`.
//!
//! ```text
//! tokio File → compat → csv_async::AsyncReader → Vec<ScriptRow>
//! ```

use crate::io::script_format::{convert_script_fields, ScriptRow};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV script reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
    line_num: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_reader(reader);

        Self {
            csv_reader,
            line_num: 0,
        }
    }

    /// Read up to `batch_size` valid rows
    ///
    /// Returns an empty vector at end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<ScriptRow> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.records();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(record)) => {
                    self.line_num += 1;
                    match convert_script_fields(record.iter()) {
                        Ok(invocation) => batch.push(ScriptRow {
                            line: self.line_num,
                            invocation,
                        }),
                        Err(e) => warn!(line = self.line_num, error = %e, "skipping script row"),
                    }
                }
                Some(Err(e)) => {
                    self.line_num += 1;
                    warn!(line = self.line_num, error = %e, "CSV parse error");
                }
                None => break,
            }
        }

        batch
    }
}

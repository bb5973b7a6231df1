//! Synchronous script reader with iterator interface
//!
//! Streams invocation rows from a CSV script one record at a time. Rows
//! carry their 1-based position after the header so outcomes can be matched
//! back to the script; malformed rows still consume a row number.
//!
//! ```no_run
//! use ledger_registries::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("script.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(row) => println!("{} {}", row.line, row.invocation.function),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

use crate::io::script_format::{convert_script_fields, ScriptRow};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV script reader
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    record: StringRecord,
    line_num: usize,
}

impl SyncReader {
    /// Open a script file
    ///
    /// Fields are trimmed and rows may have any number of arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            record: StringRecord::new(),
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<ScriptRow, String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                self.line_num += 1;
                let line = self.line_num;
                Some(
                    convert_script_fields(self.record.iter())
                        .map(|invocation| ScriptRow { line, invocation })
                        .map_err(|e| format!("Line {}: {}", line, e)),
                )
            }
            Err(e) => {
                self.line_num += 1;
                Some(Err(format!("Line {}: CSV parse error: {}", self.line_num, e)))
            }
        }
    }
}

//! I/O module
//!
//! Handles invocation scripts in and outcome rows out.
//!
//! # Components
//!
//! - `script_format` - Row conversion and outcome serialization
//! - `sync_reader` - Synchronous script reader with iterator interface
//! - `async_reader` - Asynchronous script reader with batch reading interface

pub mod async_reader;
pub mod script_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use script_format::{
    convert_script_fields, write_outcomes_csv, InvocationOutcome, OutcomeWriter, ScriptRow,
};
pub use sync_reader::SyncReader;

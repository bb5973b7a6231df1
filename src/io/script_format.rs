//! Invocation script format
//!
//! Input rows are `registry,function,args...`: the first two fields address
//! a registry function and every further field is one string argument.
//! Output rows are `line,registry,function,status,payload`, one per executed
//! invocation, where `payload` holds the success payload or the error message.
//!
//! Conversion is pure; readers and strategies do the I/O.

use crate::types::{Invocation, Response, Status};
use std::io::Write;

/// One invocation read from a script, tagged with its 1-based row number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRow {
    pub line: usize,
    pub invocation: Invocation,
}

/// Build an invocation from the fields of one script row
///
/// # Errors
///
/// Returns an error message if the registry or function field is missing or blank.
pub fn convert_script_fields<'a, I>(fields: I) -> Result<Invocation, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut fields = fields.into_iter();

    let registry = match fields.next() {
        Some(registry) if !registry.is_empty() => registry.to_string(),
        _ => return Err("missing registry name".to_string()),
    };
    let function = match fields.next() {
        Some(function) if !function.is_empty() => function.to_string(),
        _ => return Err(format!("missing function name for registry {registry}")),
    };

    Ok(Invocation {
        registry,
        function,
        args: fields.map(str::to_string).collect(),
    })
}

/// Result of one executed script row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome {
    pub line: usize,
    pub registry: String,
    pub function: String,
    pub status: Status,
    pub payload: String,
}

impl InvocationOutcome {
    pub fn new(row: &ScriptRow, response: &Response) -> Self {
        let payload = if response.is_ok() {
            response.payload_text()
        } else {
            response.message.clone()
        };

        InvocationOutcome {
            line: row.line,
            registry: row.invocation.registry.clone(),
            function: row.invocation.function.clone(),
            status: response.status,
            payload,
        }
    }
}

/// Streaming CSV writer for invocation outcomes
pub struct OutcomeWriter<'w> {
    writer: csv::Writer<&'w mut dyn Write>,
}

impl<'w> OutcomeWriter<'w> {
    /// Wrap `output` and write the header row
    pub fn new(output: &'w mut dyn Write) -> Result<Self, String> {
        let mut writer = csv::Writer::from_writer(output);
        writer
            .write_record(["line", "registry", "function", "status", "payload"])
            .map_err(|e| format!("Failed to write CSV header: {}", e))?;
        Ok(OutcomeWriter { writer })
    }

    pub fn write(&mut self, outcome: &InvocationOutcome) -> Result<(), String> {
        self.writer
            .write_record([
                outcome.line.to_string().as_str(),
                outcome.registry.as_str(),
                outcome.function.as_str(),
                outcome.status.to_string().as_str(),
                outcome.payload.as_str(),
            ])
            .map_err(|e| format!("Failed to write outcome for line {}: {}", outcome.line, e))
    }

    /// Flush buffered rows to the underlying output
    pub fn finish(mut self) -> Result<(), String> {
        self.writer
            .flush()
            .map_err(|e| format!("Failed to flush CSV writer: {}", e))
    }
}

/// Write a complete set of outcomes, header included
pub fn write_outcomes_csv(outcomes: &[InvocationOutcome], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = OutcomeWriter::new(output)?;
    for outcome in outcomes {
        writer.write(outcome)?;
    }
    writer.finish()
}

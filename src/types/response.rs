//! Invocation and response types shared by the dispatcher and the host

use super::error::RegistryError;
use std::fmt;

/// A function call addressed to one registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Registry name (`person`, `account`, `card`)
    pub registry: String,

    /// Function name, e.g. `addPerson`
    pub function: String,

    /// Positional string arguments
    pub args: Vec<String>,
}

impl Invocation {
    /// Create an invocation from borrowed parts
    pub fn new(registry: &str, function: &str, args: &[&str]) -> Self {
        Invocation {
            registry: registry.to_string(),
            function: function.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

/// Outcome status of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => f.write_str("OK"),
            Status::Error => f.write_str("ERROR"),
        }
    }
}

/// Result of one registry invocation
///
/// A success may carry a payload; a failure always carries a human-readable
/// message and never a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub payload: Option<Vec<u8>>,
    pub message: String,
}

impl Response {
    /// Successful response with an optional payload
    pub fn success(payload: Option<Vec<u8>>) -> Self {
        Response {
            status: Status::Ok,
            payload,
            message: String::new(),
        }
    }

    /// Failed response with a message
    pub fn error(message: impl Into<String>) -> Self {
        Response {
            status: Status::Error,
            payload: None,
            message: message.into(),
        }
    }

    /// Whether the invocation succeeded
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Payload decoded as UTF-8 (lossy), empty if there is none
    pub fn payload_text(&self) -> String {
        self.payload
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }
}

impl From<Result<Option<Vec<u8>>, RegistryError>> for Response {
    fn from(result: Result<Option<Vec<u8>>, RegistryError>) -> Self {
        match result {
            Ok(payload) => Response::success(payload),
            Err(error) => Response::error(error.to_string()),
        }
    }
}

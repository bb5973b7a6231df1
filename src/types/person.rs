//! Person records owned by the person registry

use super::error::RegistryError;
use serde::{Deserialize, Serialize};

/// Passport identifier, the key of a person record
pub type PassportId = String;

/// A registered person
///
/// Stored under its own `passport_id`. The registry keeps the submitted JSON
/// verbatim; this struct only validates it and exposes the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub passport_id: PassportId,
    pub address: String,
    pub phone: String,
}

impl Person {
    /// Parse and validate a serialized person
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` if the payload is not a person
    /// record or the passport id is blank.
    pub fn parse(payload: &str) -> Result<Self, RegistryError> {
        let person: Person = serde_json::from_str(payload)?;
        if person.passport_id.trim().is_empty() {
            return Err(RegistryError::validation("passport_id must not be empty"));
        }
        Ok(person)
    }
}

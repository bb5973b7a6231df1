//! Card records owned by the card registry
//!
//! Two shapes share the card namespace:
//! - credit cards name an owning person and must link to that person's account
//! - debit cards carry a type and an active flag and may link to an account

use super::account::AccountId;
use super::error::RegistryError;
use super::person::PassportId;
use serde::{Deserialize, Deserializer, Serialize};

/// Card number, the key of a card record
pub type CardNumber = String;

/// Credit card linked to an account of the same person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    pub card_number: CardNumber,
    pub expire_date: String,
    pub person_id: PassportId,
    pub account_number: AccountId,
}

/// Debit card with an optional account link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitCard {
    pub card_number: CardNumber,

    #[serde(rename = "type")]
    pub card_type: String,

    #[serde(deserialize_with = "deserialize_flag")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<AccountId>,
}

/// Any record stored in the card namespace
///
/// Credit is tried first: a payload naming a person and an account is a
/// credit card, anything else must be a debit card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardRecord {
    Credit(CreditCard),
    Debit(DebitCard),
}

impl CardRecord {
    /// Parse and validate a serialized card
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` if the payload matches neither card
    /// shape or the card number is blank.
    pub fn parse(payload: &str) -> Result<Self, RegistryError> {
        let card: CardRecord = serde_json::from_str(payload).map_err(|e| {
            RegistryError::validation(format!("payload is not a credit or debit card: {e}"))
        })?;
        if card.card_number().trim().is_empty() {
            return Err(RegistryError::validation("card_number must not be empty"));
        }
        Ok(card)
    }

    /// The record key
    pub fn card_number(&self) -> &str {
        match self {
            CardRecord::Credit(card) => &card.card_number,
            CardRecord::Debit(card) => &card.card_number,
        }
    }

    /// The linked account, if any
    pub fn account_number(&self) -> Option<&str> {
        match self {
            CardRecord::Credit(card) => Some(&card.account_number),
            CardRecord::Debit(card) => card.account_number.as_deref(),
        }
    }
}

/// Accept `true`/`false` as JSON booleans or as strings
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid active flag '{other}'"
            ))),
        },
    }
}

//! Function-name dispatch
//!
//! Each registry accepts a closed set of commands. A function name and its
//! string arguments are resolved into one command variant by pattern match;
//! unknown names fail with `RegistryError::UnknownFunction` and every known
//! function takes exactly one argument.

use crate::types::{RegistryError, Response};
use tracing::warn;

/// Fold a handler result into a response, logging rejections
pub fn respond(
    registry: &str,
    function: &str,
    result: Result<Option<Vec<u8>>, RegistryError>,
) -> Response {
    if let Err(error) = &result {
        warn!(registry, function, %error, "invocation rejected");
    }
    Response::from(result)
}

/// Person registry commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonCommand {
    Add(String),
    Get(String),
    Update(String),
    Delete(String),
    History(String),
}

/// Account registry commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountCommand {
    Add(String),
    Get(String),
    Update(String),
    Delete(String),
    GetBalance(String),
    Transfer(String),
    History(String),
}

/// Card registry commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardCommand {
    Add(String),
    Get(String),
    Update(String),
    Delete(String),
    History(String),
}

/// Take the single argument of `function`
fn single_argument(function: &str, args: &[String]) -> Result<String, RegistryError> {
    match args {
        [arg] => Ok(arg.clone()),
        _ => Err(RegistryError::wrong_argument_count(function, 1, args.len())),
    }
}

impl PersonCommand {
    pub fn parse(registry: &str, function: &str, args: &[String]) -> Result<Self, RegistryError> {
        let command: fn(String) -> Self = match function {
            "addPerson" => PersonCommand::Add,
            "getPerson" => PersonCommand::Get,
            "updatePerson" => PersonCommand::Update,
            "deletePerson" => PersonCommand::Delete,
            "personHistory" => PersonCommand::History,
            _ => return Err(RegistryError::unknown_function(registry)),
        };
        Ok(command(single_argument(function, args)?))
    }
}

impl AccountCommand {
    pub fn parse(registry: &str, function: &str, args: &[String]) -> Result<Self, RegistryError> {
        let command: fn(String) -> Self = match function {
            "addAccount" => AccountCommand::Add,
            "getAccount" => AccountCommand::Get,
            "updateAccount" => AccountCommand::Update,
            "deleteAccount" => AccountCommand::Delete,
            "getBalance" => AccountCommand::GetBalance,
            "transfer" => AccountCommand::Transfer,
            "accountHistory" | "getHistory" => AccountCommand::History,
            _ => return Err(RegistryError::unknown_function(registry)),
        };
        Ok(command(single_argument(function, args)?))
    }
}

impl CardCommand {
    pub fn parse(registry: &str, function: &str, args: &[String]) -> Result<Self, RegistryError> {
        let command: fn(String) -> Self = match function {
            "addCard" => CardCommand::Add,
            "getCard" => CardCommand::Get,
            "updateCard" => CardCommand::Update,
            // deleteAccount is the historical name of card deletion
            "deleteAccount" | "deleteCard" => CardCommand::Delete,
            "cardHistory" => CardCommand::History,
            _ => return Err(RegistryError::unknown_function(registry)),
        };
        Ok(command(single_argument(function, args)?))
    }
}

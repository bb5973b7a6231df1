//! Types module
//!
//! Contains the records and shapes shared by every registry:
//! - `person`, `account`, `card`: stored records and the transfer request
//! - `history`: substrate versions and the derived history views
//! - `response`: invocations and their responses
//! - `error`: the registry error taxonomy

pub mod account;
pub mod card;
pub mod error;
pub mod history;
pub mod person;
pub mod response;

pub use account::{AccountId, BankAccount, Transfer};
pub use card::{CardNumber, CardRecord, CreditCard, DebitCard};
pub use error::RegistryError;
pub use history::{HistoryEntry, KeyModification, VersionEntry};
pub use person::{PassportId, Person};
pub use response::{Invocation, Response, Status};

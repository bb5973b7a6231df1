//! Card registry
//!
//! Owns card records keyed by card number. Before a card is written:
//! - a credit card's person must exist, its account must exist, and the
//!   account must belong to that same person
//! - a debit card linked to an account needs that account to exist

use crate::core::client::RegistryClient;
use crate::core::dispatch::{respond, CardCommand};
use crate::core::history::record_history_payload;
use crate::core::record_store::RecordStore;
use crate::core::traits::{AccountLookup, LedgerStub, PersonLookup, Registry};
use crate::core::{ACCOUNT_REGISTRY, CARD_REGISTRY};
use crate::types::{BankAccount, CardRecord, RegistryError, Response};
use tracing::{debug, info};

pub struct CardRegistry {
    legacy_history: bool,
}

impl CardRegistry {
    pub fn new(legacy_history: bool) -> Self {
        CardRegistry { legacy_history }
    }

    /// Run one command against the card namespace
    ///
    /// Add and update return the card number as payload.
    pub fn execute(
        &self,
        command: CardCommand,
        store: &RecordStore,
        persons: &dyn PersonLookup,
        accounts: &dyn AccountLookup,
    ) -> Result<Option<Vec<u8>>, RegistryError> {
        match command {
            CardCommand::Add(payload) => {
                let card = CardRecord::parse(&payload)?;
                check_links(&card, persons, accounts)?;
                store.insert_new(card.card_number(), payload.as_bytes())?;
                info!(card = %card.card_number(), "card added");
                Ok(Some(card.card_number().as_bytes().to_vec()))
            }
            CardCommand::Get(card_number) => {
                debug!(%card_number, "card lookup");
                store.require(&card_number).map(Some)
            }
            CardCommand::Update(payload) => {
                let card = CardRecord::parse(&payload)?;
                check_links(&card, persons, accounts)?;
                store.replace_existing(card.card_number(), payload.as_bytes())?;
                info!(card = %card.card_number(), "card updated");
                Ok(Some(card.card_number().as_bytes().to_vec()))
            }
            CardCommand::Delete(card_number) => {
                store.remove(&card_number)?;
                info!(%card_number, "card deleted");
                Ok(None)
            }
            CardCommand::History(card_number) => {
                let versions = store.history(&card_number)?;
                record_history_payload(versions, self.legacy_history).map(Some)
            }
        }
    }
}

/// Verify the person and account a card refers to
fn check_links(
    card: &CardRecord,
    persons: &dyn PersonLookup,
    accounts: &dyn AccountLookup,
) -> Result<(), RegistryError> {
    match card {
        CardRecord::Credit(credit) => {
            persons.get_person(&credit.person_id)?;
            let account = linked_account(&credit.account_number, accounts)?;
            if account.person_id != credit.person_id {
                return Err(RegistryError::ownership(
                    &credit.account_number,
                    &account.person_id,
                    &credit.person_id,
                ));
            }
            Ok(())
        }
        CardRecord::Debit(debit) => match &debit.account_number {
            Some(account_number) => linked_account(account_number, accounts).map(|_| ()),
            None => Ok(()),
        },
    }
}

fn linked_account(
    account_number: &str,
    accounts: &dyn AccountLookup,
) -> Result<BankAccount, RegistryError> {
    let payload = accounts.get_account(account_number)?;
    BankAccount::parse(&payload).map_err(|e| {
        RegistryError::dependency(
            ACCOUNT_REGISTRY,
            account_number,
            format!("unreadable account payload: {e}"),
        )
    })
}

impl Registry for CardRegistry {
    fn name(&self) -> &'static str {
        CARD_REGISTRY
    }

    fn invoke(&self, function: &str, args: &[String], stub: &dyn LedgerStub) -> Response {
        let store = RecordStore::new(stub, "card");
        let client = RegistryClient::new(stub);
        let result = CardCommand::parse(CARD_REGISTRY, function, args)
            .and_then(|command| self.execute(command, &store, &client, &client));
        respond(CARD_REGISTRY, function, result)
    }
}

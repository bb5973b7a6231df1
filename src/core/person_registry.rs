//! Person registry
//!
//! Owns `Person` records keyed by passport id. Payloads are validated on the
//! way in and stored verbatim.

use crate::core::dispatch::{respond, PersonCommand};
use crate::core::history::record_history_payload;
use crate::core::record_store::RecordStore;
use crate::core::traits::{LedgerStub, Registry};
use crate::core::PERSON_REGISTRY;
use crate::types::{Person, RegistryError, Response};
use tracing::{debug, info};

pub struct PersonRegistry {
    legacy_history: bool,
}

impl PersonRegistry {
    /// Create the registry; `legacy_history` selects the transcript history format
    pub fn new(legacy_history: bool) -> Self {
        PersonRegistry { legacy_history }
    }

    /// Run one command against the person namespace
    pub fn execute(
        &self,
        command: PersonCommand,
        store: &RecordStore,
    ) -> Result<Option<Vec<u8>>, RegistryError> {
        match command {
            PersonCommand::Add(payload) => {
                let person = Person::parse(&payload)?;
                store.insert_new(&person.passport_id, payload.as_bytes())?;
                info!(passport_id = %person.passport_id, "person added");
                Ok(None)
            }
            PersonCommand::Get(passport_id) => {
                debug!(%passport_id, "person lookup");
                store.require(&passport_id).map(Some)
            }
            PersonCommand::Update(payload) => {
                let person = Person::parse(&payload)?;
                store.replace_existing(&person.passport_id, payload.as_bytes())?;
                info!(passport_id = %person.passport_id, "person updated");
                Ok(None)
            }
            PersonCommand::Delete(passport_id) => {
                store.remove(&passport_id)?;
                info!(%passport_id, "person deleted");
                Ok(None)
            }
            PersonCommand::History(passport_id) => {
                let versions = store.history(&passport_id)?;
                record_history_payload(versions, self.legacy_history).map(Some)
            }
        }
    }
}

impl Registry for PersonRegistry {
    fn name(&self) -> &'static str {
        PERSON_REGISTRY
    }

    fn invoke(&self, function: &str, args: &[String], stub: &dyn LedgerStub) -> Response {
        let store = RecordStore::new(stub, "person");
        let result = PersonCommand::parse(PERSON_REGISTRY, function, args)
            .and_then(|command| self.execute(command, &store));
        respond(PERSON_REGISTRY, function, result)
    }
}

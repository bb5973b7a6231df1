//! Cross-registry lookup clients
//!
//! `RegistryClient` implements the read-only lookup capabilities on top of
//! the substrate's nested-call primitive. A failed call and a successful call
//! with no payload are both reported as `RegistryError::Dependency`.

use crate::core::traits::{AccountLookup, LedgerStub, PersonLookup};
use crate::core::{ACCOUNT_REGISTRY, PERSON_REGISTRY};
use crate::types::RegistryError;
use tracing::debug;

/// Lookup client that calls sibling registries through a stub
pub struct RegistryClient<'a> {
    stub: &'a dyn LedgerStub,
}

impl<'a> RegistryClient<'a> {
    pub fn new(stub: &'a dyn LedgerStub) -> Self {
        RegistryClient { stub }
    }

    fn fetch(&self, registry: &str, function: &str, key: &str) -> Result<Vec<u8>, RegistryError> {
        debug!(
            registry,
            function,
            key,
            channel = self.stub.channel_id(),
            "cross-registry lookup"
        );

        let response = self
            .stub
            .invoke_registry(registry, function, &[key.to_string()]);
        if !response.is_ok() {
            return Err(RegistryError::dependency(registry, key, response.message));
        }

        match response.payload {
            Some(payload) if !payload.is_empty() => Ok(payload),
            _ => Err(RegistryError::dependency(registry, key, "empty payload")),
        }
    }
}

impl PersonLookup for RegistryClient<'_> {
    fn get_person(&self, passport_id: &str) -> Result<Vec<u8>, RegistryError> {
        self.fetch(PERSON_REGISTRY, "getPerson", passport_id)
    }
}

impl AccountLookup for RegistryClient<'_> {
    fn get_account(&self, account_number: &str) -> Result<Vec<u8>, RegistryError> {
        self.fetch(ACCOUNT_REGISTRY, "getAccount", account_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::HistoryIter;
    use crate::types::Response;
    use std::cell::RefCell;

    /// Stub that answers every nested call with a canned response
    struct CannedStub {
        response: Response,
        calls: RefCell<Vec<(String, String, Vec<String>)>>,
    }

    impl CannedStub {
        fn new(response: Response) -> Self {
            CannedStub {
                response,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl LedgerStub for CannedStub {
        fn get_state(&self, _key: &str) -> Result<Option<Vec<u8>>, RegistryError> {
            Ok(None)
        }

        fn put_state(&self, _key: &str, _value: &[u8]) -> Result<(), RegistryError> {
            Ok(())
        }

        fn del_state(&self, _key: &str) -> Result<(), RegistryError> {
            Ok(())
        }

        fn history_for_key(&self, _key: &str) -> Result<HistoryIter, RegistryError> {
            Ok(Box::new(std::iter::empty()))
        }

        fn invoke_registry(&self, registry: &str, function: &str, args: &[String]) -> Response {
            self.calls
                .borrow_mut()
                .push((registry.to_string(), function.to_string(), args.to_vec()));
            self.response.clone()
        }

        fn channel_id(&self) -> &str {
            "ch"
        }
    }

    #[test]
    fn test_get_person_calls_person_registry() {
        let stub = CannedStub::new(Response::success(Some(b"{}".to_vec())));
        let client = RegistryClient::new(&stub);

        assert_eq!(client.get_person("P1").unwrap(), b"{}".to_vec());
        assert_eq!(
            stub.calls.borrow()[0],
            (
                "person".to_string(),
                "getPerson".to_string(),
                vec!["P1".to_string()]
            )
        );
    }

    #[test]
    fn test_callee_error_becomes_dependency_error() {
        let stub = CannedStub::new(Response::error("account with key A1 does not exist"));
        let client = RegistryClient::new(&stub);

        assert_eq!(
            client.get_account("A1"),
            Err(RegistryError::dependency(
                "account",
                "A1",
                "account with key A1 does not exist"
            ))
        );
    }

    #[test]
    fn test_empty_payload_becomes_dependency_error() {
        let stub = CannedStub::new(Response::success(Some(Vec::new())));
        let client = RegistryClient::new(&stub);

        assert_eq!(
            client.get_person("P1"),
            Err(RegistryError::dependency("person", "P1", "empty payload"))
        );
    }
}

//! Typed record access over a `LedgerStub`
//!
//! `RecordStore` is the only way registries touch the substrate. It turns
//! raw presence checks into the registry error taxonomy (`NotFound`,
//! `DuplicateKey`, `Persistence`) so handlers stay a flat sequence of `?`.

use crate::core::traits::{HistoryIter, LedgerStub};
use crate::types::{RegistryError, Response};
use serde::Serialize;

/// Record access for one entity kind in one namespace
pub struct RecordStore<'a> {
    stub: &'a dyn LedgerStub,
    entity: &'static str,
}

impl<'a> RecordStore<'a> {
    /// Wrap a stub; `entity` names the records in error messages
    pub fn new(stub: &'a dyn LedgerStub, entity: &'static str) -> Self {
        RecordStore { stub, entity }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Raw bytes stored at `key`, if any
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RegistryError> {
        self.stub.get_state(key)
    }

    pub fn contains(&self, key: &str) -> Result<bool, RegistryError> {
        Ok(self.get(key)?.is_some())
    }

    /// Raw bytes stored at `key`
    ///
    /// # Errors
    ///
    /// `RegistryError::NotFound` if the key is absent.
    pub fn require(&self, key: &str) -> Result<Vec<u8>, RegistryError> {
        self.get(key)?
            .ok_or_else(|| RegistryError::not_found(self.entity, key))
    }

    /// Load and decode the record at `key`
    ///
    /// # Errors
    ///
    /// `RegistryError::NotFound` if absent, `RegistryError::Persistence` if
    /// the stored bytes cannot be decoded.
    pub fn load<T, F>(&self, key: &str, decode: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&[u8]) -> Result<T, RegistryError>,
    {
        let bytes = self.require(key)?;
        decode(&bytes).map_err(|e| {
            RegistryError::persistence(format!(
                "stored {} {} is unreadable: {}",
                self.entity, key, e
            ))
        })
    }

    /// Store bytes under a key that must not exist yet
    ///
    /// # Errors
    ///
    /// `RegistryError::DuplicateKey` if the key already holds a record.
    pub fn insert_new(&self, key: &str, bytes: &[u8]) -> Result<(), RegistryError> {
        if self.contains(key)? {
            return Err(RegistryError::duplicate_key(self.entity, key));
        }
        self.put(key, bytes)
    }

    /// Overwrite a key that must already exist
    ///
    /// # Errors
    ///
    /// `RegistryError::NotFound` if the key is absent.
    pub fn replace_existing(&self, key: &str, bytes: &[u8]) -> Result<(), RegistryError> {
        if !self.contains(key)? {
            return Err(RegistryError::not_found(self.entity, key));
        }
        self.put(key, bytes)
    }

    pub fn put(&self, key: &str, bytes: &[u8]) -> Result<(), RegistryError> {
        self.stub.put_state(key, bytes)
    }

    /// Serialize a record and store it
    pub fn save<T: Serialize>(&self, key: &str, record: &T) -> Result<(), RegistryError> {
        let bytes = serde_json::to_vec(record).map_err(|e| {
            RegistryError::persistence(format!("failed to encode {} {}: {}", self.entity, key, e))
        })?;
        self.put(key, &bytes)
    }

    /// Delete a key that must exist
    ///
    /// # Errors
    ///
    /// `RegistryError::NotFound` if the key is absent; nothing is written.
    pub fn remove(&self, key: &str) -> Result<(), RegistryError> {
        if !self.contains(key)? {
            return Err(RegistryError::not_found(self.entity, key));
        }
        self.stub.del_state(key)
    }

    /// All committed versions of a key that currently exists
    ///
    /// # Errors
    ///
    /// `RegistryError::NotFound` if the key is absent.
    pub fn history(&self, key: &str) -> Result<HistoryIter, RegistryError> {
        if !self.contains(key)? {
            return Err(RegistryError::not_found(self.entity, key));
        }
        self.stub.history_for_key(key)
    }

    /// Call a sibling registry through the substrate
    pub fn call_other_registry(&self, registry: &str, function: &str, args: &[String]) -> Response {
        self.stub.invoke_registry(registry, function, args)
    }
}

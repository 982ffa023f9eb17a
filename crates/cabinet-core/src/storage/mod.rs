//! Key-value storage backends for persisted collections.

mod memory;
mod schema;
mod sqlite;

pub use memory::*;
pub use schema::*;
pub use sqlite::*;

use thiserror::Error;

use crate::models::CollectionKind;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Quota exceeded writing {key}: needs {needed} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String-keyed, string-valued persistent storage.
pub trait Storage {
    /// Read a slot. `Ok(None)` when the key was never written.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a slot, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a slot. Removing a missing key is not an error.
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
}

/// Slot names under one application namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    namespace: String,
}

impl StorageKeys {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Slot holding a collection's JSON array.
    pub fn collection(&self, kind: CollectionKind) -> String {
        format!("{}_{}", self.namespace, kind.key())
    }

    /// Slot holding the last-updated timestamp.
    pub fn last_update(&self) -> String {
        format!("{}_last_update", self.namespace)
    }

    /// Every slot owned by the store.
    pub fn all(&self) -> Vec<String> {
        let mut keys: Vec<String> = CollectionKind::ALL
            .iter()
            .map(|kind| self.collection(*kind))
            .collect();
        keys.push(self.last_update());
        keys
    }
}

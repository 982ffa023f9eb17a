//! Cabinet Core Library
//!
//! Local data store for a small medical office: patients, appointments,
//! supplies, staff absences and application users.
//!
//! # Architecture
//!
//! ```text
//!          UI views
//!             │  add / update / delete / export / import / reset
//!             ▼
//!   ┌──────────────────────┐
//!   │      DataStore       │  five collections, in memory
//!   │  apply, then persist │
//!   └──────────┬───────────┘
//!              │  JSON array per slot + last-update timestamp
//!              ▼
//!   ┌──────────────────────┐
//!   │   Storage (trait)    │  SqliteStorage | MemoryStorage
//!   └──────────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **Storage never breaks the session.** Read failures fall back to the seed
//! dataset and write failures are logged; store operations return no errors.
//!
//! # Modules
//!
//! - [`models`]: Record types (Patient, Appointment, Supply, Absence, User) and patches
//! - [`storage`]: Key-value backends (SQLite, in-memory)
//! - [`store`]: The data store, seed data, snapshots

pub mod models;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use models::{
    Absence, AbsencePatch, Appointment, AppointmentPatch, AppointmentStatus, CollectionKind,
    Extra, Patient, PatientPatch, Record, Supply, SupplyPatch, User, UserPatch, UserRole,
};
pub use storage::{
    MemoryStorage, SqliteStorage, Storage, StorageError, StorageKeys, StorageResult,
};
pub use store::{
    DataStore, Dataset, IdGenerator, ImportPayload, SequentialIds, Snapshot, StoreConfig,
    StoredRecord, UuidGenerator, SNAPSHOT_VERSION,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use chrono::SecondsFormat;
use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CabinetError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl From<StorageError> for CabinetError {
    fn from(e: StorageError) -> Self {
        CabinetError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CabinetError {
    fn from(e: serde_json::Error) -> Self {
        CabinetError::Serialization(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for CabinetError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CabinetError::LockPoisoned(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a store backed by the SQLite file at the given path.
#[uniffi::export]
pub fn open_store(path: String) -> Result<Arc<CabinetStore>, CabinetError> {
    let storage = SqliteStorage::open(&path)?;
    Ok(CabinetStore::wrap(DataStore::open(storage)))
}

/// Open a store over in-memory SQLite (for testing).
#[uniffi::export]
pub fn open_store_in_memory() -> Result<Arc<CabinetStore>, CabinetError> {
    let storage = SqliteStorage::open_in_memory()?;
    Ok(CabinetStore::wrap(DataStore::open(storage)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Collection selector for FFI calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiCollectionKind {
    Patients,
    Appointments,
    Supplies,
    Absences,
    Users,
}

impl From<FfiCollectionKind> for CollectionKind {
    fn from(kind: FfiCollectionKind) -> Self {
        match kind {
            FfiCollectionKind::Patients => CollectionKind::Patients,
            FfiCollectionKind::Appointments => CollectionKind::Appointments,
            FfiCollectionKind::Supplies => CollectionKind::Supplies,
            FfiCollectionKind::Absences => CollectionKind::Absences,
            FfiCollectionKind::Users => CollectionKind::Users,
        }
    }
}

/// Thread-safe store wrapper for FFI. Records cross the boundary as JSON.
#[derive(uniffi::Object)]
pub struct CabinetStore {
    store: Mutex<DataStore<SqliteStorage>>,
}

impl CabinetStore {
    fn wrap(store: DataStore<SqliteStorage>) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
        })
    }

    fn add_json<R: StoredRecord>(&self, record_json: &str) -> Result<String, CabinetError> {
        let record: R = models::parse_new_record(record_json)
            .map_err(|e| CabinetError::InvalidInput(e.to_string()))?;
        let mut store = self.store.lock()?;
        Ok(store.add(record))
    }

    fn update_json<R: StoredRecord>(
        &self,
        id: &str,
        patch_json: &str,
    ) -> Result<bool, CabinetError> {
        let patch = models::parse_patch::<R>(patch_json)
            .map_err(|e| CabinetError::InvalidInput(e.to_string()))?;
        let mut store = self.store.lock()?;
        Ok(store.update::<R>(id, patch))
    }
}

#[uniffi::export]
impl CabinetStore {
    /// Get a collection as a JSON array.
    pub fn list(&self, kind: FfiCollectionKind) -> Result<String, CabinetError> {
        let store = self.store.lock()?;
        Ok(store.dataset().collection_json(kind.into())?)
    }

    /// Add a record given as a JSON object. Returns the new id.
    pub fn add(
        &self,
        kind: FfiCollectionKind,
        record_json: String,
    ) -> Result<String, CabinetError> {
        match kind {
            FfiCollectionKind::Patients => self.add_json::<Patient>(&record_json),
            FfiCollectionKind::Appointments => self.add_json::<Appointment>(&record_json),
            FfiCollectionKind::Supplies => self.add_json::<Supply>(&record_json),
            FfiCollectionKind::Absences => self.add_json::<Absence>(&record_json),
            FfiCollectionKind::Users => self.add_json::<User>(&record_json),
        }
    }

    /// Apply a JSON patch to a record. Returns whether the id matched.
    pub fn update(
        &self,
        kind: FfiCollectionKind,
        id: String,
        patch_json: String,
    ) -> Result<bool, CabinetError> {
        match kind {
            FfiCollectionKind::Patients => self.update_json::<Patient>(&id, &patch_json),
            FfiCollectionKind::Appointments => self.update_json::<Appointment>(&id, &patch_json),
            FfiCollectionKind::Supplies => self.update_json::<Supply>(&id, &patch_json),
            FfiCollectionKind::Absences => self.update_json::<Absence>(&id, &patch_json),
            FfiCollectionKind::Users => self.update_json::<User>(&id, &patch_json),
        }
    }

    /// Delete a record. Deleting a patient also deletes its appointments.
    pub fn delete(&self, kind: FfiCollectionKind, id: String) -> Result<bool, CabinetError> {
        let mut store = self.store.lock()?;
        Ok(match kind {
            FfiCollectionKind::Patients => store.delete::<Patient>(&id),
            FfiCollectionKind::Appointments => store.delete::<Appointment>(&id),
            FfiCollectionKind::Supplies => store.delete::<Supply>(&id),
            FfiCollectionKind::Absences => store.delete::<Absence>(&id),
            FfiCollectionKind::Users => store.delete::<User>(&id),
        })
    }

    /// Export all collections as a JSON backup document.
    pub fn export_json(&self) -> Result<String, CabinetError> {
        let store = self.store.lock()?;
        Ok(store.export().to_json()?)
    }

    /// Import a JSON backup document.
    pub fn import_json(&self, json: String) -> Result<(), CabinetError> {
        let payload =
            ImportPayload::from_json(&json).map_err(|e| CabinetError::InvalidInput(e.to_string()))?;
        let mut store = self.store.lock()?;
        store.import(payload);
        Ok(())
    }

    /// Restore seed data and clear persisted slots.
    pub fn reset(&self) -> Result<(), CabinetError> {
        let mut store = self.store.lock()?;
        store.reset();
        Ok(())
    }

    /// Last persisted write (ISO-8601), if any.
    pub fn last_updated(&self) -> Result<Option<String>, CabinetError> {
        let store = self.store.lock()?;
        Ok(store
            .last_updated()
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true)))
    }
}

//! The data store: five collections kept in memory and mirrored to storage.
//!
//! Every mutation is applied to memory first and then written to its storage
//! slot, followed by the last-updated timestamp. Storage problems are logged
//! and never reach the caller; the in-memory state stays authoritative for the
//! session.

mod config;
mod dataset;
mod ids;
mod seed;
mod snapshot;

pub use config::*;
pub use dataset::*;
pub use ids::*;
pub use snapshot::*;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, error, info, warn};

use crate::models::{
    Absence, AbsencePatch, Appointment, AppointmentPatch, CollectionKind, Patient, PatientPatch,
    Supply, SupplyPatch, User, UserPatch,
};
use crate::storage::{Storage, StorageKeys};

/// Current time as an ISO-8601 UTC string with millisecond precision.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Read one collection from its slot, falling back when absent or unreadable.
fn load_collection<S: Storage, R: StoredRecord>(
    storage: &S,
    keys: &StorageKeys,
    fallback: Vec<R>,
) -> Vec<R> {
    let slot = keys.collection(R::KIND);
    match storage.get_item(&slot) {
        Ok(Some(raw)) if !raw.is_empty() => match serde_json::from_str(&raw) {
            Ok(records) => {
                debug!(slot = %slot, "loaded collection from storage");
                records
            }
            Err(e) => {
                error!(
                    slot = %slot,
                    error = %e,
                    "failed to parse stored collection, using seed data"
                );
                fallback
            }
        },
        Ok(_) => {
            debug!(slot = %slot, "no stored collection, using seed data");
            fallback
        }
        Err(e) => {
            warn!(
                slot = %slot,
                error = %e,
                "failed to read stored collection, using seed data"
            );
            fallback
        }
    }
}

/// Medical-office data store over a key-value [`Storage`].
pub struct DataStore<S: Storage> {
    storage: S,
    keys: StorageKeys,
    ids: Box<dyn IdGenerator + Send>,
    seed: Dataset,
    data: Dataset,
}

impl<S: Storage> DataStore<S> {
    /// Open with the default namespace, the built-in seed dataset and UUID ids.
    pub fn open(storage: S) -> Self {
        Self::open_with(
            storage,
            StoreConfig::default(),
            Dataset::seed(),
            Box::new(UuidGenerator),
        )
    }

    /// Open with explicit configuration, seed dataset and id generator.
    pub fn open_with(
        storage: S,
        config: StoreConfig,
        seed: Dataset,
        ids: Box<dyn IdGenerator + Send>,
    ) -> Self {
        let keys = StorageKeys::new(config.namespace);
        let data = Dataset {
            patients: load_collection(&storage, &keys, seed.patients.clone()),
            appointments: load_collection(&storage, &keys, seed.appointments.clone()),
            supplies: load_collection(&storage, &keys, seed.supplies.clone()),
            absences: load_collection(&storage, &keys, seed.absences.clone()),
            users: load_collection(&storage, &keys, seed.users.clone()),
        };
        Self {
            storage,
            keys,
            ids,
            seed,
            data,
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn patients(&self) -> &[Patient] {
        &self.data.patients
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.data.appointments
    }

    pub fn supplies(&self) -> &[Supply] {
        &self.data.supplies
    }

    pub fn absences(&self) -> &[Absence] {
        &self.data.absences
    }

    pub fn users(&self) -> &[User] {
        &self.data.users
    }

    /// All five collections.
    pub fn dataset(&self) -> &Dataset {
        &self.data
    }

    /// Find a record by id in its collection.
    pub fn get<R: StoredRecord>(&self, id: &str) -> Option<&R> {
        R::records(&self.data).iter().find(|r| r.id() == id)
    }

    /// Appointments booked for a patient, in insertion order.
    pub fn appointments_for_patient(&self, patient_id: &str) -> Vec<&Appointment> {
        self.data
            .appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .collect()
    }

    /// Supplies at or below their reorder threshold.
    pub fn low_stock_supplies(&self) -> Vec<&Supply> {
        self.data.supplies.iter().filter(|s| s.is_low_stock()).collect()
    }

    /// Time of the last successful persisted write, if any.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        let slot = self.keys.last_update();
        match self.storage.get_item(&slot) {
            Ok(Some(raw)) => DateTime::parse_from_rfc3339(&raw)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|e| warn!(slot = %slot, error = %e, "invalid last-update timestamp"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(slot = %slot, error = %e, "failed to read last-update timestamp");
                None
            }
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage, e.g. to reopen a store over it.
    pub fn into_storage(self) -> S {
        self.storage
    }

    // =========================================================================
    // Generic CRUD
    // =========================================================================

    /// Append a record under a fresh id and persist its collection.
    ///
    /// Whatever id the record carried is replaced. Returns the new id.
    pub fn add<R: StoredRecord>(&mut self, mut record: R) -> String {
        let id = self.ids.next_id();
        record.set_id(id.clone());
        R::records_mut(&mut self.data).push(record);
        debug!(collection = %R::KIND, id = %id, "record added");
        self.persist(R::KIND);
        id
    }

    /// Shallow-merge a patch into the record with the given id.
    ///
    /// Unknown ids leave the collection unchanged. Returns whether a record matched.
    pub fn update<R: StoredRecord>(&mut self, id: &str, patch: R::Patch) -> bool {
        let found = match R::records_mut(&mut self.data)
            .iter_mut()
            .find(|r| r.id() == id)
        {
            Some(record) => {
                record.apply(patch);
                true
            }
            None => false,
        };
        debug!(collection = %R::KIND, id = %id, found, "record updated");
        self.persist(R::KIND);
        found
    }

    /// Remove the record with the given id.
    ///
    /// Removing a patient also removes every appointment referencing it. Other
    /// kinds do not cascade. Returns whether a record was removed.
    pub fn delete<R: StoredRecord>(&mut self, id: &str) -> bool {
        let records = R::records_mut(&mut self.data);
        let before = records.len();
        records.retain(|r| r.id() != id);
        let removed = records.len() < before;
        debug!(collection = %R::KIND, id = %id, removed, "record deleted");
        self.persist(R::KIND);

        if R::KIND == CollectionKind::Patients {
            let before = self.data.appointments.len();
            self.data.appointments.retain(|a| a.patient_id != id);
            let cascaded = before - self.data.appointments.len();
            debug!(patient_id = %id, cascaded, "appointments removed with patient");
            self.persist(CollectionKind::Appointments);
        }

        removed
    }

    // =========================================================================
    // Per-Collection Operations
    // =========================================================================

    pub fn add_patient(&mut self, patient: Patient) -> String {
        self.add(patient)
    }

    pub fn update_patient(&mut self, id: &str, patch: PatientPatch) -> bool {
        self.update::<Patient>(id, patch)
    }

    /// Delete a patient and its appointments.
    pub fn delete_patient(&mut self, id: &str) -> bool {
        self.delete::<Patient>(id)
    }

    pub fn add_appointment(&mut self, appointment: Appointment) -> String {
        self.add(appointment)
    }

    pub fn update_appointment(&mut self, id: &str, patch: AppointmentPatch) -> bool {
        self.update::<Appointment>(id, patch)
    }

    pub fn delete_appointment(&mut self, id: &str) -> bool {
        self.delete::<Appointment>(id)
    }

    pub fn add_supply(&mut self, supply: Supply) -> String {
        self.add(supply)
    }

    pub fn update_supply(&mut self, id: &str, patch: SupplyPatch) -> bool {
        self.update::<Supply>(id, patch)
    }

    pub fn delete_supply(&mut self, id: &str) -> bool {
        self.delete::<Supply>(id)
    }

    pub fn add_absence(&mut self, absence: Absence) -> String {
        self.add(absence)
    }

    pub fn update_absence(&mut self, id: &str, patch: AbsencePatch) -> bool {
        self.update::<Absence>(id, patch)
    }

    pub fn delete_absence(&mut self, id: &str) -> bool {
        self.delete::<Absence>(id)
    }

    pub fn add_user(&mut self, user: User) -> String {
        self.add(user)
    }

    pub fn update_user(&mut self, id: &str, patch: UserPatch) -> bool {
        self.update::<User>(id, patch)
    }

    /// Delete a user. Absences pointing at it are kept.
    pub fn delete_user(&mut self, id: &str) -> bool {
        self.delete::<User>(id)
    }

    // =========================================================================
    // Whole-Store Operations
    // =========================================================================

    /// Copy every collection into a backup snapshot.
    pub fn export(&self) -> Snapshot {
        let snapshot = Snapshot::from_dataset(&self.data, timestamp());
        info!(
            patients = self.data.len(CollectionKind::Patients),
            appointments = self.data.len(CollectionKind::Appointments),
            supplies = self.data.len(CollectionKind::Supplies),
            absences = self.data.len(CollectionKind::Absences),
            users = self.data.len(CollectionKind::Users),
            "data exported"
        );
        snapshot
    }

    /// Replace each collection present in the payload; leave the others alone.
    pub fn import(&mut self, payload: ImportPayload) {
        let kinds = payload.kinds();
        if let Some(patients) = payload.patients {
            self.data.patients = patients;
        }
        if let Some(appointments) = payload.appointments {
            self.data.appointments = appointments;
        }
        if let Some(supplies) = payload.supplies {
            self.data.supplies = supplies;
        }
        if let Some(absences) = payload.absences {
            self.data.absences = absences;
        }
        if let Some(users) = payload.users {
            self.data.users = users;
        }
        for kind in &kinds {
            self.persist(*kind);
        }
        info!(collections = ?kinds, "data imported");
    }

    /// Restore the seed dataset and remove every slot owned by the store.
    pub fn reset(&mut self) {
        self.data = self.seed.clone();
        for slot in self.keys.all() {
            if let Err(e) = self.storage.remove_item(&slot) {
                error!(slot = %slot, error = %e, "failed to clear storage slot");
            }
        }
        info!(namespace = %self.keys.namespace(), "data reset to seed");
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write one collection, then the last-updated timestamp.
    fn persist(&mut self, kind: CollectionKind) {
        let slot = self.keys.collection(kind);
        let payload = match self.data.collection_json(kind) {
            Ok(payload) => payload,
            Err(e) => {
                error!(slot = %slot, error = %e, "failed to serialize collection");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(&slot, &payload) {
            error!(slot = %slot, error = %e, "failed to persist collection");
            return;
        }

        let stamp_slot = self.keys.last_update();
        if let Err(e) = self.storage.set_item(&stamp_slot, &timestamp()) {
            error!(slot = %stamp_slot, error = %e, "failed to persist last-update timestamp");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageKeys};

    fn empty_store() -> DataStore<MemoryStorage> {
        DataStore::open_with(
            MemoryStorage::new(),
            StoreConfig::default(),
            Dataset::empty(),
            Box::new(SequentialIds::new("id")),
        )
    }

    #[test]
    fn test_open_uses_seed_when_storage_empty() {
        let store = DataStore::open(MemoryStorage::new());
        assert_eq!(store.dataset(), &Dataset::seed());
        // Loading alone writes nothing
        assert!(store.storage().is_empty());
        assert!(store.last_updated().is_none());
    }

    #[test]
    fn test_add_assigns_id_and_persists() {
        let mut store = empty_store();
        let id = store.add_patient(Patient::new("A"));

        assert_eq!(id, "id-1");
        assert_eq!(store.patients().len(), 1);
        assert_eq!(store.get::<Patient>(&id).unwrap().name, "A");

        let keys = StorageKeys::new("cabinet_medical");
        let stored = store
            .storage()
            .get_item(&keys.collection(CollectionKind::Patients))
            .unwrap()
            .unwrap();
        assert_eq!(stored, r#"[{"id":"id-1","name":"A"}]"#);
        assert!(store.last_updated().is_some());
    }

    #[test]
    fn test_add_overwrites_supplied_id() {
        let mut store = empty_store();
        let mut patient = Patient::new("A");
        patient.id = "chosen".into();

        let id = store.add_patient(patient);
        assert_ne!(id, "chosen");
        assert!(store.get::<Patient>("chosen").is_none());
    }

    #[test]
    fn test_delete_patient_cascades_only_to_its_appointments() {
        let mut store = empty_store();
        let kept = store.add_patient(Patient::new("B"));
        let gone = store.add_patient(Patient::new("A"));
        store.add_appointment(Appointment::new(&gone, "2024-01-01"));
        store.add_appointment(Appointment::new(&kept, "2024-01-02"));
        store.add_appointment(Appointment::new(&gone, "2024-01-03"));

        assert!(store.delete_patient(&gone));

        assert_eq!(store.patients().len(), 1);
        assert_eq!(store.appointments().len(), 1);
        assert_eq!(store.appointments()[0].patient_id, kept);
    }

    #[test]
    fn test_delete_user_does_not_cascade() {
        let mut store = empty_store();
        let user_id = store.add_user(User::new("lea", "Léa", crate::models::UserRole::Nurse));
        let mut absence = Absence::new("Léa", "2024-02-01", "2024-02-02");
        absence.user_id = Some(user_id.clone());
        store.add_absence(absence);

        assert!(store.delete_user(&user_id));
        assert_eq!(store.absences().len(), 1);
        assert_eq!(store.absences()[0].user_id, Some(user_id));
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp();
        assert!(ts.ends_with('Z'));
        // 2024-01-01T00:00:00.000Z
        assert_eq!(ts.len(), 24);
    }
}

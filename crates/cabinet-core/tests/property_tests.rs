//! Property tests for store invariants.

use std::collections::HashSet;

use cabinet_core::{
    Appointment, DataStore, Dataset, ImportPayload, MemoryStorage, Patient, PatientPatch,
    StoreConfig, UuidGenerator,
};
use proptest::prelude::*;

fn empty_store() -> DataStore<MemoryStorage> {
    DataStore::open_with(
        MemoryStorage::new(),
        StoreConfig::default(),
        Dataset::empty(),
        Box::new(UuidGenerator),
    )
}

proptest! {
    #[test]
    fn prop_adds_never_collide(names in prop::collection::vec("[A-Za-z]{1,12}", 1..200)) {
        let mut store = empty_store();
        let mut ids = HashSet::new();

        for (i, name) in names.iter().enumerate() {
            let id = store.add_patient(Patient::new(name.clone()));
            prop_assert!(ids.insert(id.clone()));
            prop_assert_eq!(store.patients().len(), i + 1);
            prop_assert_eq!(&store.get::<Patient>(&id).unwrap().name, name);
        }
    }

    #[test]
    fn prop_update_touches_only_patched_fields(
        phone in proptest::option::of("[0-9]{10}"),
        notes in "[a-z ]{0,30}",
    ) {
        let mut store = empty_store();
        let mut patient = Patient::new("Martin");
        patient.email = Some("martin@example.fr".into());
        let id = store.add_patient(patient);

        store.update_patient(&id, PatientPatch {
            phone: Some(phone.clone()),
            notes: Some(Some(notes.clone())),
            ..Default::default()
        });

        let updated = store.get::<Patient>(&id).unwrap();
        prop_assert_eq!(&updated.id, &id);
        prop_assert_eq!(&updated.name, "Martin");
        prop_assert_eq!(updated.email.as_deref(), Some("martin@example.fr"));
        prop_assert_eq!(&updated.phone, &phone);
        prop_assert_eq!(updated.notes.as_deref(), Some(notes.as_str()));
    }

    #[test]
    fn prop_patient_delete_removes_exactly_its_appointments(
        owners in prop::collection::vec(0usize..4, 0..40),
        victim in 0usize..4,
    ) {
        let mut store = empty_store();
        let patient_ids: Vec<String> = (0..4)
            .map(|i| store.add_patient(Patient::new(format!("P{}", i))))
            .collect();
        for (day, owner) in owners.iter().enumerate() {
            let date = format!("2024-01-{:02}", day % 28 + 1);
            store.add_appointment(Appointment::new(&patient_ids[*owner], date));
        }

        let victim_id = patient_ids[victim].clone();
        let expected: Vec<Appointment> = store
            .appointments()
            .iter()
            .filter(|a| a.patient_id != victim_id)
            .cloned()
            .collect();

        prop_assert!(store.delete_patient(&victim_id));
        prop_assert_eq!(store.patients().len(), 3);
        prop_assert_eq!(store.appointments(), expected.as_slice());
    }

    #[test]
    fn prop_export_import_round_trip(extra in prop::collection::vec("[A-Za-z]{1,12}", 0..20)) {
        let mut source = DataStore::open(MemoryStorage::new());
        for name in &extra {
            source.add_patient(Patient::new(name.clone()));
        }

        let mut target = empty_store();
        target.import(ImportPayload::from(source.export()));

        prop_assert_eq!(target.dataset(), source.dataset());
    }
}

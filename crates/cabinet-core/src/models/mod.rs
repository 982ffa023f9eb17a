//! Domain models for the cabinet data store.
//!
//! Each of the five collections holds one concrete record type. Every record
//! carries a store-assigned `id` and has a matching patch type used for
//! shallow-merge updates.

mod absence;
mod appointment;
mod patient;
mod supply;
mod user;

pub use absence::*;
pub use appointment::*;
pub use patient::*;
pub use supply::*;
pub use user::*;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Record fields outside the typed schema, keyed by their JSON name.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// The five collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Patients,
    Appointments,
    Supplies,
    Absences,
    Users,
}

impl CollectionKind {
    /// All kinds, in export order.
    pub const ALL: [CollectionKind; 5] = [
        CollectionKind::Patients,
        CollectionKind::Appointments,
        CollectionKind::Supplies,
        CollectionKind::Absences,
        CollectionKind::Users,
    ];

    /// Key used both in snapshots and as the storage slot suffix.
    pub fn key(&self) -> &'static str {
        match self {
            CollectionKind::Patients => "patients",
            CollectionKind::Appointments => "appointments",
            CollectionKind::Supplies => "supplies",
            CollectionKind::Absences => "absences",
            CollectionKind::Users => "users",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A record stored in one of the collections.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Partial field set applied by updates.
    type Patch: DeserializeOwned;

    /// Collection this record type lives in.
    const KIND: CollectionKind;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Shallow merge: every field present in the patch replaces the current value.
    fn apply(&mut self, patch: Self::Patch);
}

/// Parse a record submitted for creation.
///
/// The payload does not need an `id`; any id it carries is replaced by the
/// store on add.
pub fn parse_new_record<R: Record>(json: &str) -> serde_json::Result<R> {
    let mut value: serde_json::Value = serde_json::from_str(json)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("id".to_string(), serde_json::Value::String(String::new()));
    }
    serde_json::from_value(value)
}

/// Parse a patch for records of type `R`.
pub fn parse_patch<R: Record>(json: &str) -> serde_json::Result<R::Patch> {
    serde_json::from_str(json)
}

/// Deserialize a tri-state patch field: absent keeps, `null` clears, a value sets.
///
/// Used with `#[serde(default)]` so a missing key stays `None`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Shallow-merge a patch's unknown fields into a record's. `id` is never taken.
pub(crate) fn merge_extra(target: &mut Extra, patch: Extra) {
    for (key, value) in patch {
        if key != "id" {
            target.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_keys() {
        let keys: Vec<_> = CollectionKind::ALL.iter().map(|k| k.key()).collect();
        assert_eq!(
            keys,
            vec!["patients", "appointments", "supplies", "absences", "users"]
        );
        assert_eq!(CollectionKind::Supplies.to_string(), "supplies");
    }

    #[test]
    fn test_parse_new_record_without_id() {
        let patient: Patient = parse_new_record(r#"{"name": "A"}"#).unwrap();
        assert_eq!(patient.name, "A");
        assert!(patient.id.is_empty());
    }

    #[test]
    fn test_parse_new_record_discards_supplied_id() {
        let patient: Patient = parse_new_record(r#"{"id": "forged", "name": "A"}"#).unwrap();
        assert!(patient.id.is_empty());
    }

    #[test]
    fn test_parse_new_record_rejects_wrong_types() {
        let result: serde_json::Result<Appointment> =
            parse_new_record(r#"{"patientId": 42, "date": "2024-01-01"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_tri_state() {
        let patch = parse_patch::<Patient>(r#"{"phone": null, "email": "a@b.fr"}"#).unwrap();
        assert_eq!(patch.phone, Some(None));
        assert_eq!(patch.email, Some(Some("a@b.fr".to_string())));
        assert_eq!(patch.notes, None);
        assert_eq!(patch.name, None);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let json = r#"{"id": "1", "name": "Z", "prenom": "Y", "mutuelle": {"nom": "MGEN"}}"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.extra["prenom"], "Y");

        let value = serde_json::to_value(&patient).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": "1", "name": "Z", "prenom": "Y", "mutuelle": {"nom": "MGEN"}})
        );
    }

    #[test]
    fn test_patch_unknown_fields_merge_without_id() {
        let mut patient: Patient =
            serde_json::from_str(r#"{"id": "1", "name": "Z", "prenom": "Y"}"#).unwrap();
        let patch = parse_patch::<Patient>(r#"{"id": "2", "prenom": null, "medecin": "Dr. Roy"}"#)
            .unwrap();
        patient.apply(patch);

        assert_eq!(patient.id, "1");
        assert_eq!(patient.extra["prenom"], serde_json::Value::Null);
        assert_eq!(patient.extra["medecin"], "Dr. Roy");
        assert!(!patient.extra.contains_key("id"));
    }
}

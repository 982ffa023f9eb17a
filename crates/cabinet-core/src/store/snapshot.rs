//! Backup snapshots: export format and import payloads.

use serde::{Deserialize, Serialize};

use super::Dataset;
use crate::models::{Absence, Appointment, CollectionKind, Patient, Supply, User};

/// Format version written into every export.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Full copy of the store, as produced by export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
    pub supplies: Vec<Supply>,
    pub absences: Vec<Absence>,
    pub users: Vec<User>,
    /// Export timestamp (ISO-8601)
    pub export_date: String,
    /// Format version
    pub version: String,
}

impl Snapshot {
    pub(crate) fn from_dataset(data: &Dataset, export_date: String) -> Self {
        Self {
            patients: data.patients.clone(),
            appointments: data.appointments.clone(),
            supplies: data.supplies.clone(),
            absences: data.absences.clone(),
            users: data.users.clone(),
            export_date,
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The five collections without export metadata.
    pub fn into_dataset(self) -> Dataset {
        Dataset {
            patients: self.patients,
            appointments: self.appointments,
            supplies: self.supplies,
            absences: self.absences,
            users: self.users,
        }
    }
}

/// Data accepted by import.
///
/// Each collection is optional: a missing (or `null`) key leaves that
/// collection untouched. Other keys, including `exportDate` and `version`,
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ImportPayload {
    #[serde(default)]
    pub patients: Option<Vec<Patient>>,
    #[serde(default)]
    pub appointments: Option<Vec<Appointment>>,
    #[serde(default)]
    pub supplies: Option<Vec<Supply>>,
    #[serde(default)]
    pub absences: Option<Vec<Absence>>,
    #[serde(default)]
    pub users: Option<Vec<User>>,
}

impl ImportPayload {
    /// Parse an import document. Records of the wrong shape are rejected here.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Collections this payload replaces.
    pub fn kinds(&self) -> Vec<CollectionKind> {
        CollectionKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                CollectionKind::Patients => self.patients.is_some(),
                CollectionKind::Appointments => self.appointments.is_some(),
                CollectionKind::Supplies => self.supplies.is_some(),
                CollectionKind::Absences => self.absences.is_some(),
                CollectionKind::Users => self.users.is_some(),
            })
            .collect()
    }
}

impl From<Snapshot> for ImportPayload {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.into_dataset().into()
    }
}

impl From<Dataset> for ImportPayload {
    fn from(data: Dataset) -> Self {
        Self {
            patients: Some(data.patients),
            appointments: Some(data.appointments),
            supplies: Some(data.supplies),
            absences: Some(data.absences),
            users: Some(data.users),
        }
    }
}

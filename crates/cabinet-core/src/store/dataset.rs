//! The five collections as one value.

use crate::models::{Absence, Appointment, CollectionKind, Patient, Record, Supply, User};

/// Contents of all five collections, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
    pub supplies: Vec<Supply>,
    pub absences: Vec<Absence>,
    pub users: Vec<User>,
}

impl Dataset {
    /// Dataset with every collection empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of records in one collection.
    pub fn len(&self, kind: CollectionKind) -> usize {
        match kind {
            CollectionKind::Patients => self.patients.len(),
            CollectionKind::Appointments => self.appointments.len(),
            CollectionKind::Supplies => self.supplies.len(),
            CollectionKind::Absences => self.absences.len(),
            CollectionKind::Users => self.users.len(),
        }
    }

    /// Serialize one collection as a JSON array.
    pub fn collection_json(&self, kind: CollectionKind) -> serde_json::Result<String> {
        match kind {
            CollectionKind::Patients => serde_json::to_string(&self.patients),
            CollectionKind::Appointments => serde_json::to_string(&self.appointments),
            CollectionKind::Supplies => serde_json::to_string(&self.supplies),
            CollectionKind::Absences => serde_json::to_string(&self.absences),
            CollectionKind::Users => serde_json::to_string(&self.users),
        }
    }
}

/// A record type with a home collection in [`Dataset`].
pub trait StoredRecord: Record {
    fn records(data: &Dataset) -> &Vec<Self>;

    fn records_mut(data: &mut Dataset) -> &mut Vec<Self>;
}

impl StoredRecord for Patient {
    fn records(data: &Dataset) -> &Vec<Self> {
        &data.patients
    }

    fn records_mut(data: &mut Dataset) -> &mut Vec<Self> {
        &mut data.patients
    }
}

impl StoredRecord for Appointment {
    fn records(data: &Dataset) -> &Vec<Self> {
        &data.appointments
    }

    fn records_mut(data: &mut Dataset) -> &mut Vec<Self> {
        &mut data.appointments
    }
}

impl StoredRecord for Supply {
    fn records(data: &Dataset) -> &Vec<Self> {
        &data.supplies
    }

    fn records_mut(data: &mut Dataset) -> &mut Vec<Self> {
        &mut data.supplies
    }
}

impl StoredRecord for Absence {
    fn records(data: &Dataset) -> &Vec<Self> {
        &data.absences
    }

    fn records_mut(data: &mut Dataset) -> &mut Vec<Self> {
        &mut data.absences
    }
}

impl StoredRecord for User {
    fn records(data: &Dataset) -> &Vec<Self> {
        &data.users
    }

    fn records_mut(data: &mut Dataset) -> &mut Vec<Self> {
        &mut data.users
    }
}

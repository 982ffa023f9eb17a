//! Appointment records.

use serde::{Deserialize, Serialize};

use super::{CollectionKind, Extra, Record};

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Booked, not yet seen
    #[default]
    Scheduled,
    /// Patient was seen
    Completed,
    /// Cancelled by the patient or the practice
    Cancelled,
}

/// A consultation slot booked for a patient.
///
/// `patient_id` references [`super::Patient::id`]. The only enforcement is
/// that deleting a patient removes its appointments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Store-assigned identifier
    pub id: String,
    /// Id of the patient being seen
    pub patient_id: String,
    /// Day of the appointment (YYYY-MM-DD)
    pub date: String,
    /// Start time (HH:MM)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Planned duration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// Kind of visit (consultation, vaccination, follow-up...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Lifecycle status
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Fields outside the schema, kept as they are
    #[serde(flatten)]
    pub extra: Extra,
}

impl Appointment {
    /// Create an unsaved appointment for a patient on a given day.
    pub fn new(patient_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            date: date.into(),
            ..Default::default()
        }
    }
}

/// Partial update for an [`Appointment`].
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub time: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub duration_minutes: Option<Option<u32>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub kind: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub notes: Option<Option<String>>,
    /// Other fields, merged into the record's extra fields
    #[serde(flatten)]
    pub extra: Extra,
}

impl Record for Appointment {
    type Patch = AppointmentPatch;
    const KIND: CollectionKind = CollectionKind::Appointments;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: AppointmentPatch) {
        if let Some(patient_id) = patch.patient_id {
            self.patient_id = patient_id;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(duration) = patch.duration_minutes {
            self.duration_minutes = duration;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        super::merge_extra(&mut self.extra, patch.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_appointment_is_scheduled() {
        let appointment = Appointment::new("p1", "2024-01-01");
        assert_eq!(appointment.patient_id, "p1");
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn test_wire_format() {
        let json =
            r#"{"id": "a1", "patientId": "p1", "date": "2024-01-01", "status": "cancelled"}"#;
        let appointment: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(appointment.patient_id, "p1");
        assert_eq!(appointment.status, AppointmentStatus::Cancelled);

        let value = serde_json::to_value(&appointment).unwrap();
        assert_eq!(value["patientId"], "p1");
        assert_eq!(value["status"], "cancelled");
    }

    #[test]
    fn test_unknown_status_rejected() {
        let json = r#"{"id": "a1", "patientId": "p1", "date": "2024-01-01", "status": "lost"}"#;
        assert!(serde_json::from_str::<Appointment>(json).is_err());
    }

    #[test]
    fn test_apply_patch() {
        let mut appointment = Appointment::new("p1", "2024-01-01");
        appointment.time = Some("09:00".into());

        appointment.apply(AppointmentPatch {
            status: Some(AppointmentStatus::Completed),
            notes: Some(Some("blood pressure ok".into())),
            ..Default::default()
        });

        assert_eq!(appointment.status, AppointmentStatus::Completed);
        assert_eq!(appointment.time, Some("09:00".into()));
        assert_eq!(appointment.notes, Some("blood pressure ok".into()));
        assert_eq!(appointment.date, "2024-01-01");
    }
}

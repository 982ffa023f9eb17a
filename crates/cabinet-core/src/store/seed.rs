//! Built-in records used when nothing is persisted yet.

use super::Dataset;
use crate::models::{
    Absence, Appointment, AppointmentStatus, Extra, Patient, Supply, User, UserRole,
};

impl Dataset {
    /// Demonstration dataset for a small general practice.
    pub fn seed() -> Self {
        Self {
            patients: seed_patients(),
            appointments: seed_appointments(),
            supplies: seed_supplies(),
            absences: seed_absences(),
            users: seed_users(),
        }
    }
}

fn patient(id: &str, name: &str, first_name: &str, birth_date: &str, phone: &str) -> Patient {
    Patient {
        id: id.to_string(),
        name: name.to_string(),
        first_name: Some(first_name.to_string()),
        birth_date: Some(birth_date.to_string()),
        phone: Some(phone.to_string()),
        ..Default::default()
    }
}

fn seed_patients() -> Vec<Patient> {
    let mut dubois = patient("1", "Dubois", "Marie", "1978-03-12", "06 12 34 56 78");
    dubois.email = Some("marie.dubois@example.fr".to_string());
    dubois.address = Some("12 rue des Lilas, 69003 Lyon".to_string());

    let mut lefebvre = patient("2", "Lefebvre", "Jean", "1952-11-02", "06 98 76 54 32");
    lefebvre.notes = Some("Hypertension, suivi trimestriel".to_string());

    let moreau = patient("3", "Moreau", "Lucas", "2016-06-24", "07 11 22 33 44");

    vec![dubois, lefebvre, moreau]
}

fn appointment(id: &str, patient_id: &str, date: &str, time: &str, kind: &str) -> Appointment {
    Appointment {
        id: id.to_string(),
        patient_id: patient_id.to_string(),
        date: date.to_string(),
        time: Some(time.to_string()),
        duration_minutes: Some(20),
        kind: Some(kind.to_string()),
        status: AppointmentStatus::Scheduled,
        notes: None,
        extra: Extra::new(),
    }
}

fn seed_appointments() -> Vec<Appointment> {
    let mut follow_up = appointment("1", "2", "2024-03-04", "09:00", "suivi");
    follow_up.status = AppointmentStatus::Completed;

    vec![
        follow_up,
        appointment("2", "1", "2024-03-05", "10:30", "consultation"),
        appointment("3", "3", "2024-03-05", "16:40", "vaccination"),
        appointment("4", "2", "2024-06-03", "09:00", "suivi"),
    ]
}

fn supply(id: &str, name: &str, category: &str, quantity: u32, minimum: u32, unit: &str) -> Supply {
    Supply {
        id: id.to_string(),
        name: name.to_string(),
        category: Some(category.to_string()),
        quantity,
        minimum_quantity: minimum,
        unit: Some(unit.to_string()),
        supplier: Some("Pharma Distribution".to_string()),
        extra: Extra::new(),
    }
}

fn seed_supplies() -> Vec<Supply> {
    vec![
        supply("1", "Compresses stériles", "pansements", 120, 50, "boîte"),
        supply("2", "Gants nitrile M", "protection", 8, 10, "boîte"),
        supply("3", "Seringues 5 ml", "injection", 200, 100, "pièce"),
        supply("4", "Abaisse-langues", "examen", 40, 20, "boîte"),
    ]
}

fn seed_absences() -> Vec<Absence> {
    vec![Absence {
        id: "1".to_string(),
        staff_name: "Dr. Bernard".to_string(),
        start_date: "2024-08-05".to_string(),
        end_date: "2024-08-23".to_string(),
        user_id: Some("2".to_string()),
        reason: Some("congés".to_string()),
        notes: None,
        extra: Extra::new(),
    }]
}

fn user(id: &str, username: &str, name: &str, role: UserRole, email: &str) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        name: name.to_string(),
        role,
        email: Some(email.to_string()),
        active: true,
        extra: Extra::new(),
    }
}

fn seed_users() -> Vec<User> {
    vec![
        user("1", "admin", "Administrateur", UserRole::Admin, "admin@cabinet.example.fr"),
        user("2", "pbernard", "Dr. Paul Bernard", UserRole::Doctor, "p.bernard@cabinet.example.fr"),
        user("3", "smartin", "Sophie Martin", UserRole::Secretary, "accueil@cabinet.example.fr"),
    ]
}

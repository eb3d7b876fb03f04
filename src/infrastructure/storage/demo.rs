use crate::core::errors::MedipassError;
use crate::core::models::{
    appointment::Appointment,
    doctor::Doctor,
    medical_record::MedicalRecord,
    patient::Patient,
    user::{Role, User},
};
use chrono::Utc;
use serde::Deserialize;

const DEMO_DATA: &str = include_str!("demo_data.json");

/// Password accepted for every demo account.
pub const DEMO_PASSWORD: &str = "password123";

#[derive(Deserialize)]
struct DemoUser {
    id: String,
    name: String,
    email: String,
    role: Role,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataset {
    users: Vec<DemoUser>,
    patients: Vec<Patient>,
    doctors: Vec<Doctor>,
    appointments: Vec<Appointment>,
    medical_records: Vec<MedicalRecord>,
}

pub struct DemoDataset {
    pub users: Vec<User>,
    pub patients: Vec<Patient>,
    pub doctors: Vec<Doctor>,
    pub appointments: Vec<Appointment>,
    pub medical_records: Vec<MedicalRecord>,
}

impl DemoDataset {
    /// Parses the embedded dataset. Every demo user gets `password_hash`,
    /// which should be a hash of [`DEMO_PASSWORD`].
    pub fn load(password_hash: &str) -> Result<Self, MedipassError> {
        let raw: RawDataset = serde_json::from_str(DEMO_DATA)?;
        let created_at = Utc::now();
        Ok(DemoDataset {
            users: raw
                .users
                .into_iter()
                .map(|u| User {
                    id: u.id,
                    name: u.name,
                    email: u.email,
                    password_hash: password_hash.to_string(),
                    role: u.role,
                    created_at,
                })
                .collect(),
            patients: raw.patients,
            doctors: raw.doctors,
            appointments: raw.appointments,
            medical_records: raw.medical_records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_profiles_reference_demo_users() {
        let dataset = DemoDataset::load("hash").unwrap();

        let patient_user = dataset.users.iter().find(|u| u.role == Role::Patient).unwrap();
        let doctor_user = dataset.users.iter().find(|u| u.role == Role::Doctor).unwrap();

        assert!(dataset.patients.iter().any(|p| p.user_id == patient_user.id));
        assert!(dataset.doctors.iter().any(|d| d.user_id == doctor_user.id));
        assert!(dataset.users.iter().all(|u| u.password_hash == "hash"));
        assert_eq!(dataset.appointments.len(), 2);
        assert_eq!(dataset.medical_records.len(), 2);
    }
}

use crate::core::errors::MedipassError;
use crate::core::models::{
    Profile,
    appointment::{Appointment, sort_by_schedule},
    doctor::Doctor,
    medical_record::{MedicalRecord, sort_newest_first},
    patient::Patient,
    user::User,
};
use crate::infrastructure::storage::demo::DemoDataset;
use crate::infrastructure::storage::{DataSource, Storage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local store. Seeded with the demo dataset it serves as the mock
/// data source; empty it backs the service tests.
///
/// Lock order for multi-collection writes: `users_by_email`, `users`,
/// `patients`, `doctors`.
#[derive(Clone)]
pub struct InMemoryStorage {
    users: Arc<RwLock<HashMap<String, User>>>,
    users_by_email: Arc<RwLock<HashMap<String, String>>>,
    patients: Arc<RwLock<HashMap<String, Patient>>>,
    doctors: Arc<RwLock<HashMap<String, Doctor>>>,
    appointments: Arc<RwLock<HashMap<String, Appointment>>>,
    medical_records: Arc<RwLock<HashMap<String, MedicalRecord>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            users: Arc::new(RwLock::new(HashMap::new())),
            users_by_email: Arc::new(RwLock::new(HashMap::new())),
            patients: Arc::new(RwLock::new(HashMap::new())),
            doctors: Arc::new(RwLock::new(HashMap::new())),
            appointments: Arc::new(RwLock::new(HashMap::new())),
            medical_records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn seeded(dataset: DemoDataset) -> Self {
        InMemoryStorage {
            users_by_email: Arc::new(RwLock::new(
                dataset.users.iter().map(|u| (u.email.clone(), u.id.clone())).collect(),
            )),
            users: Arc::new(RwLock::new(
                dataset.users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            )),
            patients: Arc::new(RwLock::new(
                dataset.patients.into_iter().map(|p| (p.id.clone(), p)).collect(),
            )),
            doctors: Arc::new(RwLock::new(
                dataset.doctors.into_iter().map(|d| (d.id.clone(), d)).collect(),
            )),
            appointments: Arc::new(RwLock::new(
                dataset.appointments.into_iter().map(|a| (a.id.clone(), a)).collect(),
            )),
            medical_records: Arc::new(RwLock::new(
                dataset.medical_records.into_iter().map(|r| (r.id.clone(), r)).collect(),
            )),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    fn data_source(&self) -> DataSource {
        DataSource::Mock
    }

    async fn register_account(&self, user: User, profile: Profile) -> Result<(), MedipassError> {
        let mut users_by_email = self.users_by_email.write().await;
        let mut users = self.users.write().await;
        let mut patients = self.patients.write().await;
        let mut doctors = self.doctors.write().await;

        if users_by_email.contains_key(&user.email) {
            return Err(MedipassError::EmailAlreadyExists);
        }
        match &profile {
            Profile::Doctor(doctor) => {
                if doctors.values().any(|d| d.license_number == doctor.license_number) {
                    return Err(MedipassError::LicenseNumberAlreadyExists);
                }
            }
            Profile::Patient(patient) => {
                if patients.values().any(|p| p.medipass_id == patient.medipass_id) {
                    return Err(MedipassError::StorageError(format!(
                        "Medipass id {} already assigned",
                        patient.medipass_id
                    )));
                }
            }
        }

        users_by_email.insert(user.email.clone(), user.id.clone());
        users.insert(user.id.clone(), user);
        match profile {
            Profile::Patient(patient) => {
                patients.insert(patient.id.clone(), patient);
            }
            Profile::Doctor(doctor) => {
                doctors.insert(doctor.id.clone(), doctor);
            }
        }
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, MedipassError> {
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, MedipassError> {
        let users_by_email = self.users_by_email.read().await;
        let users = self.users.read().await;
        Ok(users_by_email.get(email).and_then(|id| users.get(id).cloned()))
    }

    async fn get_patient(&self, patient_id: &str) -> Result<Option<Patient>, MedipassError> {
        let patients = self.patients.read().await;
        Ok(patients.get(patient_id).cloned())
    }

    async fn get_patient_by_user(&self, user_id: &str) -> Result<Option<Patient>, MedipassError> {
        let patients = self.patients.read().await;
        Ok(patients.values().find(|p| p.user_id == user_id).cloned())
    }

    async fn save_patient(&self, patient: Patient) -> Result<(), MedipassError> {
        let mut patients = self.patients.write().await;
        patients.insert(patient.id.clone(), patient);
        Ok(())
    }

    async fn get_doctor(&self, doctor_id: &str) -> Result<Option<Doctor>, MedipassError> {
        let doctors = self.doctors.read().await;
        Ok(doctors.get(doctor_id).cloned())
    }

    async fn get_doctor_by_user(&self, user_id: &str) -> Result<Option<Doctor>, MedipassError> {
        let doctors = self.doctors.read().await;
        Ok(doctors.values().find(|d| d.user_id == user_id).cloned())
    }

    async fn save_doctor(&self, doctor: Doctor) -> Result<(), MedipassError> {
        let mut doctors = self.doctors.write().await;
        if doctors
            .values()
            .any(|d| d.id != doctor.id && d.license_number == doctor.license_number)
        {
            return Err(MedipassError::LicenseNumberAlreadyExists);
        }
        doctors.insert(doctor.id.clone(), doctor);
        Ok(())
    }

    async fn save_appointment(&self, appointment: Appointment) -> Result<(), MedipassError> {
        let mut appointments = self.appointments.write().await;
        appointments.insert(appointment.id.clone(), appointment);
        Ok(())
    }

    async fn get_appointment(&self, appointment_id: &str) -> Result<Option<Appointment>, MedipassError> {
        let appointments = self.appointments.read().await;
        Ok(appointments.get(appointment_id).cloned())
    }

    async fn get_patient_appointments(&self, patient_id: &str) -> Result<Vec<Appointment>, MedipassError> {
        let appointments = self.appointments.read().await;
        let mut result: Vec<Appointment> = appointments
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        sort_by_schedule(&mut result);
        Ok(result)
    }

    async fn get_doctor_appointments(&self, doctor_id: &str) -> Result<Vec<Appointment>, MedipassError> {
        let appointments = self.appointments.read().await;
        let mut result: Vec<Appointment> = appointments
            .values()
            .filter(|a| a.doctor_id == doctor_id)
            .cloned()
            .collect();
        sort_by_schedule(&mut result);
        Ok(result)
    }

    async fn save_medical_record(&self, record: MedicalRecord) -> Result<(), MedipassError> {
        let mut records = self.medical_records.write().await;
        records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get_medical_record(&self, record_id: &str) -> Result<Option<MedicalRecord>, MedipassError> {
        let records = self.medical_records.read().await;
        Ok(records.get(record_id).cloned())
    }

    async fn get_patient_medical_records(&self, patient_id: &str) -> Result<Vec<MedicalRecord>, MedipassError> {
        let records = self.medical_records.read().await;
        let mut result: Vec<MedicalRecord> = records
            .values()
            .filter(|r| r.patient_id == patient_id)
            .cloned()
            .collect();
        sort_newest_first(&mut result);
        Ok(result)
    }
}

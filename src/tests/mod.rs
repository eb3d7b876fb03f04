mod api_tests;
mod doctor_tests;

use crate::auth::AuthUser;
use crate::auth::jwt::JwtService;
use crate::core::models::{
    appointment::{Appointment, AppointmentRequest, AppointmentType},
    user::{Registration, Role},
};
use crate::core::services::MedipassService;
use crate::infrastructure::audit::in_memory::InMemoryAuditLog;
use crate::infrastructure::storage::{in_memory::InMemoryStorage, seeded_demo_storage};
use chrono::{Days, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "secret123";

pub fn create_test_service() -> MedipassService {
    create_audited_test_service().0
}

/// Test service that also hands back its audit log for inspection.
pub fn create_audited_test_service() -> (MedipassService, Arc<InMemoryAuditLog>) {
    let audit = Arc::new(InMemoryAuditLog::new());
    let service = MedipassService::new(
        Arc::new(InMemoryStorage::new()),
        audit.clone(),
        JwtService::new(TEST_SECRET, Duration::from_secs(3600)),
        4,
    );
    (service, audit)
}

/// Service over the embedded demo dataset.
pub async fn create_demo_service() -> MedipassService {
    let storage = seeded_demo_storage(4).await.unwrap();
    MedipassService::new(
        Arc::new(storage),
        Arc::new(InMemoryAuditLog::new()),
        JwtService::new(TEST_SECRET, Duration::from_secs(3600)),
        4,
    )
}

pub fn patient_registration(email: &str) -> Registration {
    Registration {
        name: "John Doe".to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        role: Some(Role::Patient),
        ..Default::default()
    }
}

pub fn doctor_registration(email: &str, license_number: &str) -> Registration {
    Registration {
        name: "Dr. Jane Smith".to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        role: Some(Role::Doctor),
        specialty: Some("Cardiology".to_string()),
        license_number: Some(license_number.to_string()),
        hospital_affiliation: Some("General Hospital".to_string()),
    }
}

pub async fn register_patient(service: &MedipassService, email: &str) -> AuthUser {
    let user = service.register(patient_registration(email)).await.unwrap();
    AuthUser {
        id: user.id,
        role: user.role,
    }
}

pub async fn register_doctor(service: &MedipassService, email: &str, license_number: &str) -> AuthUser {
    let user = service
        .register(doctor_registration(email, license_number))
        .await
        .unwrap();
    AuthUser {
        id: user.id,
        role: user.role,
    }
}

pub fn days_from_today(days: u64) -> NaiveDate {
    Utc::now().date_naive() + Days::new(days)
}

pub fn appointment_request(doctor_id: &str, date: NaiveDate, time: &str) -> AppointmentRequest {
    AppointmentRequest {
        doctor_id: doctor_id.to_string(),
        date,
        time: time.to_string(),
        kind: AppointmentType::InPerson,
        reason_for_visit: Some("Chest pain".to_string()),
        location: None,
    }
}

/// Registers a doctor and a patient and books one appointment between them.
pub async fn patient_with_appointment(service: &MedipassService) -> (AuthUser, AuthUser, Appointment) {
    let doctor = register_doctor(service, "doctor@clinic.com", "LIC-001").await;
    let patient = register_patient(service, "patient@clinic.com").await;
    let doctor_id = service.get_doctor_profile(&doctor).await.unwrap().id;
    let appointment = service
        .book_appointment(&patient, appointment_request(&doctor_id, days_from_today(7), "10:30"))
        .await
        .unwrap();
    (doctor, patient, appointment)
}

use crate::auth::password::hash_password;
use crate::config::{Config, DataSourceMode};
use crate::core::errors::MedipassError;
use crate::core::models::{
    Profile, appointment::Appointment, doctor::Doctor, medical_record::MedicalRecord, patient::Patient, user::User,
};
use crate::infrastructure::audit::{AuditLog, in_memory::InMemoryAuditLog};
use async_trait::async_trait;
use demo::{DEMO_PASSWORD, DemoDataset};
use in_memory::InMemoryStorage;
use serde::Serialize;
use sqlite::SqliteStorage;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Mock,
}

/// Data-access interface shared by every handler. The implementation is
/// picked once at startup and never swapped afterwards.
#[async_trait]
pub trait Storage: Send + Sync {
    fn data_source(&self) -> DataSource;

    /// Persists the user and its profile as one unit. Fails with
    /// `EmailAlreadyExists` / `LicenseNumberAlreadyExists` without writing
    /// anything.
    async fn register_account(&self, user: User, profile: Profile) -> Result<(), MedipassError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, MedipassError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, MedipassError>;

    async fn get_patient(&self, patient_id: &str) -> Result<Option<Patient>, MedipassError>;
    async fn get_patient_by_user(&self, user_id: &str) -> Result<Option<Patient>, MedipassError>;
    async fn save_patient(&self, patient: Patient) -> Result<(), MedipassError>;

    async fn get_doctor(&self, doctor_id: &str) -> Result<Option<Doctor>, MedipassError>;
    async fn get_doctor_by_user(&self, user_id: &str) -> Result<Option<Doctor>, MedipassError>;
    /// Fails with `LicenseNumberAlreadyExists` if another doctor holds the license.
    async fn save_doctor(&self, doctor: Doctor) -> Result<(), MedipassError>;

    async fn save_appointment(&self, appointment: Appointment) -> Result<(), MedipassError>;
    async fn get_appointment(&self, appointment_id: &str) -> Result<Option<Appointment>, MedipassError>;
    async fn get_patient_appointments(&self, patient_id: &str) -> Result<Vec<Appointment>, MedipassError>;
    async fn get_doctor_appointments(&self, doctor_id: &str) -> Result<Vec<Appointment>, MedipassError>;

    async fn save_medical_record(&self, record: MedicalRecord) -> Result<(), MedipassError>;
    async fn get_medical_record(&self, record_id: &str) -> Result<Option<MedicalRecord>, MedipassError>;
    async fn get_patient_medical_records(&self, patient_id: &str) -> Result<Vec<MedicalRecord>, MedipassError>;
}

pub mod demo;
pub mod in_memory;
pub mod sqlite;

/// Storage plus the audit log that lives beside it.
#[derive(Clone)]
pub struct Backends {
    pub storage: Arc<dyn Storage>,
    pub audit: Arc<dyn AuditLog>,
}

impl Backends {
    fn live(storage: SqliteStorage) -> Self {
        let storage = Arc::new(storage);
        Backends {
            storage: storage.clone(),
            audit: storage,
        }
    }

    fn demo(storage: InMemoryStorage) -> Self {
        Backends {
            storage: Arc::new(storage),
            audit: Arc::new(InMemoryAuditLog::new()),
        }
    }
}

/// Resolves the configured data source into storage and audit handles.
///
/// `Auto` probes the database and falls back to the seeded in-memory store
/// when it is unreachable; `Live` fails instead of falling back.
pub async fn select_storage(config: &Config) -> Result<Backends, MedipassError> {
    match config.data_source {
        DataSourceMode::Mock => {
            tracing::info!("Using demo data source");
            Ok(Backends::demo(seeded_demo_storage(config.bcrypt_cost).await?))
        }
        DataSourceMode::Live => {
            let storage = SqliteStorage::connect(&config.database_url).await?;
            tracing::info!("Connected to database");
            Ok(Backends::live(storage))
        }
        DataSourceMode::Auto => match SqliteStorage::connect(&config.database_url).await {
            Ok(storage) => {
                tracing::info!("Connected to database");
                Ok(Backends::live(storage))
            }
            Err(err) => {
                tracing::warn!(error = %err, "Database unavailable, falling back to demo data");
                Ok(Backends::demo(seeded_demo_storage(config.bcrypt_cost).await?))
            }
        },
    }
}

pub async fn seeded_demo_storage(bcrypt_cost: u32) -> Result<InMemoryStorage, MedipassError> {
    let password_hash = hash_password(DEMO_PASSWORD, bcrypt_cost).await?;
    Ok(InMemoryStorage::seeded(DemoDataset::load(&password_hash)?))
}

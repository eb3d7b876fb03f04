use crate::core::errors::MedipassError;
use crate::core::models::{
    Profile,
    appointment::{Appointment, sort_by_schedule},
    audit::AuditEntry,
    doctor::Doctor,
    medical_record::{MedicalRecord, sort_newest_first},
    patient::Patient,
    user::User,
};
use crate::infrastructure::audit::AuditLog;
use crate::infrastructure::storage::{DataSource, Storage};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

// Each collection keeps the full JSON document next to the columns that carry
// lookups and uniqueness constraints.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        document TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS patients (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL UNIQUE REFERENCES users(id),
        medipass_id TEXT NOT NULL UNIQUE,
        document TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS doctors (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL UNIQUE REFERENCES users(id),
        license_number TEXT NOT NULL UNIQUE,
        document TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS appointments (
        id TEXT PRIMARY KEY,
        patient_id TEXT NOT NULL,
        doctor_id TEXT NOT NULL,
        document TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS appointments_patient_idx ON appointments (patient_id)",
    "CREATE INDEX IF NOT EXISTS appointments_doctor_idx ON appointments (doctor_id)",
    "CREATE TABLE IF NOT EXISTS medical_records (
        id TEXT PRIMARY KEY,
        patient_id TEXT NOT NULL,
        document TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS medical_records_patient_idx ON medical_records (patient_id)",
    "CREATE TABLE IF NOT EXISTS audit_entries (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        patient_id TEXT,
        document TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS audit_entries_patient_idx ON audit_entries (patient_id)",
];

const UPSERT_PATIENT: &str = "INSERT INTO patients (id, user_id, medipass_id, document) VALUES (?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET medipass_id = excluded.medipass_id, document = excluded.document";
const UPSERT_DOCTOR: &str = "INSERT INTO doctors (id, user_id, license_number, document) VALUES (?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET license_number = excluded.license_number, document = excluded.document";

#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens (creating if needed) the database and applies the schema.
    pub async fn connect(database_url: &str) -> Result<Self, MedipassError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(5));
        if database_url.contains(":memory:") {
            // Every connection to `:memory:` opens a separate database.
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        } else {
            pool_options = pool_options.max_connections(5);
        }
        let pool = pool_options.connect_with(options).await?;
        let storage = SqliteStorage { pool };
        storage.migrate().await?;
        Ok(storage)
    }

    async fn migrate(&self) -> Result<(), MedipassError> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        debug!("SQLite schema ready");
        Ok(())
    }

    async fn fetch_one<T: DeserializeOwned + Send>(&self, sql: &str, key: &str) -> Result<Option<T>, MedipassError> {
        let document = sqlx::query_scalar::<_, String>(sql).bind(key).fetch_optional(&self.pool).await?;
        match document {
            Some(document) => Ok(Some(serde_json::from_str(&document)?)),
            None => Ok(None),
        }
    }

    async fn fetch_all<T: DeserializeOwned + Send>(&self, sql: &str, key: &str) -> Result<Vec<T>, MedipassError> {
        let documents = sqlx::query_scalar::<_, String>(sql).bind(key).fetch_all(&self.pool).await?;
        documents
            .iter()
            .map(|document| serde_json::from_str(document).map_err(MedipassError::from))
            .collect()
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    fn data_source(&self) -> DataSource {
        DataSource::Live
    }

    async fn register_account(&self, user: User, profile: Profile) -> Result<(), MedipassError> {
        let user_document = serde_json::to_string(&user)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO users (id, email, document) VALUES (?, ?, ?)")
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user_document)
            .execute(&mut *tx)
            .await?;

        match &profile {
            Profile::Patient(patient) => {
                sqlx::query(UPSERT_PATIENT)
                    .bind(&patient.id)
                    .bind(&patient.user_id)
                    .bind(&patient.medipass_id)
                    .bind(serde_json::to_string(patient)?)
                    .execute(&mut *tx)
                    .await?;
            }
            Profile::Doctor(doctor) => {
                sqlx::query(UPSERT_DOCTOR)
                    .bind(&doctor.id)
                    .bind(&doctor.user_id)
                    .bind(&doctor.license_number)
                    .bind(serde_json::to_string(doctor)?)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        // Dropping `tx` on any early return above rolls back the user insert.
        tx.commit().await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, MedipassError> {
        self.fetch_one("SELECT document FROM users WHERE id = ?", user_id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, MedipassError> {
        self.fetch_one("SELECT document FROM users WHERE email = ?", email).await
    }

    async fn get_patient(&self, patient_id: &str) -> Result<Option<Patient>, MedipassError> {
        self.fetch_one("SELECT document FROM patients WHERE id = ?", patient_id)
            .await
    }

    async fn get_patient_by_user(&self, user_id: &str) -> Result<Option<Patient>, MedipassError> {
        self.fetch_one("SELECT document FROM patients WHERE user_id = ?", user_id)
            .await
    }

    async fn save_patient(&self, patient: Patient) -> Result<(), MedipassError> {
        sqlx::query(UPSERT_PATIENT)
            .bind(&patient.id)
            .bind(&patient.user_id)
            .bind(&patient.medipass_id)
            .bind(serde_json::to_string(&patient)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_doctor(&self, doctor_id: &str) -> Result<Option<Doctor>, MedipassError> {
        self.fetch_one("SELECT document FROM doctors WHERE id = ?", doctor_id).await
    }

    async fn get_doctor_by_user(&self, user_id: &str) -> Result<Option<Doctor>, MedipassError> {
        self.fetch_one("SELECT document FROM doctors WHERE user_id = ?", user_id)
            .await
    }

    async fn save_doctor(&self, doctor: Doctor) -> Result<(), MedipassError> {
        sqlx::query(UPSERT_DOCTOR)
            .bind(&doctor.id)
            .bind(&doctor.user_id)
            .bind(&doctor.license_number)
            .bind(serde_json::to_string(&doctor)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save_appointment(&self, appointment: Appointment) -> Result<(), MedipassError> {
        sqlx::query(
            "INSERT INTO appointments (id, patient_id, doctor_id, document) VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET document = excluded.document",
        )
        .bind(&appointment.id)
        .bind(&appointment.patient_id)
        .bind(&appointment.doctor_id)
        .bind(serde_json::to_string(&appointment)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_appointment(&self, appointment_id: &str) -> Result<Option<Appointment>, MedipassError> {
        self.fetch_one("SELECT document FROM appointments WHERE id = ?", appointment_id)
            .await
    }

    async fn get_patient_appointments(&self, patient_id: &str) -> Result<Vec<Appointment>, MedipassError> {
        let mut appointments: Vec<Appointment> = self
            .fetch_all("SELECT document FROM appointments WHERE patient_id = ?", patient_id)
            .await?;
        sort_by_schedule(&mut appointments);
        Ok(appointments)
    }

    async fn get_doctor_appointments(&self, doctor_id: &str) -> Result<Vec<Appointment>, MedipassError> {
        let mut appointments: Vec<Appointment> = self
            .fetch_all("SELECT document FROM appointments WHERE doctor_id = ?", doctor_id)
            .await?;
        sort_by_schedule(&mut appointments);
        Ok(appointments)
    }

    async fn save_medical_record(&self, record: MedicalRecord) -> Result<(), MedipassError> {
        sqlx::query(
            "INSERT INTO medical_records (id, patient_id, document) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET document = excluded.document",
        )
        .bind(&record.id)
        .bind(&record.patient_id)
        .bind(serde_json::to_string(&record)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_medical_record(&self, record_id: &str) -> Result<Option<MedicalRecord>, MedipassError> {
        self.fetch_one("SELECT document FROM medical_records WHERE id = ?", record_id)
            .await
    }

    async fn get_patient_medical_records(&self, patient_id: &str) -> Result<Vec<MedicalRecord>, MedipassError> {
        let mut records: Vec<MedicalRecord> = self
            .fetch_all("SELECT document FROM medical_records WHERE patient_id = ?", patient_id)
            .await?;
        sort_newest_first(&mut records);
        Ok(records)
    }
}

#[async_trait]
impl AuditLog for SqliteStorage {
    async fn record(&self, entry: AuditEntry) -> Result<(), MedipassError> {
        let document = serde_json::to_string(&entry)?;
        sqlx::query("INSERT INTO audit_entries (id, patient_id, document) VALUES (?, ?, ?)")
            .bind(&entry.id)
            .bind(&entry.patient_id)
            .bind(&document)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn entries_for_patient(&self, patient_id: &str) -> Result<Vec<AuditEntry>, MedipassError> {
        self.fetch_all(
            "SELECT document FROM audit_entries WHERE patient_id = ? ORDER BY seq DESC",
            patient_id,
        )
        .await
    }
}

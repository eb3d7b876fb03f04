use crate::auth::AuthUser;
use crate::auth::jwt::{Claims, JwtService};
use crate::core::constants::MAX_TEXT_LENGTH;
use crate::core::errors::MedipassError;
use crate::core::models::{audit::AuditEntry, doctor::Doctor, patient::Patient};
use crate::infrastructure::audit::AuditLog;
use crate::infrastructure::storage::{DataSource, Storage};
use chrono::{NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

pub mod auth;
pub mod doctors;
pub mod patients;

pub struct MedipassService {
    storage: Arc<dyn Storage>,
    audit: Arc<dyn AuditLog>,
    jwt_service: JwtService,
    bcrypt_cost: u32,
}

impl MedipassService {
    pub fn new(storage: Arc<dyn Storage>, audit: Arc<dyn AuditLog>, jwt_service: JwtService, bcrypt_cost: u32) -> Self {
        MedipassService {
            storage,
            audit,
            jwt_service,
            bcrypt_cost,
        }
    }

    pub fn data_source(&self) -> DataSource {
        self.storage.data_source()
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, MedipassError> {
        self.jwt_service.validate_token(token)
    }

    async fn log_and_audit(
        &self,
        action: &str,
        actor: &AuthUser,
        patient_id: Option<&str>,
        resource_id: Option<&str>,
    ) -> Result<(), MedipassError> {
        tracing::info!(
            action,
            actor_id = %actor.id,
            actor_role = %actor.role,
            patient_id = patient_id.unwrap_or("-"),
            resource_id = resource_id.unwrap_or("-"),
            "audit"
        );
        self.audit
            .record(AuditEntry {
                id: Uuid::new_v4().to_string(),
                action: action.to_string(),
                actor_id: actor.id.clone(),
                actor_role: actor.role,
                patient_id: patient_id.map(String::from),
                resource_id: resource_id.map(String::from),
                timestamp: Utc::now(),
            })
            .await
    }

    /// Patient profile owned by the caller.
    async fn patient_for(&self, user: &AuthUser) -> Result<Patient, MedipassError> {
        self.storage
            .get_patient_by_user(&user.id)
            .await?
            .ok_or(MedipassError::PatientProfileNotFound)
    }

    /// Doctor profile owned by the caller.
    async fn doctor_for(&self, user: &AuthUser) -> Result<Doctor, MedipassError> {
        self.storage
            .get_doctor_by_user(&user.id)
            .await?
            .ok_or(MedipassError::DoctorProfileNotFound)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn validate_string_input(field: &str, value: &str, max_length: usize) -> Result<(), MedipassError> {
    if value.trim().is_empty() {
        return Err(MedipassError::invalid(
            field,
            format!("Invalid {}", field),
            format!("{} cannot be empty", field),
        ));
    }
    if value.chars().count() > max_length {
        return Err(MedipassError::invalid(
            field,
            format!("{} Too Long", field),
            format!("{} cannot exceed {} characters", field, max_length),
        ));
    }
    if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
        return Err(MedipassError::invalid(
            field,
            format!("Invalid {}", field),
            format!("{} contains invalid characters", field),
        ));
    }
    Ok(())
}

/// Free text may be empty and span lines, but is still bounded.
fn validate_text(field: &str, value: Option<&str>) -> Result<(), MedipassError> {
    match value {
        Some(text) if text.chars().count() > MAX_TEXT_LENGTH => Err(MedipassError::invalid(
            field,
            format!("{} Too Long", field),
            format!("{} cannot exceed {} characters", field, MAX_TEXT_LENGTH),
        )),
        _ => Ok(()),
    }
}

/// Returns the normalized (trimmed, lower-cased) address.
fn validate_email(email: &str) -> Result<String, MedipassError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(MedipassError::MissingField("email".to_string()));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(MedipassError::invalid(
            "email",
            "Invalid email",
            "Please include a valid email",
        ));
    }
    Ok(email)
}

/// `HH:MM`, 24-hour clock.
fn parse_clock(field: &str, value: &str) -> Result<NaiveTime, MedipassError> {
    if value.len() != 5 {
        return Err(invalid_clock(field));
    }
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| invalid_clock(field))
}

fn invalid_clock(field: &str) -> MedipassError {
    MedipassError::invalid(field, "Invalid time", format!("{} must be a time in HH:MM format", field))
}

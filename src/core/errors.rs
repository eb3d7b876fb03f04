use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Serialize)]
pub enum MedipassError {
    #[error("{0} is required")]
    MissingField(String),
    #[error("{}", .1.description)]
    InvalidInput(String, FieldError),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("Email already exists")]
    EmailAlreadyExists,
    #[error("License number already exists")]
    LicenseNumberAlreadyExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthenticated(String),
    #[error("Token is not valid")]
    InvalidToken(String),
    #[error("Access denied: Insufficient permissions")]
    Forbidden,
    #[error("Patient {0} is not under your care")]
    NotUnderCare(String),
    #[error("User not found")]
    UserNotFound(String),
    #[error("Patient profile not found")]
    PatientProfileNotFound,
    #[error("Doctor profile not found")]
    DoctorProfileNotFound,
    #[error("Doctor not found")]
    DoctorNotFound(String),
    #[error("Patient not found")]
    PatientNotFound(String),
    #[error("Appointment not found")]
    AppointmentNotFound(String),
    #[error("Medical record not found")]
    MedicalRecordNotFound(String),
    #[error("Appointment {0} can no longer be changed")]
    AppointmentNotEditable(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl MedipassError {
    pub fn invalid(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        MedipassError::InvalidInput(field.to_string(), FieldError::new(field, title, description))
    }

    /// True for failures the client cannot fix; these are logged and masked.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            MedipassError::InternalServerError(_) | MedipassError::DatabaseError(_) | MedipassError::StorageError(_)
        )
    }
}

impl From<sqlx::Error> for MedipassError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let message = db_err.message();
                if message.contains("users.email") {
                    return MedipassError::EmailAlreadyExists;
                }
                if message.contains("doctors.license_number") {
                    return MedipassError::LicenseNumberAlreadyExists;
                }
            }
        }
        MedipassError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for MedipassError {
    fn from(err: serde_json::Error) -> Self {
        MedipassError::StorageError(format!("Document encoding error: {}", err))
    }
}

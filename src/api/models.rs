use crate::core::errors::MedipassError;
use crate::core::models::{doctor::Doctor, patient::Patient, user::UserSummary};
use crate::infrastructure::storage::DataSource;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub user: UserSummary,
}

#[derive(Serialize, ToSchema)]
pub struct PatientProfile {
    pub patient: Patient,
}

#[derive(Serialize, ToSchema)]
pub struct DoctorProfile {
    pub doctor: Doctor,
}

#[derive(Serialize, ToSchema)]
pub struct PatientProfileResponse {
    pub message: String,
    pub patient: Patient,
}

#[derive(Serialize, ToSchema)]
pub struct DoctorProfileResponse {
    pub message: String,
    pub doctor: Doctor,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub data_source: DataSource,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

pub struct ApiError(pub MedipassError);

impl From<MedipassError> for ApiError {
    fn from(err: MedipassError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            MedipassError::MissingField(_)
            | MedipassError::InvalidInput(..)
            | MedipassError::InvalidBody(_)
            | MedipassError::EmailAlreadyExists
            | MedipassError::LicenseNumberAlreadyExists
            | MedipassError::InvalidCredentials
            | MedipassError::AppointmentNotEditable(_) => StatusCode::BAD_REQUEST,
            MedipassError::Unauthenticated(_) | MedipassError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            MedipassError::Forbidden | MedipassError::NotUnderCare(_) => StatusCode::FORBIDDEN,
            MedipassError::UserNotFound(_)
            | MedipassError::PatientProfileNotFound
            | MedipassError::DoctorProfileNotFound
            | MedipassError::DoctorNotFound(_)
            | MedipassError::PatientNotFound(_)
            | MedipassError::AppointmentNotFound(_)
            | MedipassError::MedicalRecordNotFound(_) => StatusCode::NOT_FOUND,
            MedipassError::InternalServerError(_) | MedipassError::DatabaseError(_) | MedipassError::StorageError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = if self.0.is_internal() {
            tracing::error!(error = %self.0, "Request failed");
            "Server error".to_string()
        } else {
            if let MedipassError::InvalidToken(detail) = &self.0 {
                tracing::debug!(%detail, "Rejected bearer token");
            }
            self.0.to_string()
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// `Json` whose rejections use the `{message}` error body.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError(MedipassError::InvalidBody(rejection.body_text()))),
        }
    }
}

use crate::{
    api::{handlers::AppState, middleware::require_patient, models::*},
    auth::AuthUser,
    core::models::{
        appointment::{Appointment, AppointmentRequest, AppointmentReschedule},
        audit::AuditEntry,
        dashboard::PatientDashboard,
        medical_record::MedicalRecord,
        patient::PatientUpdate,
    },
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
};

/// Patient-only routes, mounted at `/api/patients`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/appointments", get(list_appointments).post(book_appointment))
        .route(
            "/appointments/{id}",
            get(get_appointment)
                .put(reschedule_appointment)
                .delete(cancel_appointment),
        )
        .route("/medical-records", get(list_medical_records))
        .route("/medical-records/{id}", get(get_medical_record))
        .route("/access-logs", get(access_logs))
        .route_layer(middleware::from_fn(require_patient))
}

#[utoipa::path(
    get,
    path = "/api/patients/dashboard",
    tag = "patients",
    responses(
        (status = 200, description = "Profile, appointments, records and stats", body = PatientDashboard),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not a patient", body = ErrorResponse),
        (status = 404, description = "Patient profile not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn dashboard(
    State(service): State<AppState>,
    user: AuthUser,
) -> Result<Json<PatientDashboard>, ApiError> {
    Ok(Json(service.get_patient_dashboard(&user).await?))
}

#[utoipa::path(
    get,
    path = "/api/patients/profile",
    tag = "patients",
    responses(
        (status = 200, description = "Caller's patient profile", body = PatientProfile),
        (status = 403, description = "Not a patient", body = ErrorResponse),
        (status = 404, description = "Patient profile not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn get_profile(
    State(service): State<AppState>,
    user: AuthUser,
) -> Result<Json<PatientProfile>, ApiError> {
    let patient = service.get_patient_profile(&user).await?;
    Ok(Json(PatientProfile { patient }))
}

#[utoipa::path(
    put,
    path = "/api/patients/profile",
    tag = "patients",
    request_body = PatientUpdate,
    responses(
        (status = 200, description = "Profile updated", body = PatientProfileResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Not a patient", body = ErrorResponse),
        (status = 404, description = "Patient profile not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn update_profile(
    State(service): State<AppState>,
    user: AuthUser,
    ApiJson(update): ApiJson<PatientUpdate>,
) -> Result<Json<PatientProfileResponse>, ApiError> {
    let patient = service.update_patient_profile(&user, update).await?;
    Ok(Json(PatientProfileResponse {
        message: "Profile updated successfully".to_string(),
        patient,
    }))
}

#[utoipa::path(
    get,
    path = "/api/patients/appointments",
    tag = "patients",
    responses(
        (status = 200, description = "Appointments by date and time", body = [Appointment]),
        (status = 403, description = "Not a patient", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn list_appointments(
    State(service): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    Ok(Json(service.get_patient_appointments(&user).await?))
}

#[utoipa::path(
    post,
    path = "/api/patients/appointments",
    tag = "patients",
    request_body = AppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Doctor not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn book_appointment(
    State(service): State<AppState>,
    user: AuthUser,
    ApiJson(request): ApiJson<AppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let appointment = service.book_appointment(&user, request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[utoipa::path(
    get,
    path = "/api/patients/appointments/{id}",
    tag = "patients",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment", body = Appointment),
        (status = 404, description = "Appointment not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn get_appointment(
    State(service): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(service.get_patient_appointment(&user, &id).await?))
}

#[utoipa::path(
    put,
    path = "/api/patients/appointments/{id}",
    tag = "patients",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = AppointmentReschedule,
    responses(
        (status = 200, description = "Appointment rescheduled", body = Appointment),
        (status = 400, description = "Invalid input or appointment no longer upcoming", body = ErrorResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn reschedule_appointment(
    State(service): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(change): ApiJson<AppointmentReschedule>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(service.reschedule_appointment(&user, &id, change).await?))
}

#[utoipa::path(
    delete,
    path = "/api/patients/appointments/{id}",
    tag = "patients",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment cancelled", body = Appointment),
        (status = 400, description = "Appointment no longer upcoming", body = ErrorResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn cancel_appointment(
    State(service): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(service.cancel_appointment(&user, &id).await?))
}

#[utoipa::path(
    get,
    path = "/api/patients/medical-records",
    tag = "patients",
    responses(
        (status = 200, description = "Records, newest first", body = [MedicalRecord]),
        (status = 403, description = "Not a patient", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn list_medical_records(
    State(service): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<MedicalRecord>>, ApiError> {
    Ok(Json(service.get_patient_medical_records(&user).await?))
}

#[utoipa::path(
    get,
    path = "/api/patients/medical-records/{id}",
    tag = "patients",
    params(("id" = String, Path, description = "Medical record id")),
    responses(
        (status = 200, description = "Medical record", body = MedicalRecord),
        (status = 404, description = "Medical record not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn get_medical_record(
    State(service): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MedicalRecord>, ApiError> {
    Ok(Json(service.get_patient_medical_record(&user, &id).await?))
}

#[utoipa::path(
    get,
    path = "/api/patients/access-logs",
    tag = "patients",
    responses(
        (status = 200, description = "Doctor actions on the caller's records, newest first", body = [AuditEntry]),
        (status = 403, description = "Not a patient", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn access_logs(
    State(service): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<AuditEntry>>, ApiError> {
    Ok(Json(service.get_access_logs(&user).await?))
}

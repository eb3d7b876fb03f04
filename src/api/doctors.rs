use crate::{
    api::{handlers::AppState, middleware::require_doctor, models::*},
    auth::AuthUser,
    core::models::{
        appointment::{Appointment, AppointmentUpdate},
        dashboard::DoctorDashboard,
        doctor::DoctorUpdate,
        medical_record::{MedicalRecord, NewMedicalRecord},
        patient::PatientOverview,
    },
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
};

/// Doctor-only routes, mounted at `/api/doctors`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/appointments", get(list_appointments))
        .route("/appointments/{id}", get(get_appointment).put(update_appointment))
        .route("/patients", get(list_patients))
        .route("/patients/{id}", get(get_patient))
        .route("/patients/{id}/records", get(patient_records).post(add_record))
        .route_layer(middleware::from_fn(require_doctor))
}

#[utoipa::path(
    get,
    path = "/api/doctors/dashboard",
    tag = "doctors",
    responses(
        (status = 200, description = "Profile, appointments and patient count", body = DoctorDashboard),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not a doctor", body = ErrorResponse),
        (status = 404, description = "Doctor profile not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn dashboard(
    State(service): State<AppState>,
    user: AuthUser,
) -> Result<Json<DoctorDashboard>, ApiError> {
    Ok(Json(service.get_doctor_dashboard(&user).await?))
}

#[utoipa::path(
    get,
    path = "/api/doctors/profile",
    tag = "doctors",
    responses(
        (status = 200, description = "Caller's doctor profile", body = DoctorProfile),
        (status = 403, description = "Not a doctor", body = ErrorResponse),
        (status = 404, description = "Doctor profile not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn get_profile(
    State(service): State<AppState>,
    user: AuthUser,
) -> Result<Json<DoctorProfile>, ApiError> {
    let doctor = service.get_doctor_profile(&user).await?;
    Ok(Json(DoctorProfile { doctor }))
}

#[utoipa::path(
    put,
    path = "/api/doctors/profile",
    tag = "doctors",
    request_body = DoctorUpdate,
    responses(
        (status = 200, description = "Profile updated", body = DoctorProfileResponse),
        (status = 400, description = "Invalid input or duplicate license", body = ErrorResponse),
        (status = 404, description = "Doctor profile not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn update_profile(
    State(service): State<AppState>,
    user: AuthUser,
    ApiJson(update): ApiJson<DoctorUpdate>,
) -> Result<Json<DoctorProfileResponse>, ApiError> {
    let doctor = service.update_doctor_profile(&user, update).await?;
    Ok(Json(DoctorProfileResponse {
        message: "Profile updated successfully".to_string(),
        doctor,
    }))
}

#[utoipa::path(
    get,
    path = "/api/doctors/appointments",
    tag = "doctors",
    responses(
        (status = 200, description = "Appointments by date and time", body = [Appointment]),
        (status = 403, description = "Not a doctor", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn list_appointments(
    State(service): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    Ok(Json(service.get_doctor_appointments(&user).await?))
}

#[utoipa::path(
    get,
    path = "/api/doctors/appointments/{id}",
    tag = "doctors",
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
    Ok(Json(service.get_doctor_appointment(&user, &id).await?))
}

#[utoipa::path(
    put,
    path = "/api/doctors/appointments/{id}",
    tag = "doctors",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = AppointmentUpdate,
    responses(
        (status = 200, description = "Appointment updated", body = Appointment),
        (status = 400, description = "Invalid input or terminal status", body = ErrorResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn update_appointment(
    State(service): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<AppointmentUpdate>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(service.update_doctor_appointment(&user, &id, update).await?))
}

#[utoipa::path(
    get,
    path = "/api/doctors/patients",
    tag = "doctors",
    responses(
        (status = 200, description = "Patients under the caller's care", body = [PatientOverview]),
        (status = 403, description = "Not a doctor", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn list_patients(
    State(service): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<PatientOverview>>, ApiError> {
    Ok(Json(service.get_doctor_patients(&user).await?))
}

#[utoipa::path(
    get,
    path = "/api/doctors/patients/{id}",
    tag = "doctors",
    params(("id" = String, Path, description = "Patient profile id")),
    responses(
        (status = 200, description = "Patient", body = PatientOverview),
        (status = 403, description = "Patient not under the caller's care", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn get_patient(
    State(service): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PatientOverview>, ApiError> {
    Ok(Json(service.get_doctor_patient(&user, &id).await?))
}

#[utoipa::path(
    get,
    path = "/api/doctors/patients/{id}/records",
    tag = "doctors",
    params(("id" = String, Path, description = "Patient profile id")),
    responses(
        (status = 200, description = "Patient's records, newest first", body = [MedicalRecord]),
        (status = 403, description = "Patient not under the caller's care", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn patient_records(
    State(service): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<MedicalRecord>>, ApiError> {
    Ok(Json(service.get_records_for_patient(&user, &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/doctors/patients/{id}/records",
    tag = "doctors",
    params(("id" = String, Path, description = "Patient profile id")),
    request_body = NewMedicalRecord,
    responses(
        (status = 201, description = "Record added", body = MedicalRecord),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Patient not under the caller's care", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn add_record(
    State(service): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(new_record): ApiJson<NewMedicalRecord>,
) -> Result<(StatusCode, Json<MedicalRecord>), ApiError> {
    let record = service.add_medical_record(&user, &id, new_record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

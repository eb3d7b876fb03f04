use crate::api::models::{
    DoctorProfile, DoctorProfileResponse, ErrorResponse, HealthResponse, LoginRequest, LoginResponse, MeResponse,
    PatientProfile, PatientProfileResponse, RegisterResponse,
};
use crate::core::models::{
    appointment::{
        Appointment, AppointmentRequest, AppointmentReschedule, AppointmentStatus, AppointmentType,
        AppointmentUpdate,
    },
    audit::AuditEntry,
    dashboard::{AppointmentStats, DoctorDashboard, MedicalRecordStats, PatientDashboard},
    doctor::{DayOfWeek, Doctor, DoctorUpdate, Education, OfficeHours},
    medical_record::{MedicalRecord, NewMedicalRecord, RecordType},
    patient::{BloodGroup, EmergencyContact, Gender, Medication, Patient, PatientOverview, PatientUpdate},
    user::{Registration, Role, UserSummary},
};
use crate::infrastructure::storage::DataSource;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::health,
        super::handlers::register,
        super::handlers::login,
        super::handlers::me,
        super::patients::dashboard,
        super::patients::get_profile,
        super::patients::update_profile,
        super::patients::list_appointments,
        super::patients::book_appointment,
        super::patients::get_appointment,
        super::patients::reschedule_appointment,
        super::patients::cancel_appointment,
        super::patients::list_medical_records,
        super::patients::get_medical_record,
        super::patients::access_logs,
        super::doctors::dashboard,
        super::doctors::get_profile,
        super::doctors::update_profile,
        super::doctors::list_appointments,
        super::doctors::get_appointment,
        super::doctors::update_appointment,
        super::doctors::list_patients,
        super::doctors::get_patient,
        super::doctors::patient_records,
        super::doctors::add_record
    ),
    components(schemas(
        Registration,
        LoginRequest,
        LoginResponse,
        RegisterResponse,
        MeResponse,
        PatientProfile,
        PatientProfileResponse,
        DoctorProfile,
        DoctorProfileResponse,
        HealthResponse,
        ErrorResponse,
        DataSource,
        Role,
        UserSummary,
        Patient,
        PatientUpdate,
        PatientOverview,
        Gender,
        BloodGroup,
        Medication,
        EmergencyContact,
        Doctor,
        DoctorUpdate,
        DayOfWeek,
        OfficeHours,
        Education,
        Appointment,
        AppointmentRequest,
        AppointmentReschedule,
        AppointmentUpdate,
        AppointmentStatus,
        AppointmentType,
        MedicalRecord,
        NewMedicalRecord,
        RecordType,
        AuditEntry,
        PatientDashboard,
        DoctorDashboard,
        AppointmentStats,
        MedicalRecordStats
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and identity"),
        (name = "patients", description = "Patient-only endpoints"),
        (name = "doctors", description = "Doctor-only endpoints"),
        (name = "system", description = "Service status")
    ),
    info(
        title = "Medipass API",
        description = "Patient and doctor health records",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

use crate::core::patch::{Patch, deserialize_patch};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Cancelled,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentType {
    #[default]
    InPerson,
    Video,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    #[schema(value_type = String, example = "2023-04-15")]
    pub date: NaiveDate,
    #[schema(example = "10:30")]
    pub time: String,
    pub status: AppointmentStatus,
    #[serde(rename = "type", default)]
    pub kind: AppointmentType,
    pub reason_for_visit: Option<String>,
    pub location: Option<String>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub follow_up_required: bool,
    #[schema(value_type = Option<String>, example = "2023-06-01")]
    pub follow_up_date: Option<NaiveDate>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_upcoming(&self) -> bool {
        self.status == AppointmentStatus::Upcoming
    }

    /// Ordering key used by every appointment listing.
    pub fn schedule_key(&self) -> (NaiveDate, &str) {
        (self.date, self.time.as_str())
    }
}

pub fn sort_by_schedule(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| a.schedule_key().cmp(&b.schedule_key()));
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[serde(default)]
    pub doctor_id: String,
    #[schema(value_type = String, example = "2030-04-15")]
    pub date: NaiveDate,
    #[schema(example = "10:30")]
    pub time: String,
    #[serde(rename = "type", default)]
    pub kind: AppointmentType,
    pub reason_for_visit: Option<String>,
    pub location: Option<String>,
}

/// Patient-side changes to an upcoming appointment.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentReschedule {
    #[schema(value_type = Option<String>, example = "2030-04-16")]
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<AppointmentType>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub reason_for_visit: Patch<String>,
}

/// Doctor-side outcome of an appointment.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentUpdate {
    pub status: Option<AppointmentStatus>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub diagnosis: Patch<String>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub notes: Patch<String>,
    pub follow_up_required: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>, example = "2030-06-01")]
    pub follow_up_date: Patch<NaiveDate>,
}

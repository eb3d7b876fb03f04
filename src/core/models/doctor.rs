use crate::core::patch::{Patch, deserialize_patch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OfficeHours {
    pub day: DayOfWeek,
    #[schema(example = "09:00")]
    pub start_time: String,
    #[schema(example = "17:00")]
    pub end_time: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub year: u16,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub user_id: String,
    pub specialty: String,
    pub license_number: String,
    pub hospital_affiliation: Option<String>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub years_of_experience: Option<u16>,
    #[serde(default)]
    pub office_hours: Vec<OfficeHours>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn new(
        id: String,
        user_id: String,
        specialty: String,
        license_number: String,
        hospital_affiliation: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Doctor {
            id,
            user_id,
            specialty,
            license_number,
            hospital_affiliation,
            education: Vec::new(),
            years_of_experience: None,
            office_hours: Vec::new(),
            phone: None,
            address: None,
            bio: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorUpdate {
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub specialty: Patch<String>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub license_number: Patch<String>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub hospital_affiliation: Patch<String>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<Vec<Education>>)]
    pub education: Patch<Vec<Education>>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<u16>)]
    pub years_of_experience: Patch<u16>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<Vec<OfficeHours>>)]
    pub office_hours: Patch<Vec<OfficeHours>>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub phone: Patch<String>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub address: Patch<String>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub bio: Patch<String>,
}

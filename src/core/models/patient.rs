use super::user::UserSummary;
use crate::core::patch::{Patch, deserialize_patch};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub user_id: String,
    pub medipass_id: String,
    #[schema(value_type = Option<String>, example = "1985-05-15")]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
    pub blood_group: Option<BloodGroup>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Blank profile created alongside a new patient account.
    pub fn new(id: String, user_id: String, medipass_id: String, now: DateTime<Utc>) -> Self {
        Patient {
            id,
            user_id,
            medipass_id,
            date_of_birth: None,
            gender: None,
            phone: None,
            address: None,
            medical_history: None,
            blood_group: None,
            allergies: Vec::new(),
            chronic_conditions: Vec::new(),
            medications: Vec::new(),
            emergency_contacts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdate {
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>, example = "1985-05-15")]
    pub date_of_birth: Patch<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<Gender>)]
    pub gender: Patch<Gender>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub phone: Patch<String>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub address: Patch<String>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub medical_history: Patch<String>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<BloodGroup>)]
    pub blood_group: Patch<BloodGroup>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<Vec<String>>)]
    pub allergies: Patch<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<Vec<String>>)]
    pub chronic_conditions: Patch<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<Vec<Medication>>)]
    pub medications: Patch<Vec<Medication>>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<Vec<EmergencyContact>>)]
    pub emergency_contacts: Patch<Vec<EmergencyContact>>,
}

/// A patient as seen by a doctor caring for them.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientOverview {
    pub user: UserSummary,
    pub patient: Patient,
}

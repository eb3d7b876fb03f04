use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecordType {
    Prescription,
    LabReport,
    DoctorNote,
    Imaging,
    Vaccination,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: RecordType,
    pub title: String,
    #[schema(value_type = String, example = "2023-03-01")]
    pub date: NaiveDate,
    pub doctor_name: String,
    pub hospital_name: Option<String>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

/// Newest first; ties broken by creation time.
pub fn sort_newest_first(records: &mut [MedicalRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicalRecord {
    #[serde(rename = "type")]
    pub kind: RecordType,
    #[serde(default)]
    pub title: String,
    #[schema(value_type = Option<String>, example = "2024-03-01")]
    pub date: Option<NaiveDate>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub description: Option<String>,
}

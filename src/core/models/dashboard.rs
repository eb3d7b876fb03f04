use super::{
    appointment::{Appointment, AppointmentStatus},
    doctor::Doctor,
    medical_record::MedicalRecord,
    patient::Patient,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentStats {
    pub total_upcoming: usize,
    pub next_appointment: Option<Appointment>,
    pub pending_follow_ups: usize,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordStats {
    pub total_records: usize,
    pub last_updated_record: Option<MedicalRecord>,
    pub total_doctors_consulted: usize,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDashboard {
    pub patient: Patient,
    pub appointments: Vec<Appointment>,
    pub medical_records: Vec<MedicalRecord>,
    pub appointment_stats: AppointmentStats,
    pub medical_record_stats: MedicalRecordStats,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDashboard {
    pub doctor: Doctor,
    pub appointments: Vec<Appointment>,
    pub todays_appointments: Vec<Appointment>,
    pub total_patients: usize,
}

/// `appointments` must already be in schedule order.
pub fn appointment_stats(appointments: &[Appointment], today: NaiveDate) -> AppointmentStats {
    let upcoming: Vec<&Appointment> = appointments.iter().filter(|a| a.is_upcoming()).collect();
    AppointmentStats {
        total_upcoming: upcoming.len(),
        next_appointment: upcoming.iter().find(|a| a.date >= today).map(|a| (*a).clone()),
        pending_follow_ups: appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Completed && a.follow_up_required)
            .count(),
    }
}

/// `records` must already be newest first.
pub fn medical_record_stats(records: &[MedicalRecord]) -> MedicalRecordStats {
    let doctors: HashSet<&str> = records.iter().map(|r| r.doctor_name.as_str()).collect();
    MedicalRecordStats {
        total_records: records.len(),
        last_updated_record: records.first().cloned(),
        total_doctors_consulted: doctors.len(),
    }
}

pub fn distinct_patients(appointments: &[Appointment]) -> usize {
    appointments
        .iter()
        .map(|a| a.patient_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::appointment::AppointmentType;
    use crate::core::models::medical_record::RecordType;
    use chrono::Utc;

    fn appointment(id: &str, date: NaiveDate, status: AppointmentStatus, follow_up: bool) -> Appointment {
        Appointment {
            id: id.to_string(),
            patient_id: "p1".to_string(),
            doctor_id: "d1".to_string(),
            date,
            time: "10:00".to_string(),
            status,
            kind: AppointmentType::InPerson,
            reason_for_visit: None,
            location: None,
            diagnosis: None,
            notes: None,
            follow_up_required: follow_up,
            follow_up_date: None,
            created_at: Utc::now(),
        }
    }

    fn record(id: &str, date: NaiveDate, doctor_name: &str) -> MedicalRecord {
        MedicalRecord {
            id: id.to_string(),
            patient_id: "p1".to_string(),
            doctor_id: None,
            kind: RecordType::LabReport,
            title: "Blood panel".to_string(),
            date,
            doctor_name: doctor_name.to_string(),
            hospital_name: None,
            file_url: None,
            file_type: None,
            description: None,
            created_at: Utc::now(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn next_appointment_skips_overdue_upcoming_entries() {
        let appointments = vec![
            appointment("a1", day(1), AppointmentStatus::Upcoming, false),
            appointment("a2", day(3), AppointmentStatus::Completed, true),
            appointment("a3", day(12), AppointmentStatus::Upcoming, false),
            appointment("a4", day(20), AppointmentStatus::Cancelled, false),
        ];

        let stats = appointment_stats(&appointments, day(10));

        assert_eq!(stats.total_upcoming, 2);
        assert_eq!(stats.next_appointment.map(|a| a.id), Some("a3".to_string()));
        assert_eq!(stats.pending_follow_ups, 1);
    }

    #[test]
    fn record_stats_count_distinct_doctors() {
        let records = vec![
            record("r2", day(5), "Dr. Jane Smith"),
            record("r1", day(1), "Dr. Jane Smith"),
            record("r0", day(1), "Dr. Omar Haddad"),
        ];

        let stats = medical_record_stats(&records);

        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.total_doctors_consulted, 2);
        assert_eq!(stats.last_updated_record.map(|r| r.id), Some("r2".to_string()));
    }

    #[test]
    fn empty_inputs_produce_empty_stats() {
        let stats = appointment_stats(&[], day(1));
        assert_eq!(stats.total_upcoming, 0);
        assert!(stats.next_appointment.is_none());
        assert!(medical_record_stats(&[]).last_updated_record.is_none());
        assert_eq!(distinct_patients(&[]), 0);
    }
}

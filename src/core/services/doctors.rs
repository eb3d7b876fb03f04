use super::{MedipassService, parse_clock, today, validate_string_input, validate_text};
use crate::auth::AuthUser;
use crate::core::constants::{
    APPOINTMENT_UPDATED, MAX_NAME_LENGTH, MEDICAL_RECORD_ADDED, PATIENT_RECORDS_VIEWED, PROFILE_UPDATED,
};
use crate::core::errors::MedipassError;
use crate::core::models::{
    appointment::{Appointment, AppointmentStatus, AppointmentUpdate},
    dashboard::{DoctorDashboard, distinct_patients},
    doctor::{Doctor, DoctorUpdate, OfficeHours},
    medical_record::{MedicalRecord, NewMedicalRecord},
    patient::{Patient, PatientOverview},
    user::UserSummary,
};
use crate::core::patch::{Patch, apply, apply_list};
use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;

const MAX_YEARS_OF_EXPERIENCE: u16 = 80;

impl MedipassService {
    pub async fn get_doctor_profile(&self, user: &AuthUser) -> Result<Doctor, MedipassError> {
        self.doctor_for(user).await
    }

    /// Applies a partial update. `specialty` and `licenseNumber` may change
    /// but never be cleared.
    pub async fn update_doctor_profile(&self, user: &AuthUser, update: DoctorUpdate) -> Result<Doctor, MedipassError> {
        let mut doctor = self.doctor_for(user).await?;
        validate_doctor_update(&update)?;

        let before = doctor.clone();
        if let Some(specialty) = required_patch("specialty", update.specialty)? {
            doctor.specialty = specialty;
        }
        if let Some(license_number) = required_patch("licenseNumber", update.license_number)? {
            doctor.license_number = license_number;
        }
        apply(&mut doctor.hospital_affiliation, update.hospital_affiliation);
        apply_list(&mut doctor.education, update.education);
        apply(&mut doctor.years_of_experience, update.years_of_experience);
        apply_list(&mut doctor.office_hours, update.office_hours);
        apply(&mut doctor.phone, update.phone);
        apply(&mut doctor.address, update.address);
        apply(&mut doctor.bio, update.bio);

        if doctor == before {
            return Ok(doctor);
        }

        doctor.updated_at = Utc::now();
        self.storage.save_doctor(doctor.clone()).await?;
        self.log_and_audit(PROFILE_UPDATED, user, None, Some(doctor.id.as_str())).await?;
        Ok(doctor)
    }

    pub async fn get_doctor_dashboard(&self, user: &AuthUser) -> Result<DoctorDashboard, MedipassError> {
        let doctor = self.doctor_for(user).await?;
        let appointments = self.storage.get_doctor_appointments(&doctor.id).await?;
        let today = today();
        let todays_appointments = appointments.iter().filter(|a| a.date == today).cloned().collect();

        Ok(DoctorDashboard {
            total_patients: distinct_patients(&appointments),
            doctor,
            appointments,
            todays_appointments,
        })
    }

    pub async fn get_doctor_appointments(&self, user: &AuthUser) -> Result<Vec<Appointment>, MedipassError> {
        let doctor = self.doctor_for(user).await?;
        self.storage.get_doctor_appointments(&doctor.id).await
    }

    pub async fn get_doctor_appointment(&self, user: &AuthUser, appointment_id: &str) -> Result<Appointment, MedipassError> {
        let doctor = self.doctor_for(user).await?;
        self.assigned_appointment(&doctor, appointment_id).await
    }

    /// Records the outcome of an appointment. Status may only move away
    /// from `upcoming`; completed and cancelled are terminal.
    pub async fn update_doctor_appointment(
        &self,
        user: &AuthUser,
        appointment_id: &str,
        update: AppointmentUpdate,
    ) -> Result<Appointment, MedipassError> {
        let doctor = self.doctor_for(user).await?;
        let mut appointment = self.assigned_appointment(&doctor, appointment_id).await?;

        if let Some(status) = update.status {
            if status != appointment.status {
                if !appointment.is_upcoming() {
                    return Err(MedipassError::AppointmentNotEditable(appointment.id));
                }
                appointment.status = status;
            }
        }
        if let Some(Some(diagnosis)) = &update.diagnosis {
            validate_text("diagnosis", Some(diagnosis.as_str()))?;
        }
        if let Some(Some(notes)) = &update.notes {
            validate_text("notes", Some(notes.as_str()))?;
        }
        if let Some(Some(follow_up_date)) = update.follow_up_date {
            if follow_up_date < appointment.date {
                return Err(MedipassError::invalid(
                    "followUpDate",
                    "Invalid follow-up date",
                    "Follow-up date cannot be before the appointment",
                ));
            }
        }

        apply(&mut appointment.diagnosis, update.diagnosis);
        apply(&mut appointment.notes, update.notes);
        if let Some(required) = update.follow_up_required {
            appointment.follow_up_required = required;
        }
        apply(&mut appointment.follow_up_date, update.follow_up_date);

        self.storage.save_appointment(appointment.clone()).await?;
        self.log_and_audit(
            APPOINTMENT_UPDATED,
            user,
            Some(appointment.patient_id.as_str()),
            Some(appointment.id.as_str()),
        )
        .await?;
        Ok(appointment)
    }

    /// Patients sharing at least one appointment with the caller, by name.
    pub async fn get_doctor_patients(&self, user: &AuthUser) -> Result<Vec<PatientOverview>, MedipassError> {
        let doctor = self.doctor_for(user).await?;
        let appointments = self.storage.get_doctor_appointments(&doctor.id).await?;

        let mut seen = HashSet::new();
        let mut patients = Vec::new();
        for appointment in &appointments {
            if !seen.insert(appointment.patient_id.as_str()) {
                continue;
            }
            match self.storage.get_patient(&appointment.patient_id).await? {
                Some(patient) => patients.push(self.overview(patient).await?),
                None => tracing::warn!(
                    patient_id = %appointment.patient_id,
                    appointment_id = %appointment.id,
                    "Appointment references a missing patient"
                ),
            }
        }
        patients.sort_by(|a, b| a.user.name.cmp(&b.user.name));
        Ok(patients)
    }

    pub async fn get_doctor_patient(&self, user: &AuthUser, patient_id: &str) -> Result<PatientOverview, MedipassError> {
        let doctor = self.doctor_for(user).await?;
        let patient = self.patient_under_care(&doctor, patient_id).await?;
        self.overview(patient).await
    }

    pub async fn get_records_for_patient(
        &self,
        user: &AuthUser,
        patient_id: &str,
    ) -> Result<Vec<MedicalRecord>, MedipassError> {
        let doctor = self.doctor_for(user).await?;
        let patient = self.patient_under_care(&doctor, patient_id).await?;
        let records = self.storage.get_patient_medical_records(&patient.id).await?;
        self.log_and_audit(PATIENT_RECORDS_VIEWED, user, Some(patient.id.as_str()), None).await?;
        Ok(records)
    }

    pub async fn add_medical_record(
        &self,
        user: &AuthUser,
        patient_id: &str,
        new_record: NewMedicalRecord,
    ) -> Result<MedicalRecord, MedipassError> {
        let doctor = self.doctor_for(user).await?;
        let patient = self.patient_under_care(&doctor, patient_id).await?;

        let title = new_record.title.trim().to_string();
        if title.is_empty() {
            return Err(MedipassError::MissingField("title".to_string()));
        }
        validate_string_input("title", &title, MAX_NAME_LENGTH)?;
        validate_text("description", new_record.description.as_deref())?;
        validate_text("fileUrl", new_record.file_url.as_deref())?;

        let doctor_name = self
            .storage
            .get_user(&doctor.user_id)
            .await?
            .map(|u| u.name)
            .ok_or_else(|| MedipassError::UserNotFound(doctor.user_id.clone()))?;

        let record = MedicalRecord {
            id: Uuid::new_v4().to_string(),
            patient_id: patient.id.clone(),
            doctor_id: Some(doctor.id.clone()),
            kind: new_record.kind,
            title,
            date: new_record.date.unwrap_or_else(today),
            doctor_name,
            hospital_name: doctor.hospital_affiliation.clone(),
            file_url: new_record.file_url,
            file_type: new_record.file_type,
            description: new_record.description,
            created_at: Utc::now(),
        };

        self.storage.save_medical_record(record.clone()).await?;
        self.log_and_audit(MEDICAL_RECORD_ADDED, user, Some(patient.id.as_str()), Some(record.id.as_str()))
            .await?;
        Ok(record)
    }

    /// Another doctor's appointment is reported as missing.
    async fn assigned_appointment(&self, doctor: &Doctor, appointment_id: &str) -> Result<Appointment, MedipassError> {
        self.storage
            .get_appointment(appointment_id)
            .await?
            .filter(|a| a.doctor_id == doctor.id)
            .ok_or_else(|| MedipassError::AppointmentNotFound(appointment_id.to_string()))
    }

    /// 404 if the patient does not exist, 403 if they never had an
    /// appointment with `doctor`.
    async fn patient_under_care(&self, doctor: &Doctor, patient_id: &str) -> Result<Patient, MedipassError> {
        let patient = self
            .storage
            .get_patient(patient_id)
            .await?
            .ok_or_else(|| MedipassError::PatientNotFound(patient_id.to_string()))?;

        let appointments = self.storage.get_doctor_appointments(&doctor.id).await?;
        if !appointments.iter().any(|a| a.patient_id == patient.id) {
            return Err(MedipassError::NotUnderCare(patient.id));
        }
        Ok(patient)
    }

    async fn overview(&self, patient: Patient) -> Result<PatientOverview, MedipassError> {
        let user = self
            .storage
            .get_user(&patient.user_id)
            .await?
            .ok_or_else(|| MedipassError::UserNotFound(patient.user_id.clone()))?;
        Ok(PatientOverview {
            user: UserSummary::from(&user),
            patient,
        })
    }
}

/// `null` is rejected; a value is trimmed and must not be blank.
fn required_patch(field: &str, patch: Patch<String>) -> Result<Option<String>, MedipassError> {
    match patch {
        None => Ok(None),
        Some(None) => Err(MedipassError::invalid(
            field,
            format!("Invalid {}", field),
            format!("{} cannot be cleared", field),
        )),
        Some(Some(value)) => {
            let value = value.trim().to_string();
            validate_string_input(field, &value, MAX_NAME_LENGTH)?;
            Ok(Some(value))
        }
    }
}

fn validate_doctor_update(update: &DoctorUpdate) -> Result<(), MedipassError> {
    if let Some(Some(years)) = update.years_of_experience {
        if years > MAX_YEARS_OF_EXPERIENCE {
            return Err(MedipassError::invalid(
                "yearsOfExperience",
                "Invalid years of experience",
                format!("yearsOfExperience cannot exceed {}", MAX_YEARS_OF_EXPERIENCE),
            ));
        }
    }
    if let Some(Some(education)) = &update.education {
        for entry in education {
            validate_string_input("institution", &entry.institution, MAX_NAME_LENGTH)?;
            validate_string_input("degree", &entry.degree, MAX_NAME_LENGTH)?;
        }
    }
    if let Some(Some(office_hours)) = &update.office_hours {
        office_hours.iter().try_for_each(validate_office_hours)?;
    }
    for (field, value) in [("phone", &update.phone), ("address", &update.address), ("bio", &update.bio)] {
        if let Some(Some(text)) = value {
            validate_text(field, Some(text.as_str()))?;
        }
    }
    Ok(())
}

fn validate_office_hours(hours: &OfficeHours) -> Result<(), MedipassError> {
    let start = parse_clock("startTime", &hours.start_time)?;
    let end = parse_clock("endTime", &hours.end_time)?;
    if start >= end {
        return Err(MedipassError::invalid(
            "officeHours",
            "Invalid office hours",
            "startTime must be before endTime",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::doctor::DayOfWeek;

    fn hours(start: &str, end: &str) -> OfficeHours {
        OfficeHours {
            day: DayOfWeek::Monday,
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn office_hours_must_be_ordered() {
        assert!(validate_office_hours(&hours("09:00", "17:00")).is_ok());
        assert!(validate_office_hours(&hours("17:00", "09:00")).is_err());
        assert!(validate_office_hours(&hours("09:00", "09:00")).is_err());
        assert!(validate_office_hours(&hours("9am", "17:00")).is_err());
    }

    #[test]
    fn required_fields_cannot_be_cleared() {
        assert_eq!(required_patch("specialty", None).unwrap(), None);
        assert!(required_patch("specialty", Some(None)).is_err());
        assert!(required_patch("specialty", Some(Some("  ".to_string()))).is_err());
        assert_eq!(
            required_patch("specialty", Some(Some(" Neurology ".to_string()))).unwrap(),
            Some("Neurology".to_string())
        );
    }
}

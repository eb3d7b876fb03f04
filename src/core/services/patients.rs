use super::{MedipassService, parse_clock, today, validate_string_input, validate_text};
use crate::auth::AuthUser;
use crate::core::constants::{
    APPOINTMENT_BOOKED, APPOINTMENT_CANCELLED, APPOINTMENT_RESCHEDULED, MAX_NAME_LENGTH, PROFILE_UPDATED,
};
use crate::core::errors::MedipassError;
use crate::core::models::{
    appointment::{Appointment, AppointmentRequest, AppointmentReschedule, AppointmentStatus},
    audit::AuditEntry,
    dashboard::{PatientDashboard, appointment_stats, medical_record_stats},
    medical_record::MedicalRecord,
    patient::{Patient, PatientUpdate},
    user::Role,
};
use crate::core::patch::{apply, apply_list};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

impl MedipassService {
    pub async fn get_patient_profile(&self, user: &AuthUser) -> Result<Patient, MedipassError> {
        self.patient_for(user).await
    }

    /// Applies a partial update. An update that changes nothing is not
    /// written and does not bump `updatedAt`.
    pub async fn update_patient_profile(&self, user: &AuthUser, update: PatientUpdate) -> Result<Patient, MedipassError> {
        let mut patient = self.patient_for(user).await?;
        validate_patient_update(&update)?;

        let before = patient.clone();
        apply(&mut patient.date_of_birth, update.date_of_birth);
        apply(&mut patient.gender, update.gender);
        apply(&mut patient.phone, update.phone);
        apply(&mut patient.address, update.address);
        apply(&mut patient.medical_history, update.medical_history);
        apply(&mut patient.blood_group, update.blood_group);
        apply_list(&mut patient.allergies, update.allergies);
        apply_list(&mut patient.chronic_conditions, update.chronic_conditions);
        apply_list(&mut patient.medications, update.medications);
        apply_list(&mut patient.emergency_contacts, update.emergency_contacts);

        if patient == before {
            return Ok(patient);
        }

        patient.updated_at = Utc::now();
        self.storage.save_patient(patient.clone()).await?;
        self.log_and_audit(PROFILE_UPDATED, user, Some(patient.id.as_str()), Some(patient.id.as_str()))
            .await?;
        Ok(patient)
    }

    pub async fn get_patient_dashboard(&self, user: &AuthUser) -> Result<PatientDashboard, MedipassError> {
        let patient = self.patient_for(user).await?;
        let (appointments, medical_records) = futures::try_join!(
            self.storage.get_patient_appointments(&patient.id),
            self.storage.get_patient_medical_records(&patient.id),
        )?;

        Ok(PatientDashboard {
            appointment_stats: appointment_stats(&appointments, today()),
            medical_record_stats: medical_record_stats(&medical_records),
            patient,
            appointments,
            medical_records,
        })
    }

    pub async fn get_patient_appointments(&self, user: &AuthUser) -> Result<Vec<Appointment>, MedipassError> {
        let patient = self.patient_for(user).await?;
        self.storage.get_patient_appointments(&patient.id).await
    }

    pub async fn get_patient_appointment(
        &self,
        user: &AuthUser,
        appointment_id: &str,
    ) -> Result<Appointment, MedipassError> {
        let patient = self.patient_for(user).await?;
        self.owned_appointment(&patient, appointment_id).await
    }

    pub async fn book_appointment(
        &self,
        user: &AuthUser,
        request: AppointmentRequest,
    ) -> Result<Appointment, MedipassError> {
        let patient = self.patient_for(user).await?;

        let doctor_id = request.doctor_id.trim();
        if doctor_id.is_empty() {
            return Err(MedipassError::MissingField("doctorId".to_string()));
        }
        parse_clock("time", &request.time)?;
        ensure_not_past(request.date)?;
        validate_text("reasonForVisit", request.reason_for_visit.as_deref())?;
        if let Some(location) = request.location.as_deref() {
            validate_string_input("location", location, MAX_NAME_LENGTH)?;
        }

        let doctor = self
            .storage
            .get_doctor(doctor_id)
            .await?
            .ok_or_else(|| MedipassError::DoctorNotFound(doctor_id.to_string()))?;

        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            patient_id: patient.id.clone(),
            doctor_id: doctor.id.clone(),
            date: request.date,
            time: request.time,
            status: AppointmentStatus::Upcoming,
            kind: request.kind,
            reason_for_visit: request.reason_for_visit,
            location: request.location.or(doctor.hospital_affiliation),
            diagnosis: None,
            notes: None,
            follow_up_required: false,
            follow_up_date: None,
            created_at: Utc::now(),
        };

        self.storage.save_appointment(appointment.clone()).await?;
        self.log_and_audit(APPOINTMENT_BOOKED, user, Some(patient.id.as_str()), Some(appointment.id.as_str()))
            .await?;
        Ok(appointment)
    }

    pub async fn reschedule_appointment(
        &self,
        user: &AuthUser,
        appointment_id: &str,
        change: AppointmentReschedule,
    ) -> Result<Appointment, MedipassError> {
        let patient = self.patient_for(user).await?;
        let mut appointment = self.owned_appointment(&patient, appointment_id).await?;
        if !appointment.is_upcoming() {
            return Err(MedipassError::AppointmentNotEditable(appointment.id));
        }

        let before = appointment.clone();
        if let Some(date) = change.date {
            ensure_not_past(date)?;
            appointment.date = date;
        }
        if let Some(time) = change.time {
            parse_clock("time", &time)?;
            appointment.time = time;
        }
        if let Some(kind) = change.kind {
            appointment.kind = kind;
        }
        if let Some(Some(reason)) = &change.reason_for_visit {
            validate_text("reasonForVisit", Some(reason.as_str()))?;
        }
        apply(&mut appointment.reason_for_visit, change.reason_for_visit);

        if appointment == before {
            return Ok(appointment);
        }

        self.storage.save_appointment(appointment.clone()).await?;
        self.log_and_audit(APPOINTMENT_RESCHEDULED, user, Some(patient.id.as_str()), Some(appointment.id.as_str()))
            .await?;
        Ok(appointment)
    }

    pub async fn cancel_appointment(&self, user: &AuthUser, appointment_id: &str) -> Result<Appointment, MedipassError> {
        let patient = self.patient_for(user).await?;
        let mut appointment = self.owned_appointment(&patient, appointment_id).await?;
        if !appointment.is_upcoming() {
            return Err(MedipassError::AppointmentNotEditable(appointment.id));
        }

        appointment.status = AppointmentStatus::Cancelled;
        self.storage.save_appointment(appointment.clone()).await?;
        self.log_and_audit(APPOINTMENT_CANCELLED, user, Some(patient.id.as_str()), Some(appointment.id.as_str()))
            .await?;
        Ok(appointment)
    }

    pub async fn get_patient_medical_records(&self, user: &AuthUser) -> Result<Vec<MedicalRecord>, MedipassError> {
        let patient = self.patient_for(user).await?;
        self.storage.get_patient_medical_records(&patient.id).await
    }

    pub async fn get_patient_medical_record(
        &self,
        user: &AuthUser,
        record_id: &str,
    ) -> Result<MedicalRecord, MedipassError> {
        let patient = self.patient_for(user).await?;
        self.storage
            .get_medical_record(record_id)
            .await?
            .filter(|r| r.patient_id == patient.id)
            .ok_or_else(|| MedipassError::MedicalRecordNotFound(record_id.to_string()))
    }

    /// Actions doctors took on the caller's records, newest first.
    pub async fn get_access_logs(&self, user: &AuthUser) -> Result<Vec<AuditEntry>, MedipassError> {
        let patient = self.patient_for(user).await?;
        let entries = self.audit.entries_for_patient(&patient.id).await?;
        Ok(entries.into_iter().filter(|e| e.actor_role == Role::Doctor).collect())
    }

    /// Someone else's appointment is reported as missing.
    async fn owned_appointment(&self, patient: &Patient, appointment_id: &str) -> Result<Appointment, MedipassError> {
        self.storage
            .get_appointment(appointment_id)
            .await?
            .filter(|a| a.patient_id == patient.id)
            .ok_or_else(|| MedipassError::AppointmentNotFound(appointment_id.to_string()))
    }
}

fn ensure_not_past(date: NaiveDate) -> Result<(), MedipassError> {
    if date < today() {
        return Err(MedipassError::invalid(
            "date",
            "Invalid date",
            "Appointment date cannot be in the past",
        ));
    }
    Ok(())
}

fn validate_patient_update(update: &PatientUpdate) -> Result<(), MedipassError> {
    if let Some(Some(phone)) = &update.phone {
        validate_text("phone", Some(phone.as_str()))?;
    }
    if let Some(Some(address)) = &update.address {
        validate_text("address", Some(address.as_str()))?;
    }
    if let Some(Some(history)) = &update.medical_history {
        validate_text("medicalHistory", Some(history.as_str()))?;
    }
    if let Some(Some(date_of_birth)) = update.date_of_birth {
        if date_of_birth > today() {
            return Err(MedipassError::invalid(
                "dateOfBirth",
                "Invalid date of birth",
                "Date of birth cannot be in the future",
            ));
        }
    }
    for list in [&update.allergies, &update.chronic_conditions] {
        if let Some(Some(items)) = list {
            for item in items {
                validate_string_input("item", item, MAX_NAME_LENGTH)?;
            }
        }
    }
    if let Some(Some(medications)) = &update.medications {
        for medication in medications {
            validate_string_input("medication name", &medication.name, MAX_NAME_LENGTH)?;
        }
    }
    if let Some(Some(contacts)) = &update.emergency_contacts {
        for contact in contacts {
            validate_string_input("emergency contact name", &contact.name, MAX_NAME_LENGTH)?;
            validate_string_input("emergency contact phone", &contact.phone, MAX_NAME_LENGTH)?;
        }
    }
    Ok(())
}

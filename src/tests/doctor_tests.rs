use crate::core::errors::MedipassError;
use crate::core::models::{
    appointment::{AppointmentStatus, AppointmentUpdate},
    doctor::{DayOfWeek, DoctorUpdate},
    medical_record::{NewMedicalRecord, RecordType},
};
use crate::tests::{
    appointment_request, create_test_service, days_from_today, patient_with_appointment, register_doctor,
    register_patient,
};
use chrono::Utc;
use serde_json::json;

fn update(value: serde_json::Value) -> DoctorUpdate {
    serde_json::from_value(value).unwrap()
}

fn lab_report(title: &str) -> NewMedicalRecord {
    NewMedicalRecord {
        kind: RecordType::LabReport,
        title: title.to_string(),
        date: None,
        file_url: None,
        file_type: None,
        description: Some("Lipid panel".to_string()),
    }
}

#[tokio::test]
async fn test_update_doctor_profile() {
    let service = create_test_service();
    let doctor = register_doctor(&service, "doc@x.com", "LIC-1").await;

    let updated = service
        .update_doctor_profile(
            &doctor,
            update(json!({
                "specialty": "Neurology",
                "yearsOfExperience": 12,
                "officeHours": [{"day": "Tuesday", "startTime": "08:00", "endTime": "12:00"}],
                "hospitalAffiliation": null,
                "bio": ""
            })),
        )
        .await
        .unwrap();

    assert_eq!(updated.specialty, "Neurology");
    assert_eq!(updated.license_number, "LIC-1");
    assert_eq!(updated.years_of_experience, Some(12));
    assert_eq!(updated.office_hours[0].day, DayOfWeek::Tuesday);
    assert_eq!(updated.hospital_affiliation, None);
    assert_eq!(updated.bio.as_deref(), Some(""));
    assert_eq!(service.get_doctor_profile(&doctor).await.unwrap(), updated);

    let unchanged = service.update_doctor_profile(&doctor, update(json!({}))).await.unwrap();
    assert_eq!(unchanged, updated);
}

#[tokio::test]
async fn test_update_doctor_profile_validation() {
    let service = create_test_service();
    let doctor = register_doctor(&service, "doc@x.com", "LIC-1").await;
    register_doctor(&service, "other@x.com", "LIC-2").await;

    let result = service
        .update_doctor_profile(&doctor, update(json!({"licenseNumber": "LIC-2"})))
        .await;
    assert!(matches!(result, Err(MedipassError::LicenseNumberAlreadyExists)));

    let result = service
        .update_doctor_profile(&doctor, update(json!({"specialty": null})))
        .await;
    assert!(matches!(result, Err(MedipassError::InvalidInput(..))));

    let result = service
        .update_doctor_profile(
            &doctor,
            update(json!({"officeHours": [{"day": "Monday", "startTime": "17:00", "endTime": "09:00"}]})),
        )
        .await;
    assert!(matches!(result, Err(MedipassError::InvalidInput(..))));

    let bad_day = serde_json::from_value::<DoctorUpdate>(
        json!({"officeHours": [{"day": "Someday", "startTime": "09:00", "endTime": "10:00"}]}),
    );
    assert!(bad_day.is_err());

    let profile = service.get_doctor_profile(&doctor).await.unwrap();
    assert_eq!(profile.license_number, "LIC-1");
    assert_eq!(profile.specialty, "Cardiology");
}

#[tokio::test]
async fn test_complete_appointment_is_terminal() {
    let service = create_test_service();
    let (doctor, patient, appointment) = patient_with_appointment(&service).await;

    let completed = service
        .update_doctor_appointment(
            &doctor,
            &appointment.id,
            AppointmentUpdate {
                status: Some(AppointmentStatus::Completed),
                diagnosis: Some(Some("Angina".to_string())),
                follow_up_required: Some(true),
                follow_up_date: Some(Some(days_from_today(30))),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(completed.status, AppointmentStatus::Completed);
    assert_eq!(completed.diagnosis.as_deref(), Some("Angina"));

    let result = service
        .update_doctor_appointment(
            &doctor,
            &appointment.id,
            AppointmentUpdate {
                status: Some(AppointmentStatus::Cancelled),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(MedipassError::AppointmentNotEditable(_))));

    let noted = service
        .update_doctor_appointment(
            &doctor,
            &appointment.id,
            AppointmentUpdate {
                notes: Some(Some("Reviewed results".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(noted.notes.as_deref(), Some("Reviewed results"));
    assert_eq!(noted.status, AppointmentStatus::Completed);

    let seen_by_patient = service.get_patient_appointment(&patient, &appointment.id).await.unwrap();
    assert_eq!(seen_by_patient, noted);
}

#[tokio::test]
async fn test_follow_up_cannot_precede_appointment() {
    let service = create_test_service();
    let (doctor, _, appointment) = patient_with_appointment(&service).await;

    let result = service
        .update_doctor_appointment(
            &doctor,
            &appointment.id,
            AppointmentUpdate {
                follow_up_date: Some(Some(days_from_today(1))),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(MedipassError::InvalidInput(..))));
}

#[tokio::test]
async fn test_other_doctors_appointment_is_not_found() {
    let service = create_test_service();
    let (_, _, appointment) = patient_with_appointment(&service).await;
    let other = register_doctor(&service, "other@x.com", "LIC-2").await;

    assert!(matches!(
        service.get_doctor_appointment(&other, &appointment.id).await,
        Err(MedipassError::AppointmentNotFound(_))
    ));
    assert!(matches!(
        service
            .update_doctor_appointment(&other, &appointment.id, AppointmentUpdate::default())
            .await,
        Err(MedipassError::AppointmentNotFound(_))
    ));
}

#[tokio::test]
async fn test_doctor_sees_only_patients_under_care() {
    let service = create_test_service();
    let (doctor, patient, _) = patient_with_appointment(&service).await;
    let stranger = register_patient(&service, "stranger@x.com").await;
    let patient_id = service.get_patient_profile(&patient).await.unwrap().id;
    let stranger_id = service.get_patient_profile(&stranger).await.unwrap().id;

    let patients = service.get_doctor_patients(&doctor).await.unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].patient.id, patient_id);
    assert_eq!(patients[0].user.email, "patient@clinic.com");

    let overview = service.get_doctor_patient(&doctor, &patient_id).await.unwrap();
    assert_eq!(overview.user.id, patient.id);

    assert!(matches!(
        service.get_doctor_patient(&doctor, &stranger_id).await,
        Err(MedipassError::NotUnderCare(_))
    ));
    assert!(matches!(
        service.get_records_for_patient(&doctor, &stranger_id).await,
        Err(MedipassError::NotUnderCare(_))
    ));
    assert!(matches!(
        service.get_doctor_patient(&doctor, "missing").await,
        Err(MedipassError::PatientNotFound(_))
    ));
}

#[tokio::test]
async fn test_add_medical_record() {
    let service = create_test_service();
    let (doctor, patient, _) = patient_with_appointment(&service).await;
    let patient_id = service.get_patient_profile(&patient).await.unwrap().id;

    let record = service
        .add_medical_record(&doctor, &patient_id, lab_report("Cholesterol"))
        .await
        .unwrap();

    assert_eq!(record.doctor_name, "Dr. Jane Smith");
    assert_eq!(record.hospital_name.as_deref(), Some("General Hospital"));
    assert_eq!(record.date, Utc::now().date_naive());

    let records = service.get_patient_medical_records(&patient).await.unwrap();
    assert_eq!(records, vec![record.clone()]);
    assert_eq!(
        service.get_records_for_patient(&doctor, &patient_id).await.unwrap(),
        vec![record]
    );

    let result = service
        .add_medical_record(&doctor, &patient_id, lab_report("  "))
        .await;
    assert!(matches!(result, Err(MedipassError::MissingField(_))));
}

#[tokio::test]
async fn test_add_record_requires_care_relationship() {
    let service = create_test_service();
    let (_, patient, _) = patient_with_appointment(&service).await;
    let other = register_doctor(&service, "other@x.com", "LIC-2").await;
    let patient_id = service.get_patient_profile(&patient).await.unwrap().id;

    let result = service
        .add_medical_record(&other, &patient_id, lab_report("Cholesterol"))
        .await;
    assert!(matches!(result, Err(MedipassError::NotUnderCare(_))));
    assert!(service.get_patient_medical_records(&patient).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_doctor_dashboard() {
    let service = create_test_service();
    let (doctor, patient, _) = patient_with_appointment(&service).await;
    let doctor_id = service.get_doctor_profile(&doctor).await.unwrap().id;
    let today = service
        .book_appointment(&patient, appointment_request(&doctor_id, Utc::now().date_naive(), "23:59"))
        .await
        .unwrap();
    let second = register_patient(&service, "second@x.com").await;
    service
        .book_appointment(&second, appointment_request(&doctor_id, days_from_today(2), "11:00"))
        .await
        .unwrap();

    let dashboard = service.get_doctor_dashboard(&doctor).await.unwrap();

    assert_eq!(dashboard.doctor.id, doctor_id);
    assert_eq!(dashboard.appointments.len(), 3);
    assert_eq!(dashboard.todays_appointments.len(), 1);
    assert_eq!(dashboard.todays_appointments[0].id, today.id);
    assert_eq!(dashboard.total_patients, 2);
}

pub mod appointment;
pub mod audit;
pub mod dashboard;
pub mod doctor;
pub mod medical_record;
pub mod patient;
pub mod user;

/// Role-specific document created together with its owning [`user::User`].
#[derive(Clone, Debug)]
pub enum Profile {
    Patient(patient::Patient),
    Doctor(doctor::Doctor),
}

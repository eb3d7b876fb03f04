pub const USER_REGISTERED: &str = "USER_REGISTERED";
pub const PROFILE_UPDATED: &str = "PROFILE_UPDATED";
pub const APPOINTMENT_BOOKED: &str = "APPOINTMENT_BOOKED";
pub const APPOINTMENT_RESCHEDULED: &str = "APPOINTMENT_RESCHEDULED";
pub const APPOINTMENT_CANCELLED: &str = "APPOINTMENT_CANCELLED";
pub const APPOINTMENT_UPDATED: &str = "APPOINTMENT_UPDATED";
pub const PATIENT_RECORDS_VIEWED: &str = "PATIENT_RECORDS_VIEWED";
pub const MEDICAL_RECORD_ADDED: &str = "MEDICAL_RECORD_ADDED";

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_TEXT_LENGTH: usize = 2000;
pub const MIN_PASSWORD_LENGTH: usize = 6;

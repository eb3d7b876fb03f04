pub mod constants;
pub mod errors;
pub mod models;
pub mod patch;
pub mod services;

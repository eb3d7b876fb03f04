pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use api::handlers::{AppState, app};
pub use config::Config;
pub use crate::core::errors::MedipassError;
pub use crate::core::services::MedipassService;

#[cfg(test)]
mod tests;

pub mod doctors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod patients;

// rest_api/src/handlers/mod.rs
//! One module per resource. Handlers extract, validate, call storage and map
//! the outcome; none of them holds state of its own.

pub mod dashboard;
pub mod disease_cases;
pub mod diseases;
pub mod health_alerts;
pub mod health_records;
pub mod patients;
pub mod system;

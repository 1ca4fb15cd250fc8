// models/src/lib.rs
//! Entity model for the HealthWatch migrant-worker surveillance service:
//! stored record shapes, client insert/update shapes with their validators,
//! typed query filters and aggregate result shapes.

pub mod errors;
pub mod filters;
pub mod identifiers;
pub mod medical;
pub mod schema;
pub mod stats;

pub use errors::{FieldError, HealthError, HealthResult, ValidationErrors, ValidationResult};
pub use filters::{DiseaseCaseFilter, PatientFilter};
pub use medical::*;
pub use stats::{DashboardStats, DiseaseStat};

// models/src/medical/mod.rs

pub mod disease;
pub mod disease_case;
pub mod health_alert;
pub mod health_record;
pub mod patient;
pub mod user;

pub use disease::{Disease, DiseaseType, NewDisease};
pub use disease_case::{DiseaseCase, DiseaseCaseUpdate, DiseaseCaseView, NewDiseaseCase};
pub use health_alert::{AlertSeverity, HealthAlert, HealthAlertUpdate, NewHealthAlert};
pub use health_record::{HealthRecord, NewHealthRecord};
pub use patient::{Gender, HealthStatus, NewPatient, Patient, PatientUpdate};
pub use user::{NewUser, User};

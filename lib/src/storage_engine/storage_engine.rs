// lib/src/storage_engine/storage_engine.rs

use async_trait::async_trait;
use models::errors::HealthResult;
use models::filters::{DiseaseCaseFilter, PatientFilter};
use models::medical::{
    Disease, DiseaseCase, DiseaseCaseUpdate, DiseaseCaseView, HealthAlert, HealthAlertUpdate, HealthRecord,
    NewDisease, NewDiseaseCase, NewHealthAlert, NewHealthRecord, NewPatient, NewUser, Patient, PatientUpdate,
    User,
};
use models::stats::{DashboardStats, DiseaseStat};

/// The single access point to persisted surveillance data.
///
/// Lookups by id return `Ok(None)` when the record is absent. Updates against
/// a missing id fail with `HealthError::NotFound`. Inserts that reference a
/// missing patient or disease fail with a validation error naming the field.
#[async_trait]
pub trait HealthStorage: Send + Sync + 'static {
    async fn get_user(&self, id: &str) -> HealthResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> HealthResult<Option<User>>;
    /// Fails with `AlreadyExists` when the username is taken.
    async fn create_user(&self, new_user: NewUser) -> HealthResult<User>;

    /// Most recently registered first.
    async fn get_patients(&self, filter: &PatientFilter) -> HealthResult<Vec<Patient>>;
    async fn get_patients_count(&self) -> HealthResult<u64>;
    async fn get_patient_by_id(&self, id: &str) -> HealthResult<Option<Patient>>;
    /// Assigns the next staff-facing patient id from an atomic sequence.
    async fn create_patient(&self, new_patient: NewPatient) -> HealthResult<Patient>;
    async fn update_patient(&self, id: &str, update: &PatientUpdate) -> HealthResult<Patient>;

    /// All records, or one patient's, latest checkup first.
    async fn get_health_records(&self, patient_id: Option<&str>) -> HealthResult<Vec<HealthRecord>>;
    async fn get_health_record_by_id(&self, id: &str) -> HealthResult<Option<HealthRecord>>;
    async fn create_health_record(&self, new_record: NewHealthRecord) -> HealthResult<HealthRecord>;

    /// Alphabetical by name.
    async fn get_diseases(&self) -> HealthResult<Vec<Disease>>;
    /// Fails with `AlreadyExists` when the name is taken.
    async fn create_disease(&self, new_disease: NewDisease) -> HealthResult<Disease>;

    /// Cases joined with patient name/district and disease name, latest report first.
    async fn get_disease_cases(&self, filter: &DiseaseCaseFilter) -> HealthResult<Vec<DiseaseCaseView>>;
    async fn create_disease_case(&self, new_case: NewDiseaseCase) -> HealthResult<DiseaseCase>;
    async fn update_disease_case(&self, id: &str, update: &DiseaseCaseUpdate) -> HealthResult<DiseaseCase>;
    /// One entry per disease, including those without cases, by count descending.
    async fn get_disease_stats(&self) -> HealthResult<Vec<DiseaseStat>>;

    /// Latest first.
    async fn get_health_alerts(&self, active_only: bool) -> HealthResult<Vec<HealthAlert>>;
    async fn create_health_alert(&self, new_alert: NewHealthAlert) -> HealthResult<HealthAlert>;
    async fn update_health_alert(&self, id: &str, update: &HealthAlertUpdate) -> HealthResult<HealthAlert>;

    async fn get_dashboard_stats(&self) -> HealthResult<DashboardStats>;

    /// Persists buffered writes. Called on shutdown.
    async fn flush(&self) -> HealthResult<()>;

    fn get_type(&self) -> &'static str;
}

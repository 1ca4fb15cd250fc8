// lib/src/storage_engine/sled_storage.rs

use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, info};
use models::errors::{HealthError, HealthResult};
use models::filters::{DiseaseCaseFilter, PatientFilter};
use models::identifiers::format_patient_id;
use models::medical::{
    Disease, DiseaseCase, DiseaseCaseUpdate, DiseaseCaseView, HealthAlert, HealthAlertUpdate, HealthRecord,
    NewDisease, NewDiseaseCase, NewHealthAlert, NewHealthRecord, NewPatient, NewUser, Patient, PatientUpdate,
    User,
};
use models::stats::{sort_disease_stats, DashboardStats, DiseaseStat};
use sled::{Db, Tree};

use crate::storage_engine::config::{StorageConfig, StorageEngineType};
use crate::storage_engine::storage_engine::HealthStorage;
use crate::storage_engine::storage_utils::{
    get_record, insert_unique, next_in_sequence, put_record, read_counter, scan_records, update_record,
};

const PATIENT_SEQUENCE_KEY: &[u8] = b"patient_sequence";

/// Sled-backed storage: one tree per entity kind, secondary trees for the
/// unique username and disease-name constraints, and a counter tree for the
/// patient sequence.
pub struct SledHealthStorage {
    db: Db,
    engine_type: StorageEngineType,
    users: Tree,
    users_by_username: Tree,
    patients: Tree,
    health_records: Tree,
    diseases: Tree,
    diseases_by_name: Tree,
    disease_cases: Tree,
    health_alerts: Tree,
    counters: Tree,
    jurisdiction_code: String,
    patient_id_width: usize,
}

impl SledHealthStorage {
    pub fn new(db: Db, config: &StorageConfig) -> HealthResult<Self> {
        let storage = SledHealthStorage {
            users: db.open_tree("users")?,
            users_by_username: db.open_tree("users_by_username")?,
            patients: db.open_tree("patients")?,
            health_records: db.open_tree("health_records")?,
            diseases: db.open_tree("diseases")?,
            diseases_by_name: db.open_tree("diseases_by_name")?,
            disease_cases: db.open_tree("disease_cases")?,
            health_alerts: db.open_tree("health_alerts")?,
            counters: db.open_tree("counters")?,
            engine_type: config.storage_engine_type,
            jurisdiction_code: config.jurisdiction_code.clone(),
            patient_id_width: config.patient_id_width,
            db,
        };
        storage.seed_patient_sequence()?;
        Ok(storage)
    }

    /// Starts the sequence at the current patient count when the counter row
    /// has never been written, so existing data keeps "count + 1" numbering.
    fn seed_patient_sequence(&self) -> HealthResult<()> {
        let existing = self.patients.len() as u64;
        let seeded = self.counters.compare_and_swap(
            PATIENT_SEQUENCE_KEY,
            None::<&[u8]>,
            Some(existing.to_be_bytes().to_vec()),
        )?;
        match seeded {
            Ok(()) => info!("Seeded patient sequence at {}", existing),
            Err(_) => {
                let current = self.counters.get(PATIENT_SEQUENCE_KEY)?.as_deref().map(read_counter).unwrap_or(0);
                debug!("Patient sequence already at {}", current);
            }
        }
        Ok(())
    }

    fn next_patient_id(&self) -> HealthResult<String> {
        let sequence = next_in_sequence(&self.counters, PATIENT_SEQUENCE_KEY)?;
        Ok(format_patient_id(&self.jurisdiction_code, self.patient_id_width, sequence))
    }

    fn require_patient(&self, id: &str) -> HealthResult<()> {
        if self.patients.contains_key(id.as_bytes())? {
            Ok(())
        } else {
            Err(HealthError::invalid_field("patientId", format!("references unknown patient {}", id)))
        }
    }

    fn require_disease(&self, id: &str) -> HealthResult<()> {
        if self.diseases.contains_key(id.as_bytes())? {
            Ok(())
        } else {
            Err(HealthError::invalid_field("diseaseId", format!("references unknown disease {}", id)))
        }
    }

    fn join_case(
        case: DiseaseCase,
        patients: &HashMap<String, (String, String)>,
        diseases: &HashMap<String, String>,
    ) -> DiseaseCaseView {
        let patient = patients.get(&case.patient_id);
        DiseaseCaseView {
            patient_name: patient.map(|(name, _)| name.clone()),
            patient_district: patient.map(|(_, district)| district.clone()),
            disease_name: diseases.get(&case.disease_id).cloned(),
            case,
        }
    }
}

#[async_trait]
impl HealthStorage for SledHealthStorage {
    async fn get_user(&self, id: &str) -> HealthResult<Option<User>> {
        get_record(&self.users, id)
    }

    async fn get_user_by_username(&self, username: &str) -> HealthResult<Option<User>> {
        match self.users_by_username.get(username.as_bytes())? {
            Some(id) => get_record(&self.users, &String::from_utf8_lossy(&id)),
            None => Ok(None),
        }
    }

    async fn create_user(&self, new_user: NewUser) -> HealthResult<User> {
        let user = tokio::task::spawn_blocking(move || User::from_new_user(new_user))
            .await
            .map_err(|e| HealthError::StorageError(format!("Password hashing task failed: {}", e)))??;
        insert_unique(&self.users_by_username, "username", &self.users, &user.username, &user.id, &user)?;
        info!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    async fn get_patients(&self, filter: &PatientFilter) -> HealthResult<Vec<Patient>> {
        debug!("Listing patients with {:?}", filter);
        let mut patients: Vec<Patient> = scan_records::<Patient>(&self.patients)?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        patients.sort_by(|a, b| {
            b.registered_at
                .cmp(&a.registered_at)
                .then_with(|| b.patient_id.cmp(&a.patient_id))
        });
        Ok(filter.paginate(patients))
    }

    async fn get_patients_count(&self) -> HealthResult<u64> {
        Ok(self.patients.len() as u64)
    }

    async fn get_patient_by_id(&self, id: &str) -> HealthResult<Option<Patient>> {
        get_record(&self.patients, id)
    }

    async fn create_patient(&self, new_patient: NewPatient) -> HealthResult<Patient> {
        let patient_id = self.next_patient_id()?;
        let patient = Patient::from_new(new_patient, patient_id);
        put_record(&self.patients, &patient.id, &patient)?;
        info!("Registered patient {} ({})", patient.patient_id, patient.id);
        Ok(patient)
    }

    async fn update_patient(&self, id: &str, update: &PatientUpdate) -> HealthResult<Patient> {
        update_record(&self.patients, "Patient", id, |patient: &mut Patient| update.apply(patient))
    }

    async fn get_health_records(&self, patient_id: Option<&str>) -> HealthResult<Vec<HealthRecord>> {
        let mut records: Vec<HealthRecord> = scan_records::<HealthRecord>(&self.health_records)?
            .into_iter()
            .filter(|r| patient_id.is_none_or(|p| r.patient_id == p))
            .collect();
        records.sort_by(|a, b| b.checkup_date.cmp(&a.checkup_date).then_with(|| b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn get_health_record_by_id(&self, id: &str) -> HealthResult<Option<HealthRecord>> {
        get_record(&self.health_records, id)
    }

    async fn create_health_record(&self, new_record: NewHealthRecord) -> HealthResult<HealthRecord> {
        self.require_patient(&new_record.patient_id)?;
        let record = HealthRecord::from(new_record);
        put_record(&self.health_records, &record.id, &record)?;
        info!("Logged health record {} for patient {}", record.id, record.patient_id);
        Ok(record)
    }

    async fn get_diseases(&self) -> HealthResult<Vec<Disease>> {
        let mut diseases = scan_records::<Disease>(&self.diseases)?;
        diseases.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(diseases)
    }

    async fn create_disease(&self, new_disease: NewDisease) -> HealthResult<Disease> {
        let disease = Disease::from(new_disease);
        insert_unique(&self.diseases_by_name, "disease name", &self.diseases, &disease.name, &disease.id, &disease)?;
        info!("Cataloged disease {} ({})", disease.name, disease.id);
        Ok(disease)
    }

    async fn get_disease_cases(&self, filter: &DiseaseCaseFilter) -> HealthResult<Vec<DiseaseCaseView>> {
        debug!("Listing disease cases with {:?}", filter);
        let patients: HashMap<String, (String, String)> = scan_records::<Patient>(&self.patients)?
            .into_iter()
            .map(|p| (p.id, (p.name, p.district)))
            .collect();
        let diseases: HashMap<String, String> = scan_records::<Disease>(&self.diseases)?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect();

        let mut views: Vec<DiseaseCaseView> = scan_records::<DiseaseCase>(&self.disease_cases)?
            .into_iter()
            .map(|case| Self::join_case(case, &patients, &diseases))
            .filter(|view| filter.matches(view))
            .collect();
        views.sort_by(|a, b| {
            b.case
                .reported_at
                .cmp(&a.case.reported_at)
                .then_with(|| b.case.id.cmp(&a.case.id))
        });
        Ok(views)
    }

    async fn create_disease_case(&self, new_case: NewDiseaseCase) -> HealthResult<DiseaseCase> {
        let patient_check = self.require_patient(&new_case.patient_id);
        let disease_check = self.require_disease(&new_case.disease_id);
        match (patient_check, disease_check) {
            (Ok(()), Ok(())) => {}
            (Err(HealthError::Validation(mut errors)), Err(HealthError::Validation(more))) => {
                for e in more.into_vec() {
                    errors.push(&e.field, e.message);
                }
                return Err(HealthError::Validation(errors));
            }
            (Err(e), _) | (_, Err(e)) => return Err(e),
        }
        let case = DiseaseCase::from(new_case);
        put_record(&self.disease_cases, &case.id, &case)?;
        info!("Reported disease case {} (disease {}, patient {})", case.id, case.disease_id, case.patient_id);
        Ok(case)
    }

    async fn update_disease_case(&self, id: &str, update: &DiseaseCaseUpdate) -> HealthResult<DiseaseCase> {
        update_record(&self.disease_cases, "Disease case", id, |case: &mut DiseaseCase| update.apply(case))
    }

    async fn get_disease_stats(&self) -> HealthResult<Vec<DiseaseStat>> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for case in scan_records::<DiseaseCase>(&self.disease_cases)? {
            *counts.entry(case.disease_id).or_insert(0) += 1;
        }
        let mut stats: Vec<DiseaseStat> = scan_records::<Disease>(&self.diseases)?
            .into_iter()
            .map(|d| DiseaseStat {
                count: counts.get(&d.id).copied().unwrap_or(0),
                name: d.name,
            })
            .collect();
        sort_disease_stats(&mut stats);
        Ok(stats)
    }

    async fn get_health_alerts(&self, active_only: bool) -> HealthResult<Vec<HealthAlert>> {
        let mut alerts: Vec<HealthAlert> = scan_records::<HealthAlert>(&self.health_alerts)?
            .into_iter()
            .filter(|a| !active_only || a.is_active)
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(alerts)
    }

    async fn create_health_alert(&self, new_alert: NewHealthAlert) -> HealthResult<HealthAlert> {
        if let Some(disease_id) = &new_alert.disease_id {
            self.require_disease(disease_id)?;
        }
        let alert = HealthAlert::from(new_alert);
        put_record(&self.health_alerts, &alert.id, &alert)?;
        info!("Issued {:?} alert {} ({})", alert.severity, alert.title, alert.id);
        Ok(alert)
    }

    async fn update_health_alert(&self, id: &str, update: &HealthAlertUpdate) -> HealthResult<HealthAlert> {
        if !self.health_alerts.contains_key(id.as_bytes())? {
            return Err(HealthError::not_found("Health alert", id));
        }
        if let Some(disease_id) = update.new_disease_reference() {
            self.require_disease(disease_id)?;
        }
        update_record(&self.health_alerts, "Health alert", id, |alert: &mut HealthAlert| update.apply(alert))
    }

    async fn get_dashboard_stats(&self) -> HealthResult<DashboardStats> {
        let active_alerts = scan_records::<HealthAlert>(&self.health_alerts)?
            .iter()
            .filter(|a| a.is_active)
            .count() as u64;
        Ok(DashboardStats {
            total_patients: self.patients.len() as u64,
            active_alerts,
            total_screenings: self.health_records.len() as u64,
            total_disease_cases: self.disease_cases.len() as u64,
        })
    }

    async fn flush(&self) -> HealthResult<()> {
        let bytes = self.db.flush_async().await?;
        debug!("Flushed {} bytes to disk", bytes);
        Ok(())
    }

    fn get_type(&self) -> &'static str {
        match self.engine_type {
            StorageEngineType::Sled => "sled",
            StorageEngineType::InMemory => "in_memory",
        }
    }
}

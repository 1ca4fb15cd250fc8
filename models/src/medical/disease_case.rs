// models/src/medical/disease_case.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValidationResult;
use crate::identifiers::new_record_id;
use crate::schema::{PayloadReader, non_empty_string, string, timestamp};

pub const DEFAULT_CASE_STATUS: &str = "active";
pub const DEFAULT_CASE_SEVERITY: &str = "mild";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDiseaseCase {
    pub patient_id: String,
    pub disease_id: String,
    pub diagnosis_date: Option<DateTime<Utc>>,
    pub status: String,
    pub severity: String,
    pub notes: Option<String>,
    pub reported_by: Option<String>,
}

impl NewDiseaseCase {
    pub fn validate(payload: &Value) -> ValidationResult<Self> {
        let mut r = PayloadReader::new(payload)?;
        r.read_only(&["id", "reportedAt"]);
        let patient_id = r.required("patientId", non_empty_string);
        let disease_id = r.required("diseaseId", non_empty_string);
        let diagnosis_date = r.optional("diagnosisDate", timestamp);
        // status and severity are free text; conventional values are not enforced
        let status = r.optional("status", non_empty_string);
        let severity = r.optional("severity", non_empty_string);
        let notes = r.optional("notes", string);
        let reported_by = r.optional("reportedBy", string);
        r.finish(|| NewDiseaseCase {
            patient_id: patient_id.unwrap_or_default(),
            disease_id: disease_id.unwrap_or_default(),
            diagnosis_date,
            status: status.unwrap_or_else(|| DEFAULT_CASE_STATUS.to_string()),
            severity: severity.unwrap_or_else(|| DEFAULT_CASE_SEVERITY.to_string()),
            notes,
            reported_by,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseCase {
    pub id: String,
    pub patient_id: String,
    pub disease_id: String,
    pub diagnosis_date: DateTime<Utc>,
    pub status: String,
    pub severity: String,
    pub notes: Option<String>,
    pub reported_by: Option<String>,
    pub reported_at: DateTime<Utc>,
}

impl From<NewDiseaseCase> for DiseaseCase {
    fn from(new: NewDiseaseCase) -> Self {
        let now = Utc::now();
        DiseaseCase {
            id: new_record_id(),
            patient_id: new.patient_id,
            disease_id: new.disease_id,
            diagnosis_date: new.diagnosis_date.unwrap_or(now),
            status: new.status,
            severity: new.severity,
            notes: new.notes,
            reported_by: new.reported_by,
            reported_at: now,
        }
    }
}

/// A case joined with its patient and disease. The joined columns are `None`
/// when the reference does not resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseCaseView {
    #[serde(flatten)]
    pub case: DiseaseCase,
    pub patient_name: Option<String>,
    pub patient_district: Option<String>,
    pub disease_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiseaseCaseUpdate {
    pub diagnosis_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub severity: Option<String>,
    pub notes: Option<Option<String>>,
}

impl DiseaseCaseUpdate {
    pub fn validate(payload: &Value) -> ValidationResult<Self> {
        let mut r = PayloadReader::new(payload)?;
        r.read_only(&["id", "patientId", "diseaseId", "reportedAt", "reportedBy"]);
        let diagnosis_date = r.patch_required("diagnosisDate", timestamp);
        let status = r.patch_required("status", non_empty_string);
        let severity = r.patch_required("severity", non_empty_string);
        let notes = r.patch("notes", string);
        r.finish(|| DiseaseCaseUpdate { diagnosis_date, status, severity, notes })
    }

    pub fn apply(&self, case: &mut DiseaseCase) {
        if let Some(v) = self.diagnosis_date {
            case.diagnosis_date = v;
        }
        if let Some(v) = &self.status {
            case.status = v.clone();
        }
        if let Some(v) = &self.severity {
            case.severity = v.clone();
        }
        if let Some(v) = &self.notes {
            case.notes = v.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_and_severity_default() {
        let new = NewDiseaseCase::validate(&json!({ "patientId": "p", "diseaseId": "d" })).unwrap();
        assert_eq!(new.status, DEFAULT_CASE_STATUS);
        assert_eq!(new.severity, DEFAULT_CASE_SEVERITY);
    }

    #[test]
    fn free_text_status_is_accepted() {
        let new = NewDiseaseCase::validate(&json!({
            "patientId": "p",
            "diseaseId": "d",
            "status": "under_observation"
        }))
        .unwrap();
        assert_eq!(new.status, "under_observation");
    }

    #[test]
    fn view_flattens_case_fields() {
        let case = DiseaseCase::from(NewDiseaseCase::validate(&json!({ "patientId": "p", "diseaseId": "d" })).unwrap());
        let view = DiseaseCaseView {
            case,
            patient_name: None,
            patient_district: None,
            disease_name: Some("Malaria".into()),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["patientId"], "p");
        assert_eq!(json["diseaseName"], "Malaria");
        assert!(json["patientName"].is_null());
    }

    #[test]
    fn update_changes_status_only() {
        let mut case = DiseaseCase::from(NewDiseaseCase::validate(&json!({ "patientId": "p", "diseaseId": "d" })).unwrap());
        DiseaseCaseUpdate::validate(&json!({ "status": "recovered" })).unwrap().apply(&mut case);
        assert_eq!(case.status, "recovered");
        assert_eq!(case.severity, DEFAULT_CASE_SEVERITY);
    }
}

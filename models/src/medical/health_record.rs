// models/src/medical/health_record.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValidationResult;
use crate::identifiers::new_record_id;
use crate::schema::{PayloadReader, boolean, non_empty_string, string, timestamp};

/// Fields a client may supply when logging a checkup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthRecord {
    pub patient_id: String,
    pub checkup_date: Option<DateTime<Utc>>,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub notes: Option<String>,
    pub followup_required: bool,
    pub followup_date: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

impl NewHealthRecord {
    pub fn validate(payload: &Value) -> ValidationResult<Self> {
        let mut r = PayloadReader::new(payload)?;
        r.read_only(&["id", "createdAt"]);
        let patient_id = r.required("patientId", non_empty_string);
        let checkup_date = r.optional("checkupDate", timestamp);
        let symptoms = r.optional("symptoms", string);
        let diagnosis = r.optional("diagnosis", string);
        let treatment = r.optional("treatment", string);
        let medications = r.optional("medications", string);
        let notes = r.optional("notes", string);
        let followup_required = r.optional("followupRequired", boolean);
        let followup_date = r.optional("followupDate", timestamp);
        let created_by = r.optional("createdBy", string);
        r.finish(|| NewHealthRecord {
            patient_id: patient_id.unwrap_or_default(),
            checkup_date,
            symptoms,
            diagnosis,
            treatment,
            medications,
            notes,
            followup_required: followup_required.unwrap_or(false),
            followup_date,
            created_by,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub id: String,
    pub patient_id: String,
    pub checkup_date: DateTime<Utc>,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub notes: Option<String>,
    pub followup_required: bool,
    /// Only meaningful when `followup_required` is set; not enforced.
    pub followup_date: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NewHealthRecord> for HealthRecord {
    fn from(new: NewHealthRecord) -> Self {
        let now = Utc::now();
        HealthRecord {
            id: new_record_id(),
            patient_id: new.patient_id,
            checkup_date: new.checkup_date.unwrap_or(now),
            symptoms: new.symptoms,
            diagnosis: new.diagnosis,
            treatment: new.treatment,
            medications: new.medications,
            notes: new.notes,
            followup_required: new.followup_required,
            followup_date: new.followup_date,
            created_by: new.created_by,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn checkup_date_defaults_to_creation_time() {
        let new = NewHealthRecord::validate(&json!({ "patientId": "p-1", "symptoms": "fever" })).unwrap();
        assert!(!new.followup_required);
        let record = HealthRecord::from(new);
        assert_eq!(record.checkup_date, record.created_at);
    }

    #[test]
    fn requires_patient_reference() {
        let errors = NewHealthRecord::validate(&json!({ "diagnosis": "flu" })).unwrap_err();
        assert!(errors.contains_field("patientId"));
    }

    #[test]
    fn rejects_wrongly_typed_followup_fields() {
        let errors = NewHealthRecord::validate(&json!({
            "patientId": "p-1",
            "followupRequired": "yes",
            "followupDate": "next week"
        }))
        .unwrap_err();
        assert!(errors.contains_field("followupRequired"));
        assert!(errors.contains_field("followupDate"));
    }
}

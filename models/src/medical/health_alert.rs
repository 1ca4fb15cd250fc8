// models/src/medical/health_alert.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValidationResult;
use crate::identifiers::new_record_id;
use crate::schema::{Literal, PayloadReader, boolean, integer_in, literal, non_empty_string, string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl Literal for AlertSeverity {
    const ALL: &'static [Self] = &[
        AlertSeverity::Low,
        AlertSeverity::Medium,
        AlertSeverity::High,
        AlertSeverity::Critical,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

const MAX_AFFECTED: i64 = u32::MAX as i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthAlert {
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub district: Option<String>,
    pub disease_id: Option<String>,
    pub affected_count: u32,
    pub is_active: bool,
    pub created_by: Option<String>,
}

impl NewHealthAlert {
    pub fn validate(payload: &Value) -> ValidationResult<Self> {
        let mut r = PayloadReader::new(payload)?;
        r.read_only(&["id", "createdAt"]);
        let title = r.required("title", non_empty_string);
        let description = r.required("description", non_empty_string);
        let severity = r.required("severity", literal::<AlertSeverity>);
        let district = r.optional("district", string);
        let disease_id = r.optional("diseaseId", non_empty_string);
        let affected_count = r.optional("affectedCount", integer_in(0, MAX_AFFECTED));
        let is_active = r.optional("isActive", boolean);
        let created_by = r.optional("createdBy", string);
        r.finish(|| NewHealthAlert {
            title: title.unwrap_or_default(),
            description: description.unwrap_or_default(),
            severity: severity.unwrap_or(AlertSeverity::Low),
            district,
            disease_id,
            affected_count: affected_count.unwrap_or(0) as u32,
            is_active: is_active.unwrap_or(true),
            created_by,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAlert {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub district: Option<String>,
    pub disease_id: Option<String>,
    pub affected_count: u32,
    /// Alerts are never deleted; clearing this flag retires them.
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NewHealthAlert> for HealthAlert {
    fn from(new: NewHealthAlert) -> Self {
        HealthAlert {
            id: new_record_id(),
            title: new.title,
            description: new.description,
            severity: new.severity,
            district: new.district,
            disease_id: new.disease_id,
            affected_count: new.affected_count,
            is_active: new.is_active,
            created_by: new.created_by,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthAlertUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<AlertSeverity>,
    pub district: Option<Option<String>>,
    pub disease_id: Option<Option<String>>,
    pub affected_count: Option<u32>,
    pub is_active: Option<bool>,
}

impl HealthAlertUpdate {
    pub fn validate(payload: &Value) -> ValidationResult<Self> {
        let mut r = PayloadReader::new(payload)?;
        r.read_only(&["id", "createdAt", "createdBy"]);
        let title = r.patch_required("title", non_empty_string);
        let description = r.patch_required("description", non_empty_string);
        let severity = r.patch_required("severity", literal::<AlertSeverity>);
        let district = r.patch("district", string);
        let disease_id = r.patch("diseaseId", non_empty_string);
        let affected_count = r.patch_required("affectedCount", integer_in(0, MAX_AFFECTED));
        let is_active = r.patch_required("isActive", boolean);
        r.finish(|| HealthAlertUpdate {
            title,
            description,
            severity,
            district,
            disease_id,
            affected_count: affected_count.map(|n| n as u32),
            is_active,
        })
    }

    /// The disease the alert will point at after this update, if the update sets one.
    pub fn new_disease_reference(&self) -> Option<&str> {
        match &self.disease_id {
            Some(Some(id)) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn apply(&self, alert: &mut HealthAlert) {
        if let Some(v) = &self.title {
            alert.title = v.clone();
        }
        if let Some(v) = &self.description {
            alert.description = v.clone();
        }
        if let Some(v) = self.severity {
            alert.severity = v;
        }
        if let Some(v) = &self.district {
            alert.district = v.clone();
        }
        if let Some(v) = &self.disease_id {
            alert.disease_id = v.clone();
        }
        if let Some(v) = self.affected_count {
            alert.affected_count = v;
        }
        if let Some(v) = self.is_active {
            alert.is_active = v;
        }
    }
}

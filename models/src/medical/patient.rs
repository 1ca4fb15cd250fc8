// models/src/medical/patient.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValidationResult;
use crate::identifiers::new_record_id;
use crate::schema::{Literal, PayloadReader, integer_in, literal, non_empty_string, string, timestamp};

pub const MAX_AGE: i64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Literal for Gender {
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female, Gender::Other];

    fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    #[default]
    Healthy,
    UnderTreatment,
    Critical,
    Recovered,
}

impl Literal for HealthStatus {
    const ALL: &'static [Self] = &[
        HealthStatus::Healthy,
        HealthStatus::UnderTreatment,
        HealthStatus::Critical,
        HealthStatus::Recovered,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::UnderTreatment => "under_treatment",
            HealthStatus::Critical => "critical",
            HealthStatus::Recovered => "recovered",
        }
    }
}

/// Fields a client may supply when registering a migrant worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub district: String,
    pub workplace: Option<String>,
    pub employer: Option<String>,
    pub emergency_contact: Option<String>,
    pub phone: Option<String>,
    pub health_status: HealthStatus,
    pub last_checkup: Option<DateTime<Utc>>,
    pub registered_by: Option<String>,
}

impl NewPatient {
    pub fn validate(payload: &Value) -> ValidationResult<Self> {
        let mut r = PayloadReader::new(payload)?;
        r.read_only(&["id", "patientId", "registeredAt"]);
        let name = r.required("name", non_empty_string);
        let age = r.required("age", integer_in(0, MAX_AGE));
        let gender = r.required("gender", literal::<Gender>);
        let district = r.required("district", non_empty_string);
        let workplace = r.optional("workplace", string);
        let employer = r.optional("employer", string);
        let emergency_contact = r.optional("emergencyContact", string);
        let phone = r.optional("phone", string);
        let health_status = r.optional("healthStatus", literal::<HealthStatus>);
        let last_checkup = r.optional("lastCheckup", timestamp);
        let registered_by = r.optional("registeredBy", string);
        r.finish(|| NewPatient {
            name: name.unwrap_or_default(),
            age: age.unwrap_or_default() as u32,
            gender: gender.unwrap_or(Gender::Other),
            district: district.unwrap_or_default(),
            workplace,
            employer,
            emergency_contact,
            phone,
            health_status: health_status.unwrap_or_default(),
            last_checkup,
            registered_by,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    /// Staff-facing identifier such as `KL000042`. Immutable once assigned.
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub district: String,
    pub workplace: Option<String>,
    pub employer: Option<String>,
    pub emergency_contact: Option<String>,
    pub phone: Option<String>,
    pub health_status: HealthStatus,
    pub registered_at: DateTime<Utc>,
    pub last_checkup: Option<DateTime<Utc>>,
    pub registered_by: Option<String>,
}

impl Patient {
    pub fn from_new(new: NewPatient, patient_id: String) -> Self {
        Patient {
            id: new_record_id(),
            patient_id,
            name: new.name,
            age: new.age,
            gender: new.gender,
            district: new.district,
            workplace: new.workplace,
            employer: new.employer,
            emergency_contact: new.emergency_contact,
            phone: new.phone,
            health_status: new.health_status,
            registered_at: Utc::now(),
            last_checkup: new.last_checkup,
            registered_by: new.registered_by,
        }
    }
}

/// A partial update. `None` leaves a column untouched; `Some(None)` clears a
/// nullable column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub district: Option<String>,
    pub workplace: Option<Option<String>>,
    pub employer: Option<Option<String>>,
    pub emergency_contact: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub health_status: Option<HealthStatus>,
    pub last_checkup: Option<Option<DateTime<Utc>>>,
}

impl PatientUpdate {
    pub fn validate(payload: &Value) -> ValidationResult<Self> {
        let mut r = PayloadReader::new(payload)?;
        r.read_only(&["id", "patientId", "registeredAt", "registeredBy"]);
        let name = r.patch_required("name", non_empty_string);
        let age = r.patch_required("age", integer_in(0, MAX_AGE));
        let gender = r.patch_required("gender", literal::<Gender>);
        let district = r.patch_required("district", non_empty_string);
        let workplace = r.patch("workplace", string);
        let employer = r.patch("employer", string);
        let emergency_contact = r.patch("emergencyContact", string);
        let phone = r.patch("phone", string);
        let health_status = r.patch_required("healthStatus", literal::<HealthStatus>);
        let last_checkup = r.patch("lastCheckup", timestamp);
        r.finish(|| PatientUpdate {
            name,
            age: age.map(|a| a as u32),
            gender,
            district,
            workplace,
            employer,
            emergency_contact,
            phone,
            health_status,
            last_checkup,
        })
    }

    pub fn apply(&self, patient: &mut Patient) {
        if let Some(v) = &self.name {
            patient.name = v.clone();
        }
        if let Some(v) = self.age {
            patient.age = v;
        }
        if let Some(v) = self.gender {
            patient.gender = v;
        }
        if let Some(v) = &self.district {
            patient.district = v.clone();
        }
        if let Some(v) = &self.workplace {
            patient.workplace = v.clone();
        }
        if let Some(v) = &self.employer {
            patient.employer = v.clone();
        }
        if let Some(v) = &self.emergency_contact {
            patient.emergency_contact = v.clone();
        }
        if let Some(v) = &self.phone {
            patient.phone = v.clone();
        }
        if let Some(v) = self.health_status {
            patient.health_status = v;
        }
        if let Some(v) = self.last_checkup {
            patient.last_checkup = v;
        }
    }
}

// models/src/medical/disease.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValidationResult;
use crate::identifiers::new_record_id;
use crate::schema::{Literal, PayloadReader, boolean, literal, non_empty_string, string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseType {
    Infectious,
    NonInfectious,
    Chronic,
    Acute,
}

impl Literal for DiseaseType {
    const ALL: &'static [Self] = &[
        DiseaseType::Infectious,
        DiseaseType::NonInfectious,
        DiseaseType::Chronic,
        DiseaseType::Acute,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            DiseaseType::Infectious => "infectious",
            DiseaseType::NonInfectious => "non_infectious",
            DiseaseType::Chronic => "chronic",
            DiseaseType::Acute => "acute",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDisease {
    pub name: String,
    #[serde(rename = "type")]
    pub disease_type: DiseaseType,
    pub description: Option<String>,
    pub symptoms: Option<String>,
    pub infectious: bool,
    pub reportable: bool,
}

impl NewDisease {
    pub fn validate(payload: &Value) -> ValidationResult<Self> {
        let mut r = PayloadReader::new(payload)?;
        r.read_only(&["id"]);
        let name = r.required("name", non_empty_string);
        let disease_type = r.required("type", literal::<DiseaseType>);
        let description = r.optional("description", string);
        let symptoms = r.optional("symptoms", string);
        let infectious = r.optional("infectious", boolean);
        let reportable = r.optional("reportable", boolean);
        r.finish(|| NewDisease {
            name: name.unwrap_or_default(),
            disease_type: disease_type.unwrap_or(DiseaseType::Acute),
            description,
            symptoms,
            infectious: infectious.unwrap_or(false),
            reportable: reportable.unwrap_or(false),
        })
    }
}

/// A cataloged disease. `name` is unique across the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub disease_type: DiseaseType,
    pub description: Option<String>,
    pub symptoms: Option<String>,
    pub infectious: bool,
    pub reportable: bool,
}

impl From<NewDisease> for Disease {
    fn from(new: NewDisease) -> Self {
        Disease {
            id: new_record_id(),
            name: new.name,
            disease_type: new.disease_type,
            description: new.description,
            symptoms: new.symptoms,
            infectious: new.infectious,
            reportable: new.reportable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_dengue_payload() {
        let new = NewDisease::validate(&json!({
            "name": "Dengue",
            "type": "infectious",
            "infectious": true,
            "reportable": true
        }))
        .unwrap();
        let disease = Disease::from(new);
        assert_eq!(disease.disease_type, DiseaseType::Infectious);
        assert!(disease.reportable);
        let json = serde_json::to_value(&disease).unwrap();
        assert_eq!(json["type"], "infectious");
    }

    #[test]
    fn rejects_unknown_type() {
        let errors = NewDisease::validate(&json!({ "name": "X", "type": "genetic" })).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["type"]);
    }
}

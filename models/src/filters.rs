// models/src/filters.rs
//! Typed query filters. Every field is optional and `None` imposes no
//! constraint; all present constraints must hold together.

use crate::medical::{DiseaseCaseView, HealthStatus, Patient};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientFilter {
    /// Case-sensitive substring of the patient's district.
    pub district: Option<String>,
    pub health_status: Option<HealthStatus>,
    /// Case-insensitive substring of the name or the staff-facing patient id.
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl PatientFilter {
    pub fn matches(&self, patient: &Patient) -> bool {
        if let Some(district) = &self.district {
            if !patient.district.contains(district.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.health_status {
            if patient.health_status != status {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !patient.name.to_lowercase().contains(&needle)
                && !patient.patient_id.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }

    /// Skips `offset` rows, then keeps at most `limit`.
    pub fn paginate<T>(&self, rows: Vec<T>) -> Vec<T> {
        let skipped = rows.into_iter().skip(self.offset.unwrap_or(0));
        match self.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiseaseCaseFilter {
    pub patient_id: Option<String>,
    pub disease_id: Option<String>,
    /// Case-sensitive substring of the joined patient's district. Rows whose
    /// patient does not resolve never match.
    pub district: Option<String>,
    pub status: Option<String>,
}

impl DiseaseCaseFilter {
    pub fn matches(&self, view: &DiseaseCaseView) -> bool {
        if let Some(patient_id) = &self.patient_id {
            if &view.case.patient_id != patient_id {
                return false;
            }
        }
        if let Some(disease_id) = &self.disease_id {
            if &view.case.disease_id != disease_id {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if &view.case.status != status {
                return false;
            }
        }
        if let Some(district) = &self.district {
            match &view.patient_district {
                Some(d) if d.contains(district.as_str()) => {}
                _ => return false,
            }
        }
        true
    }
}

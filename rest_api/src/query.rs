// rest_api/src/query.rs
//! Query-string coercion. Values arrive as strings; the only conversions are
//! to numbers for pagination, to enum literals, and the literal `"true"`.

use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use models::errors::ValidationErrors;
use models::filters::{DiseaseCaseFilter, PatientFilter};
use models::medical::HealthStatus;
use models::schema::Literal;
use serde_json::Value;

use crate::errors::RestApiError;

pub struct QueryParams<'a>(&'a HashMap<String, String>);

impl<'a> QueryParams<'a> {
    pub fn new(params: &'a HashMap<String, String>) -> Self {
        QueryParams(params)
    }

    /// An empty value counts as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).filter(|v| !v.is_empty()).cloned()
    }

    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| v == "true")
    }

    pub fn number(&self, key: &str, errors: &mut ValidationErrors) -> Option<usize> {
        let raw = self.text(key)?;
        match raw.parse::<usize>() {
            Ok(n) => Some(n),
            Err(_) => {
                errors.push(key, "must be a non-negative integer");
                None
            }
        }
    }

    pub fn literal<T: Literal>(&self, key: &str, errors: &mut ValidationErrors) -> Option<T> {
        let raw = self.text(key)?;
        let parsed = T::parse_literal(&raw);
        if parsed.is_none() {
            errors.push(key, T::expected());
        }
        parsed
    }
}

pub fn patient_filter(params: &HashMap<String, String>) -> Result<PatientFilter, RestApiError> {
    let q = QueryParams::new(params);
    let mut errors = ValidationErrors::default();
    let filter = PatientFilter {
        district: q.text("district"),
        health_status: q.literal::<HealthStatus>("healthStatus", &mut errors),
        search: q.text("search"),
        limit: q.number("limit", &mut errors),
        offset: q.number("offset", &mut errors),
    };
    errors.finish(|| filter).map_err(RestApiError::from)
}

pub fn disease_case_filter(params: &HashMap<String, String>) -> DiseaseCaseFilter {
    let q = QueryParams::new(params);
    DiseaseCaseFilter {
        patient_id: q.text("patientId"),
        disease_id: q.text("diseaseId"),
        district: q.text("district"),
        status: q.text("status"),
    }
}

/// Unwraps a JSON body, turning a malformed one into a `body` field error.
pub fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, RestApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            let mut errors = ValidationErrors::default();
            errors.push("body", rejection.body_text());
            Err(errors.into())
        }
    }
}

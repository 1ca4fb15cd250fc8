// rest_api/src/handlers/patients.rs

use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use log::debug;
use models::medical::{NewPatient, Patient, PatientUpdate};
use serde_json::{Value, json};

use crate::AppState;
use crate::errors::{RestApiError, StorageResultExt};
use crate::query::{json_body, patient_filter};

pub async fn list_patients(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Patient>>, RestApiError> {
    let filter = patient_filter(&params)?;
    let patients = state.storage.get_patients(&filter).await.or_fail("Failed to fetch patients")?;
    debug!("Returning {} patients", patients.len());
    Ok(Json(patients))
}

pub async fn count_patients(State(state): State<AppState>) -> Result<Json<Value>, RestApiError> {
    let count = state
        .storage
        .get_patients_count()
        .await
        .or_fail("Failed to fetch patient count")?;
    Ok(Json(json!({ "count": count })))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, RestApiError> {
    state
        .storage
        .get_patient_by_id(&id)
        .await
        .or_fail("Failed to fetch patient")?
        .map(Json)
        .ok_or(RestApiError::NotFound("Patient"))
}

pub async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Patient>), RestApiError> {
    let new_patient = NewPatient::validate(&json_body(payload)?)?;
    let patient = state
        .storage
        .create_patient(new_patient)
        .await
        .or_fail("Failed to create patient")?;
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Patient>, RestApiError> {
    let update = PatientUpdate::validate(&json_body(payload)?)?;
    let patient = state
        .storage
        .update_patient(&id, &update)
        .await
        .or_fail("Failed to update patient")?;
    Ok(Json(patient))
}

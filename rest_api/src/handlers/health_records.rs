// rest_api/src/handlers/health_records.rs

use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use models::medical::{HealthRecord, NewHealthRecord};
use serde_json::Value;

use crate::AppState;
use crate::errors::{RestApiError, StorageResultExt};
use crate::query::{QueryParams, json_body};

pub async fn list_health_records(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<HealthRecord>>, RestApiError> {
    let patient_id = QueryParams::new(&params).text("patientId");
    let records = state
        .storage
        .get_health_records(patient_id.as_deref())
        .await
        .or_fail("Failed to fetch health records")?;
    Ok(Json(records))
}

pub async fn get_health_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HealthRecord>, RestApiError> {
    state
        .storage
        .get_health_record_by_id(&id)
        .await
        .or_fail("Failed to fetch health record")?
        .map(Json)
        .ok_or(RestApiError::NotFound("Health record"))
}

pub async fn create_health_record(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<HealthRecord>), RestApiError> {
    let new_record = NewHealthRecord::validate(&json_body(payload)?)?;
    let record = state
        .storage
        .create_health_record(new_record)
        .await
        .or_fail("Failed to create health record")?;
    Ok((StatusCode::CREATED, Json(record)))
}

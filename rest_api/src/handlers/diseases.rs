// rest_api/src/handlers/diseases.rs

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use models::medical::{Disease, NewDisease};
use serde_json::Value;

use crate::AppState;
use crate::errors::{RestApiError, StorageResultExt};
use crate::query::json_body;

pub async fn list_diseases(State(state): State<AppState>) -> Result<Json<Vec<Disease>>, RestApiError> {
    let diseases = state.storage.get_diseases().await.or_fail("Failed to fetch diseases")?;
    Ok(Json(diseases))
}

pub async fn create_disease(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Disease>), RestApiError> {
    let new_disease = NewDisease::validate(&json_body(payload)?)?;
    let disease = state
        .storage
        .create_disease(new_disease)
        .await
        .or_fail("Failed to create disease")?;
    Ok((StatusCode::CREATED, Json(disease)))
}

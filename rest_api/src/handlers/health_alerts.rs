// rest_api/src/handlers/health_alerts.rs

use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use models::medical::{HealthAlert, HealthAlertUpdate, NewHealthAlert};
use serde_json::Value;

use crate::AppState;
use crate::errors::{RestApiError, StorageResultExt};
use crate::query::{QueryParams, json_body};

pub async fn list_health_alerts(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<HealthAlert>>, RestApiError> {
    let active_only = QueryParams::new(&params).flag("activeOnly");
    let alerts = state
        .storage
        .get_health_alerts(active_only)
        .await
        .or_fail("Failed to fetch health alerts")?;
    Ok(Json(alerts))
}

pub async fn create_health_alert(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<HealthAlert>), RestApiError> {
    let new_alert = NewHealthAlert::validate(&json_body(payload)?)?;
    let alert = state
        .storage
        .create_health_alert(new_alert)
        .await
        .or_fail("Failed to create health alert")?;
    Ok((StatusCode::CREATED, Json(alert)))
}

pub async fn update_health_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<HealthAlert>, RestApiError> {
    let update = HealthAlertUpdate::validate(&json_body(payload)?)?;
    let alert = state
        .storage
        .update_health_alert(&id, &update)
        .await
        .or_fail("Failed to update health alert")?;
    Ok(Json(alert))
}

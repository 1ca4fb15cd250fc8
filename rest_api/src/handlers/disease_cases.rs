// rest_api/src/handlers/disease_cases.rs

use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use models::medical::{DiseaseCase, DiseaseCaseUpdate, DiseaseCaseView, NewDiseaseCase};
use models::stats::DiseaseStat;
use serde_json::Value;

use crate::AppState;
use crate::errors::{RestApiError, StorageResultExt};
use crate::query::{disease_case_filter, json_body};

pub async fn list_disease_cases(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<DiseaseCaseView>>, RestApiError> {
    let filter = disease_case_filter(&params);
    let cases = state
        .storage
        .get_disease_cases(&filter)
        .await
        .or_fail("Failed to fetch disease cases")?;
    Ok(Json(cases))
}

pub async fn create_disease_case(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<DiseaseCase>), RestApiError> {
    let new_case = NewDiseaseCase::validate(&json_body(payload)?)?;
    let case = state
        .storage
        .create_disease_case(new_case)
        .await
        .or_fail("Failed to create disease case")?;
    Ok((StatusCode::CREATED, Json(case)))
}

pub async fn update_disease_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DiseaseCase>, RestApiError> {
    let update = DiseaseCaseUpdate::validate(&json_body(payload)?)?;
    let case = state
        .storage
        .update_disease_case(&id, &update)
        .await
        .or_fail("Failed to update disease case")?;
    Ok(Json(case))
}

pub async fn get_disease_stats(State(state): State<AppState>) -> Result<Json<Vec<DiseaseStat>>, RestApiError> {
    let stats = state
        .storage
        .get_disease_stats()
        .await
        .or_fail("Failed to fetch disease statistics")?;
    Ok(Json(stats))
}

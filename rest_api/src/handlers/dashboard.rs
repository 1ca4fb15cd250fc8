// rest_api/src/handlers/dashboard.rs

use axum::Json;
use axum::extract::State;
use models::stats::DashboardStats;

use crate::AppState;
use crate::errors::{RestApiError, StorageResultExt};

pub async fn get_dashboard_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, RestApiError> {
    let stats = state
        .storage
        .get_dashboard_stats()
        .await
        .or_fail("Failed to fetch dashboard stats")?;
    Ok(Json(stats))
}

// rest_api/src/handlers/system.rs

use axum::Json;
use serde_json::{Value, json};

pub const API_LEVEL: u32 = 1;

pub async fn health_check_handler() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "HealthWatch API is healthy" }))
}

pub async fn version_handler() -> Json<Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION"), "apiLevel": API_LEVEL }))
}

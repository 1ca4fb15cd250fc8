// rest_api/src/lib.rs

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::http::Method;
use axum::routing::{get, put};
use lib::storage_engine::HealthStorage;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod errors;
pub mod handlers;
pub mod query;

use crate::config::RestApiConfig;
use crate::handlers::{dashboard, disease_cases, diseases, health_alerts, health_records, patients, system};

// Shared state for the Axum application
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn HealthStorage>,
}

/// Builds the `/api` router over an already opened storage handle.
pub fn build_router(storage: Arc<dyn HealthStorage>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(system::health_check_handler))
        .route("/version", get(system::version_handler))
        .route("/dashboard/stats", get(dashboard::get_dashboard_stats))
        .route("/patients", get(patients::list_patients).post(patients::create_patient))
        .route("/patients/count", get(patients::count_patients))
        .route("/patients/:id", get(patients::get_patient).put(patients::update_patient))
        .route(
            "/health-records",
            get(health_records::list_health_records).post(health_records::create_health_record),
        )
        .route("/health-records/:id", get(health_records::get_health_record))
        .route("/diseases", get(diseases::list_diseases).post(diseases::create_disease))
        .route(
            "/disease-cases",
            get(disease_cases::list_disease_cases).post(disease_cases::create_disease_case),
        )
        .route("/disease-cases/stats", get(disease_cases::get_disease_stats))
        .route("/disease-cases/:id", put(disease_cases::update_disease_case))
        .route(
            "/health-alerts",
            get(health_alerts::list_health_alerts).post(health_alerts::create_health_alert),
        )
        .route("/health-alerts/:id", put(health_alerts::update_health_alert));

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .with_state(AppState { storage })
}

/// Serves the API until `shutdown` resolves, then flushes storage.
pub async fn start_server<F>(config: &RestApiConfig, storage: Arc<dyn HealthStorage>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind REST API server to {}", addr))?;
    info!("HealthWatch REST API listening on {} ({} storage)", addr, storage.get_type());

    let app = build_router(storage.clone());
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("REST API server failed to start or run")?;

    storage.flush().await.context("Failed to flush storage on shutdown")?;
    info!("REST API server stopped.");
    Ok(())
}

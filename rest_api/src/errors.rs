// rest_api/src/errors.rs

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use models::errors::{HealthError, HealthResult, ValidationErrors};
use serde_json::json;
use thiserror::Error;

/// Errors a handler can answer with. Storage failures keep their source for
/// logging but only the per-endpoint message reaches the client.
#[derive(Debug, Error)]
pub enum RestApiError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("{message}: {source}")]
    Internal {
        message: &'static str,
        #[source]
        source: HealthError,
    },
}

impl RestApiError {
    /// Sorts a storage error into the HTTP taxonomy. `message` is what the
    /// client sees if the error turns out to be an internal one.
    pub fn from_storage(message: &'static str, err: HealthError) -> Self {
        match err {
            HealthError::Validation(errors) => RestApiError::Validation(errors),
            HealthError::NotFound { entity, .. } => RestApiError::NotFound(entity),
            HealthError::AlreadyExists(msg) => RestApiError::Conflict(msg),
            source => RestApiError::Internal { message, source },
        }
    }
}

impl From<ValidationErrors> for RestApiError {
    fn from(errors: ValidationErrors) -> Self {
        warn!("Rejected payload: {}", errors);
        RestApiError::Validation(errors)
    }
}

impl IntoResponse for RestApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RestApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Validation failed", "errors": errors }),
            ),
            RestApiError::NotFound(entity) => {
                (StatusCode::NOT_FOUND, json!({ "message": format!("{} not found", entity) }))
            }
            RestApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "message": msg })),
            RestApiError::Internal { message, source } => {
                error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "message": message }))
            }
        };
        (status, Json(body)).into_response()
    }
}

pub trait StorageResultExt<T> {
    fn or_fail(self, message: &'static str) -> Result<T, RestApiError>;
}

impl<T> StorageResultExt<T> for HealthResult<T> {
    fn or_fail(self, message: &'static str) -> Result<T, RestApiError> {
        self.map_err(|e| RestApiError::from_storage(message, e))
    }
}

//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::features::MappingError;
use crate::model::InferenceError;

pub type AppResult<T> = Result<T, AppError>;

/// Request-scoped errors; none of these stop the server
#[derive(Debug)]
pub enum AppError {
    // Validation errors (schema, range, flag encoding)
    ValidationError(String),

    // Model slot is empty (bad or missing MODEL_PATH)
    ModelUnavailable,

    // Model rejected the row (unseen category, type mismatch, ...)
    InferenceError(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ValidationError(msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::ModelUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "Model not loaded.".to_string())
            }
            AppError::InferenceError(msg) => {
                tracing::warn!("Inference error: {}", msg);
                (StatusCode::BAD_REQUEST, format!("Error during prediction: {}", msg))
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::InferenceError(err.to_string())
    }
}

impl From<MappingError> for AppError {
    fn from(err: MappingError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("inference task failed: {}", err))
    }
}

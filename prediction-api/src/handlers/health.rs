//! Health check handler
//!
//! Liveness only: never looks at the model slot.

use axum::Json;
use serde::Serialize;

use crate::services::PredictionService;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

pub async fn check<S: PredictionService>() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: S::INFO.health_message,
    })
}

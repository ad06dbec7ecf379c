//! Prediction handler

use axum::{extract::State, Json};

use crate::services::PredictionService;
use crate::validate::ValidatedJson;
use crate::{AppError, AppResult, AppState};

/// POST /predict
///
/// Body is parsed and range-checked by the extractor and flags are normalized
/// before the model slot is consulted. The row is then mapped and the model
/// runs once on the blocking pool.
pub async fn predict<S: PredictionService>(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<S::Input>,
) -> AppResult<Json<S::Output>> {
    // Flag normalization is part of validation and answers 400 before the slot check
    let record = S::normalize(input, state.config.flag_policy).map_err(AppError::ValidationError)?;
    let loaded = state.model.loaded().ok_or(AppError::ModelUnavailable)?;

    let row = state.mapper.map(&record)?;

    tracing::debug!(
        "Predicting with row: {}",
        serde_json::to_string(&row).unwrap_or_default()
    );

    let model = loaded.model.clone();
    let value = tokio::task::spawn_blocking(move || model.predict(&row)).await??;

    let output = S::respond(value)?;
    tracing::info!("Prediction served: {}", value);

    Ok(Json(output))
}

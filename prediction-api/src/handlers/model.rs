//! Model status handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::model::{ModelMetadata, ModelSlot};
use crate::services::PredictionService;
use crate::AppState;

#[derive(Serialize)]
pub struct ModelStatus {
    pub service: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Training columns in row order
    pub columns: Vec<&'static str>,
    /// Wire field feeding each column, same order
    pub mapping: Vec<MappedField>,
}

#[derive(Serialize)]
pub struct MappedField {
    pub wire: &'static str,
    pub column: &'static str,
}

/// GET /model
pub async fn status<S: PredictionService>(State(state): State<AppState>) -> Json<ModelStatus> {
    let (model, reason) = match &state.model {
        ModelSlot::Loaded(loaded) => (Some(loaded.metadata.as_ref().clone()), None),
        ModelSlot::Unavailable { reason } => (None, Some(reason.clone())),
    };

    Json(ModelStatus {
        service: S::INFO.title,
        description: S::INFO.description,
        version: S::INFO.version,
        model_loaded: model.is_some(),
        model,
        reason,
        columns: state.mapper.columns(),
        mapping: state
            .mapper
            .table()
            .iter()
            .map(|m| MappedField { wire: m.wire, column: m.column })
            .collect(),
    })
}

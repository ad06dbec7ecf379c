//! Model Loader
//!
//! Reads the artifact named by configuration, fingerprints it and keeps the
//! result in a [`ModelSlot`]. Load failures are logged and remembered, never
//! fatal.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::{LinearPipeline, LoadError, Model};

/// Model metadata
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub format: String,
    pub columns: Vec<String>,
    pub sha256: String,
    pub size_bytes: usize,
    pub loaded_at: DateTime<Utc>,
}

/// A model plus what we know about where it came from
#[derive(Clone)]
pub struct LoadedModel {
    pub model: Arc<dyn Model>,
    pub metadata: Arc<ModelMetadata>,
}

/// Process-wide model state, injected into the router
#[derive(Clone)]
pub enum ModelSlot {
    Loaded(LoadedModel),
    Unavailable { reason: String },
}

impl ModelSlot {
    /// Load from an optional path; failures produce `Unavailable`
    pub fn load(path: Option<&Path>) -> Self {
        let result = match path {
            Some(path) => load_model(path),
            None => Err(LoadError::PathNotSet),
        };

        match result {
            Ok(loaded) => {
                tracing::info!(
                    "✅ Model loaded: {} ({}, {} columns, sha256 {})",
                    loaded.metadata.model_path,
                    loaded.metadata.format,
                    loaded.metadata.columns.len(),
                    &loaded.metadata.sha256[..12]
                );
                ModelSlot::Loaded(loaded)
            }
            Err(e) => {
                tracing::error!("❌ Error loading model: {}", e);
                ModelSlot::Unavailable { reason: e.to_string() }
            }
        }
    }

    /// Wrap an in-memory model (no artifact on disk)
    pub fn from_model(model: Arc<dyn Model>) -> Self {
        let metadata = ModelMetadata {
            model_path: "<memory>".to_string(),
            format: model.format().to_string(),
            columns: model.input_columns(),
            sha256: String::new(),
            size_bytes: 0,
            loaded_at: Utc::now(),
        };
        ModelSlot::Loaded(LoadedModel {
            model,
            metadata: Arc::new(metadata),
        })
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ModelSlot::Unavailable { reason: reason.into() }
    }

    pub fn loaded(&self) -> Option<&LoadedModel> {
        match self {
            ModelSlot::Loaded(loaded) => Some(loaded),
            ModelSlot::Unavailable { .. } => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded().is_some()
    }
}

/// Read, fingerprint and decode a model artifact
pub fn load_model(path: &Path) -> Result<LoadedModel, LoadError> {
    tracing::info!("Loading model from: {}", path.display());

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let model: Arc<dyn Model> = match extension.as_str() {
        "json" => Arc::new(LinearPipeline::from_slice(&bytes)?),
        #[cfg(feature = "onnx")]
        "onnx" => Arc::new(super::onnx::OnnxModel::from_bytes(&bytes)?),
        #[cfg(not(feature = "onnx"))]
        "onnx" => {
            return Err(LoadError::UnsupportedFormat(
                "onnx (rebuild with --features onnx)".to_string(),
            ))
        }
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let metadata = ModelMetadata {
        model_path: path.display().to_string(),
        format: model.format().to_string(),
        columns: model.input_columns(),
        sha256: hex::encode(Sha256::digest(&bytes)),
        size_bytes: bytes.len(),
        loaded_at: Utc::now(),
    };

    Ok(LoadedModel {
        model,
        metadata: Arc::new(metadata),
    })
}

//! Model Module - loading and inference
//!
//! The service only knows a model through [`Model`]. Artifacts are loaded once
//! at startup into a [`ModelSlot`]; a failed load leaves the slot
//! `Unavailable` instead of stopping the process.
//!
//! Formats (picked by file extension):
//! - `.json`: [`linear::LinearPipeline`], the native artifact
//! - `.onnx`: ONNX Runtime session (cargo feature `onnx`)

pub mod linear;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;

use std::path::PathBuf;

use crate::features::FeatureRow;

pub use linear::LinearPipeline;
pub use loader::{load_model, LoadedModel, ModelMetadata, ModelSlot};

// ============================================================================
// MODEL TRAIT
// ============================================================================

/// A loaded, read-only model shared by every request
pub trait Model: Send + Sync {
    /// Short format name ("linear-pipeline", "onnx", ...)
    fn format(&self) -> &'static str;

    /// Training-time column names the model expects
    fn input_columns(&self) -> Vec<String>;

    /// Run inference on one row. Classifiers return the class as 0.0 / 1.0.
    fn predict(&self, row: &FeatureRow) -> Result<f64, InferenceError>;
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' expects {expected} input, got {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Found unknown categories ['{value}'] in column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("model produced a non-finite value ({0})")]
    NonFinite(f64),

    #[error("{0}")]
    Runtime(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("MODEL_PATH is not set")]
    PathNotSet,

    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported model format '{0}'")]
    UnsupportedFormat(String),

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

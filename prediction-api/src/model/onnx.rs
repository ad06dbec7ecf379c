//! ONNX Runtime backend
//!
//! Expects one graph input per training column (the layout skl2onnx produces
//! for column-transformer pipelines). Each cell is fed as a `[1, 1]` tensor of
//! the input's declared element type; the first output is the prediction.

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::tensor::TensorElementType;
use ort::value::{DynValue, Tensor, ValueType};
use parking_lot::Mutex;

use super::{InferenceError, LoadError, Model};
use crate::features::{FeatureRow, FeatureValue};

pub struct OnnxModel {
    // Session::run needs &mut
    session: Mutex<Session>,
    inputs: Vec<(String, TensorElementType)>,
    output: String,
}

impl OnnxModel {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let session = Session::builder()
            .map_err(|e| LoadError::Invalid(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| LoadError::Invalid(format!("Failed to set optimization: {}", e)))?
            .commit_from_memory(bytes)
            .map_err(|e| LoadError::Invalid(format!("Failed to load model: {}", e)))?;

        let inputs = session
            .inputs
            .iter()
            .map(|input| match &input.input_type {
                ValueType::Tensor { ty, .. } => Ok((input.name.clone(), *ty)),
                other => Err(LoadError::Invalid(format!(
                    "input '{}' is not a tensor ({:?})",
                    input.name, other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let output = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| LoadError::Invalid("No output defined".to_string()))?;

        tracing::debug!("ONNX inputs: {:?}, output: {}", inputs, output);

        Ok(Self {
            session: Mutex::new(session),
            inputs,
            output,
        })
    }
}

fn cell_tensor(
    column: &str,
    ty: TensorElementType,
    value: &FeatureValue,
) -> Result<DynValue, InferenceError> {
    let tensor_error = |e: ort::Error| InferenceError::Runtime(format!("Tensor error: {}", e));
    let mismatch = |expected: &'static str| InferenceError::TypeMismatch {
        column: column.to_string(),
        expected,
        found: value.kind(),
    };

    match ty {
        TensorElementType::String => {
            let text = value.as_text().ok_or_else(|| mismatch("string"))?;
            Tensor::from_string_array(Array2::from_elem((1, 1), text.to_string()))
                .map(|t| t.into_dyn())
                .map_err(tensor_error)
        }
        TensorElementType::Float32 => {
            let x = value.as_f64().ok_or_else(|| mismatch("float"))?;
            Tensor::from_array(Array2::from_elem((1, 1), x as f32))
                .map(|t| t.into_dyn())
                .map_err(tensor_error)
        }
        TensorElementType::Float64 => {
            let x = value.as_f64().ok_or_else(|| mismatch("double"))?;
            Tensor::from_array(Array2::from_elem((1, 1), x))
                .map(|t| t.into_dyn())
                .map_err(tensor_error)
        }
        TensorElementType::Int64 => {
            let x = match value {
                FeatureValue::Int(i) => *i,
                _ => return Err(mismatch("int64")),
            };
            Tensor::from_array(Array2::from_elem((1, 1), x))
                .map(|t| t.into_dyn())
                .map_err(tensor_error)
        }
        other => Err(InferenceError::Runtime(format!(
            "unsupported input type {:?} for column '{}'",
            other, column
        ))),
    }
}

impl Model for OnnxModel {
    fn format(&self) -> &'static str {
        "onnx"
    }

    fn input_columns(&self) -> Vec<String> {
        self.inputs.iter().map(|(name, _)| name.clone()).collect()
    }

    fn predict(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        let mut inputs: Vec<(String, DynValue)> = Vec::with_capacity(self.inputs.len());
        for (name, ty) in &self.inputs {
            let value = row
                .get(name)
                .ok_or_else(|| InferenceError::MissingColumn(name.clone()))?;
            inputs.push((name.clone(), cell_tensor(name, *ty, value)?));
        }

        let mut session = self.session.lock();
        let outputs = session
            .run(inputs)
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output)
            .ok_or_else(|| InferenceError::Runtime("No output".to_string()))?;

        let first = if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
            data.first().map(|v| *v as f64)
        } else if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            data.first().map(|v| *v as f64)
        } else if let Ok((_, data)) = output.try_extract_tensor::<f64>() {
            data.first().copied()
        } else {
            return Err(InferenceError::Runtime(format!(
                "output '{}' is not a numeric tensor",
                self.output
            )));
        };

        first.ok_or_else(|| InferenceError::Runtime("empty output tensor".to_string()))
    }
}

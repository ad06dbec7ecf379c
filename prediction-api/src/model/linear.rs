//! Linear Pipeline - native JSON model artifact
//!
//! A fitted preprocessing + linear model exported as JSON:
//!
//! ```text
//! row ─► per-column encoding ─► Σ contribution + intercept ─► link ─► value
//!        numeric: clip → standardize → × weight
//!        one_hot: weight of the matching category
//! ```
//!
//! `classification` applies the logistic function and thresholds it into a
//! class (1.0 / 0.0); `regression` applies the inverse target transform.

use serde::{Deserialize, Serialize};

use super::{InferenceError, LoadError, Model};
use crate::features::{FeatureRow, FeatureValue};

// ============================================================================
// ARTIFACT SCHEMA
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    #[default]
    Regression,
    Classification,
}

/// Inverse of the transform applied to the target at fit time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTransform {
    #[default]
    Identity,
    /// Target was `ln(y)`
    Exp,
    /// Target was `ln(1 + y)`
    Expm1,
}

impl TargetTransform {
    fn invert(self, z: f64) -> f64 {
        match self {
            TargetTransform::Identity => z,
            TargetTransform::Exp => z.exp(),
            TargetTransform::Expm1 => z.exp_m1(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Unseen category is an inference error
    #[default]
    Error,
    /// Unseen category contributes nothing
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Encoding {
    Numeric {
        /// Winsorizer bounds learned at fit time
        #[serde(default)]
        clip: Option<[f64; 2]>,
        #[serde(default)]
        mean: f64,
        #[serde(default = "default_scale")]
        scale: f64,
        weight: f64,
    },
    OneHot {
        categories: Vec<String>,
        weights: Vec<f64>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
}

fn default_scale() -> f64 {
    1.0
}

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStep {
    pub name: String,
    pub encoding: Encoding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPipeline {
    #[serde(default)]
    pub task: Task,
    pub columns: Vec<ColumnStep>,
    #[serde(default)]
    pub intercept: f64,
    /// Probability cut-off for `classification`
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub target: TargetTransform,
}

// ============================================================================
// LOADING
// ============================================================================

impl LinearPipeline {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        let pipeline: LinearPipeline =
            serde_json::from_slice(bytes).map_err(|e| LoadError::Invalid(e.to_string()))?;
        pipeline.check()?;
        Ok(pipeline)
    }

    /// Structural checks that serde cannot express
    fn check(&self) -> Result<(), LoadError> {
        if self.columns.is_empty() {
            return Err(LoadError::Invalid("pipeline has no columns".to_string()));
        }

        for (i, step) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|s| s.name == step.name) {
                return Err(LoadError::Invalid(format!("duplicate column '{}'", step.name)));
            }

            match &step.encoding {
                Encoding::Numeric { clip, mean, scale, weight } => {
                    let finite = mean.is_finite() && scale.is_finite() && weight.is_finite();
                    if !finite {
                        return Err(LoadError::Invalid(format!(
                            "column '{}' has non-finite parameters",
                            step.name
                        )));
                    }
                    if let Some([lo, hi]) = clip {
                        if !(lo.is_finite() && hi.is_finite()) || lo > hi {
                            return Err(LoadError::Invalid(format!(
                                "column '{}' has clip bounds [{}, {}]",
                                step.name, lo, hi
                            )));
                        }
                    }
                }
                Encoding::OneHot { categories, weights, .. } => {
                    if categories.len() != weights.len() {
                        return Err(LoadError::Invalid(format!(
                            "column '{}' has {} categories but {} weights",
                            step.name,
                            categories.len(),
                            weights.len()
                        )));
                    }
                }
            }
        }

        if !self.intercept.is_finite() {
            return Err(LoadError::Invalid("intercept is not finite".to_string()));
        }
        if self.task == Task::Classification && !(0.0..=1.0).contains(&self.threshold) {
            return Err(LoadError::Invalid(format!(
                "threshold {} is outside [0, 1]",
                self.threshold
            )));
        }

        Ok(())
    }
}

// ============================================================================
// INFERENCE
// ============================================================================

impl Encoding {
    fn contribution(&self, column: &str, value: &FeatureValue) -> Result<f64, InferenceError> {
        match self {
            Encoding::Numeric { clip, mean, scale, weight } => {
                let mut x = value.as_f64().ok_or_else(|| InferenceError::TypeMismatch {
                    column: column.to_string(),
                    expected: "numeric",
                    found: value.kind(),
                })?;
                if let Some([lo, hi]) = clip {
                    x = x.clamp(*lo, *hi);
                }
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                Ok((x - mean) / scale * weight)
            }
            Encoding::OneHot { categories, weights, handle_unknown } => {
                let text = value.as_text().ok_or_else(|| InferenceError::TypeMismatch {
                    column: column.to_string(),
                    expected: "categorical",
                    found: value.kind(),
                })?;
                match categories.iter().position(|c| c == text) {
                    Some(i) => Ok(weights[i]),
                    None => match handle_unknown {
                        HandleUnknown::Ignore => Ok(0.0),
                        HandleUnknown::Error => Err(InferenceError::UnknownCategory {
                            column: column.to_string(),
                            value: text.to_string(),
                        }),
                    },
                }
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl LinearPipeline {
    /// Raw linear score before the link function
    pub fn decision(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        let mut z = self.intercept;
        for step in &self.columns {
            let value = row
                .get(&step.name)
                .ok_or_else(|| InferenceError::MissingColumn(step.name.clone()))?;
            z += step.encoding.contribution(&step.name, value)?;
        }
        Ok(z)
    }
}

impl Model for LinearPipeline {
    fn format(&self) -> &'static str {
        "linear-pipeline"
    }

    fn input_columns(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    fn predict(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        let z = self.decision(row)?;
        let value = match self.task {
            Task::Regression => self.target.invert(z),
            Task::Classification => {
                if sigmoid(z) >= self.threshold {
                    1.0
                } else {
                    0.0
                }
            }
        };

        if !value.is_finite() {
            return Err(InferenceError::NonFinite(value));
        }
        Ok(value)
    }
}

// ============================================================================
// TESTS
// ============================================================================

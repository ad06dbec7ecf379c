//! Request validation
//!
//! Two stages run before anything reaches the mapper:
//! 1. [`ValidatedJson`] parses the body and applies the derive-based rules
//!    (`#[validate(range(...))]`). Unknown fields are ignored.
//! 2. Services normalize multi-encoding flags with [`normalize_flag`] and
//!    [`normalize_gender`] under the configured [`FlagPolicy`].

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use validator::{Validate, ValidationErrors};

use crate::AppError;

// ============================================================================
// JSON EXTRACTOR
// ============================================================================

/// `Json<T>` that also runs `T::validate()`; every failure is a 400
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::ValidationError(describe_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten validator output into one deterministic message
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{}: invalid value ({})", field, e.code),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

// ============================================================================
// FLAGS
// ============================================================================

/// Boolean-ish wire value: `true`, `1`, `"Yes"`, ...
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{}", b),
            FlagValue::Int(i) => write!(f, "{}", i),
            FlagValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// What to do with an encoding that is not recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagPolicy {
    /// Reject with a client error
    #[default]
    Strict,
    /// Non-empty / non-zero values count as 1
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized value {value} (expected {expected})")]
pub struct FlagError {
    pub value: String,
    pub expected: &'static str,
}

const FLAG_EXPECTED: &str = "yes/no, true/false or 1/0";
const GENDER_EXPECTED: &str = "male/female or 1/0";

/// Normalize a yes/no field to 0/1
pub fn normalize_flag(value: &FlagValue, policy: FlagPolicy) -> Result<i64, FlagError> {
    let unrecognized = || FlagError {
        value: value.to_string(),
        expected: FLAG_EXPECTED,
    };

    match value {
        FlagValue::Bool(b) => Ok(i64::from(*b)),
        FlagValue::Int(0) => Ok(0),
        FlagValue::Int(1) => Ok(1),
        FlagValue::Int(_) => match policy {
            FlagPolicy::Strict => Err(unrecognized()),
            FlagPolicy::Lenient => Ok(1),
        },
        FlagValue::Text(s) => {
            let s = s.trim().to_lowercase();
            match s.as_str() {
                "yes" | "true" | "1" => Ok(1),
                "no" | "false" | "0" => Ok(0),
                _ => match policy {
                    FlagPolicy::Strict => Err(unrecognized()),
                    FlagPolicy::Lenient => Ok(i64::from(!s.is_empty())),
                },
            }
        }
    }
}

/// Normalize gender to the training encoding: female = 0, male = 1
pub fn normalize_gender(value: &FlagValue, policy: FlagPolicy) -> Result<i64, FlagError> {
    let unrecognized = || FlagError {
        value: value.to_string(),
        expected: GENDER_EXPECTED,
    };

    match value {
        FlagValue::Int(0) => Ok(0),
        FlagValue::Int(1) => Ok(1),
        FlagValue::Text(s) => match s.trim().to_lowercase().as_str() {
            "female" => Ok(0),
            "male" => Ok(1),
            _ => match policy {
                FlagPolicy::Strict => Err(unrecognized()),
                FlagPolicy::Lenient => Ok(1),
            },
        },
        FlagValue::Int(_) | FlagValue::Bool(_) => match policy {
            FlagPolicy::Strict => Err(unrecognized()),
            FlagPolicy::Lenient => Ok(i64::from(*value != FlagValue::Bool(false))),
        },
    }
}

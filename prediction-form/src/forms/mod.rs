//! Form definitions
//!
//! Each form mirrors one service's wire schema: field names are the JSON keys
//! the service expects, widget bounds follow the service's validation rules.

pub mod car;
pub mod heart;
pub mod house;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::ClientError;
use crate::config::FormConfig;
use crate::html::{Field, Outcome, Widget};

pub use car::CarForm;
pub use heart::HeartForm;
pub use house::HouseForm;

/// Submitted values that the widgets should have prevented
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: &'static str, min: f64, max: f64 },

    #[error("{field} must be at least {min}")]
    BelowMinimum { field: &'static str, min: f64 },

    #[error("{field} does not accept {value:?}")]
    UnknownOption { field: &'static str, value: String },

    #[error("{field} is required")]
    Empty { field: &'static str },
}

pub trait PredictionForm: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    const TITLE: &'static str;
    const INTRO: &'static str;
    /// Route of the form page
    const PATH: &'static str;

    /// `/predict` URL of the backing service
    fn api_url(config: &FormConfig) -> &str;

    /// Widgets filled with the current values
    fn fields(&self) -> Vec<Field>;

    /// Success message for a 200 body, `None` when the expected key is absent
    fn describe(result: &Value) -> Option<String>;

    /// Check every value against its widget
    fn check(&self) -> Result<(), FormError> {
        self.fields().iter().try_for_each(check_field)
    }
}

pub fn check_field(field: &Field) -> Result<(), FormError> {
    let value = field.value.trim();
    match &field.widget {
        Widget::Select { options } => {
            if options.iter().any(|o| *o == value) {
                Ok(())
            } else {
                Err(FormError::UnknownOption {
                    field: field.name,
                    value: value.to_string(),
                })
            }
        }
        Widget::Number { min, max, .. } => {
            let number: f64 = value
                .parse()
                .ok()
                .filter(|n: &f64| n.is_finite())
                .ok_or(FormError::NotANumber { field: field.name })?;
            match max {
                Some(max) if number < *min || number > *max => Err(FormError::OutOfRange {
                    field: field.name,
                    min: *min,
                    max: *max,
                }),
                None if number < *min => Err(FormError::BelowMinimum {
                    field: field.name,
                    min: *min,
                }),
                _ => Ok(()),
            }
        }
        Widget::Text => {
            if value.is_empty() {
                Err(FormError::Empty { field: field.name })
            } else {
                Ok(())
            }
        }
    }
}

/// Turn the service's answer into the banner shown under the form
pub fn outcome<F: PredictionForm>(result: Result<Value, ClientError>) -> Outcome {
    match result {
        Ok(body) => match F::describe(&body) {
            Some(message) => Outcome::Success(message),
            None => Outcome::Failure(format!(
                "Error: {}",
                body.get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown error")
            )),
        },
        Err(ClientError::Api { error: Some(error), .. }) => Outcome::Failure(format!("Error: {}", error)),
        Err(e) => Outcome::Failure(e.to_string()),
    }
}

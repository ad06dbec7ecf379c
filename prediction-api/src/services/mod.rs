//! Service definitions
//!
//! Every service plugs the same pipeline with its own schema:
//!
//! ```text
//! Input ──validate──► Record ──FeatureMapper(MAPPING)──► FeatureRow ──Model──► f64 ──respond──► Output
//! ```

pub mod car;
pub mod heart;
pub mod house;

use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::features::{FeatureSource, FieldMapping};
use crate::model::InferenceError;
use crate::validate::FlagPolicy;

pub use car::CarPrice;
pub use heart::HeartDisease;
pub use house::HousePrice;

/// Static description of a service
#[derive(Debug, Clone, Copy)]
pub struct ServiceInfo {
    /// Prefix for service-specific env vars (`<PREFIX>_MODEL_PATH`)
    pub env_prefix: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    /// Body of `GET /`
    pub health_message: &'static str,
    pub default_port: u16,
}

pub trait PredictionService: Send + Sync + 'static {
    /// Wire schema, range rules via `#[validate(...)]`
    type Input: DeserializeOwned + Validate + Send + 'static;
    /// Normalized request handed to the mapper
    type Record: FeatureSource + Send + 'static;
    /// Success body
    type Output: Serialize + Send + 'static;

    const INFO: ServiceInfo;

    /// Wire name → training column, in training column order
    const MAPPING: &'static [FieldMapping];

    /// Normalize multi-encoding fields; error text becomes a 400
    fn normalize(input: Self::Input, policy: FlagPolicy) -> Result<Self::Record, String>;

    /// Shape the raw model output into the response body
    fn respond(value: f64) -> Result<Self::Output, InferenceError>;
}

/// `{"predicted_price": ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePrediction {
    pub predicted_price: f64,
}

impl PricePrediction {
    pub fn from_value(value: f64) -> Result<Self, InferenceError> {
        if !value.is_finite() {
            return Err(InferenceError::NonFinite(value));
        }
        Ok(Self { predicted_price: value })
    }
}

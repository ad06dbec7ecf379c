//! Car price service

use serde::Deserialize;
use validator::Validate;

use super::{PredictionService, PricePrediction, ServiceInfo};
use crate::features::{FeatureSource, FeatureValue, FieldMapping};
use crate::model::InferenceError;
use crate::validate::FlagPolicy;

/// Wire schema. No numeric bounds.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct CarFeatures {
    #[serde(rename = "Make")]
    pub make: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: String,
    #[serde(rename = "Transmission")]
    pub transmission: String,
    #[serde(rename = "Year")]
    pub year: i64,
    #[serde(rename = "Engine_Size")]
    pub engine_size: f64,
    #[serde(rename = "Dist_Driven")]
    pub dist_driven: i64,
}

impl FeatureSource for CarFeatures {
    fn feature(&self, wire: &str) -> Option<FeatureValue> {
        let value = match wire {
            "Make" => self.make.as_str().into(),
            "Model" => self.model.as_str().into(),
            "Fuel_Type" => self.fuel_type.as_str().into(),
            "Transmission" => self.transmission.as_str().into(),
            "Year" => self.year.into(),
            "Engine_Size" => self.engine_size.into(),
            "Dist_Driven" => self.dist_driven.into(),
            _ => return None,
        };
        Some(value)
    }
}

pub struct CarPrice;

impl PredictionService for CarPrice {
    type Input = CarFeatures;
    type Record = CarFeatures;
    type Output = PricePrediction;

    const INFO: ServiceInfo = ServiceInfo {
        env_prefix: "CAR_PRICE",
        title: "Car Price Prediction API",
        description: "Predict car price using a trained ML model",
        version: "1.0.0",
        health_message: "API is running!",
        default_port: 8000,
    };

    // Training used "Fuel Type" and "Engine Size" with spaces
    const MAPPING: &'static [FieldMapping] = &[
        FieldMapping::same("Make"),
        FieldMapping::same("Model"),
        FieldMapping::renamed("Fuel_Type", "Fuel Type"),
        FieldMapping::same("Transmission"),
        FieldMapping::same("Year"),
        FieldMapping::renamed("Engine_Size", "Engine Size"),
        FieldMapping::same("Dist_Driven"),
    ];

    fn normalize(input: CarFeatures, _policy: FlagPolicy) -> Result<CarFeatures, String> {
        Ok(input)
    }

    fn respond(value: f64) -> Result<PricePrediction, InferenceError> {
        PricePrediction::from_value(value)
    }
}

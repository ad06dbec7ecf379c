//! House price service (Bangalore listings, price in lakhs)

use serde::Deserialize;
use validator::Validate;

use super::{PredictionService, PricePrediction, ServiceInfo};
use crate::features::{FeatureSource, FeatureValue, FieldMapping};
use crate::model::InferenceError;
use crate::validate::FlagPolicy;

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct HouseFeatures {
    pub area_type: String,
    pub location: String,
    pub total_sqft: f64,
    pub bath: i64,
    pub bhk: i64,
}

impl FeatureSource for HouseFeatures {
    fn feature(&self, wire: &str) -> Option<FeatureValue> {
        let value = match wire {
            "area_type" => self.area_type.as_str().into(),
            "location" => self.location.as_str().into(),
            "total_sqft" => self.total_sqft.into(),
            "bath" => self.bath.into(),
            "bhk" => self.bhk.into(),
            _ => return None,
        };
        Some(value)
    }
}

pub struct HousePrice;

impl PredictionService for HousePrice {
    type Input = HouseFeatures;
    type Record = HouseFeatures;
    type Output = PricePrediction;

    const INFO: ServiceInfo = ServiceInfo {
        env_prefix: "HOUSE_PRICE",
        title: "House Price Prediction API",
        description: "Predict the price of a house based on its features.",
        version: "1.0.0",
        health_message: "API is running!",
        default_port: 8002,
    };

    const MAPPING: &'static [FieldMapping] = &[
        FieldMapping::same("area_type"),
        FieldMapping::same("location"),
        FieldMapping::same("total_sqft"),
        FieldMapping::same("bath"),
        FieldMapping::same("bhk"),
    ];

    fn normalize(input: HouseFeatures, _policy: FlagPolicy) -> Result<HouseFeatures, String> {
        Ok(input)
    }

    fn respond(value: f64) -> Result<PricePrediction, InferenceError> {
        PricePrediction::from_value(value)
    }
}

//! House price form (Bangalore, price in lakhs)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PredictionForm;
use crate::config::FormConfig;
use crate::html::Field;

// Values are copied verbatim from the training data, double spaces included
pub const AREA_TYPES: &[&str] = &[
    "Super built-up  Area",
    "Plot  Area",
    "Built-up  Area",
    "Carpet  Area",
];

pub const LOCATIONS: &[&str] = &[
    "Electronic City Phase II",
    "Chikka Tirupathi",
    "Uttarahalli",
    "Lingadheeranahalli",
    "Kothanur",
    "Whitefield",
    "Old Airport Road",
    "Rajaji Nagar",
    "Marathahalli",
    "other",
    "7th Phase JP Nagar",
    "Gottigere",
    "Sarjapur",
    "Mysore Road",
    "Bisuvanahalli",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseForm {
    pub area_type: String,
    pub location: String,
    pub total_sqft: f64,
    pub bath: i64,
    pub bhk: i64,
}

impl Default for HouseForm {
    fn default() -> Self {
        Self {
            area_type: AREA_TYPES[0].to_string(),
            location: LOCATIONS[0].to_string(),
            total_sqft: 1000.0,
            bath: 2,
            bhk: 2,
        }
    }
}

impl PredictionForm for HouseForm {
    const TITLE: &'static str = "🏠 Bangalore House Price Prediction";
    const INTRO: &'static str = "Enter the house details to predict its price";
    const PATH: &'static str = "/house";

    fn api_url(config: &FormConfig) -> &str {
        &config.house_api_url
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::select("area_type", "Area Type", AREA_TYPES, &self.area_type),
            Field::select("location", "Location", LOCATIONS, &self.location),
            Field::number("total_sqft", "Total Sqft", 200.0, Some(10000.0), 10.0, self.total_sqft),
            Field::number("bath", "Bathrooms", 1.0, Some(10.0), 1.0, self.bath),
            Field::number("bhk", "BHK", 1.0, Some(10.0), 1.0, self.bhk),
        ]
    }

    fn describe(result: &Value) -> Option<String> {
        let price = result.get("predicted_price")?.as_f64()?;
        Some(format!("💰 Predicted Price: {:.2} Lakhs", price))
    }
}

//! Car price form

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PredictionForm;
use crate::config::FormConfig;
use crate::html::Field;

pub const MAKES: &[&str] = &["Honda", "Ford", "BMW", "Toyota", "Other"];
pub const FUEL_TYPES: &[&str] = &["Petrol", "Diesel", "Electric", "Hybrid"];
pub const TRANSMISSIONS: &[&str] = &["Manual", "Automatic"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarForm {
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

impl Default for CarForm {
    fn default() -> Self {
        Self {
            make: "Honda".to_string(),
            model: "Model B".to_string(),
            fuel_type: "Petrol".to_string(),
            transmission: "Manual".to_string(),
            year: 2015,
            engine_size: 3.9,
            dist_driven: 74176,
        }
    }
}

impl PredictionForm for CarForm {
    const TITLE: &'static str = "🚗 Car Price Prediction";
    const INTRO: &'static str = "Enter car details to predict the price using the trained ML model.";
    const PATH: &'static str = "/car";

    fn api_url(config: &FormConfig) -> &str {
        &config.car_api_url
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::select("Make", "Make", MAKES, &self.make),
            Field::text("Model", "Model", &self.model),
            Field::select("Fuel_Type", "Fuel Type", FUEL_TYPES, &self.fuel_type),
            Field::select("Transmission", "Transmission", TRANSMISSIONS, &self.transmission),
            Field::number("Year", "Year", 1990.0, Some(2025.0), 1.0, self.year),
            Field::number("Engine_Size", "Engine Size (L)", 0.5, Some(8.0), 0.1, self.engine_size),
            Field::number("Dist_Driven", "Distance Driven (km)", 0.0, Some(300000.0), 1.0, self.dist_driven),
        ]
    }

    fn describe(result: &Value) -> Option<String> {
        let price = result.get("predicted_price")?.as_f64()?;
        Some(format!("💰 Estimated Price: ${:.2}", price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_uses_wire_names() {
        let payload = serde_json::to_value(CarForm::default()).unwrap();
        assert_eq!(
            payload,
            json!({
                "Make": "Honda", "Model": "Model B", "Fuel_Type": "Petrol",
                "Transmission": "Manual", "Year": 2015, "Engine_Size": 3.9,
                "Dist_Driven": 74176
            })
        );
    }

    #[test]
    fn test_defaults_pass_their_own_widgets() {
        assert!(CarForm::default().check().is_ok());
    }

    #[test]
    fn test_year_outside_widget_is_rejected() {
        let form = CarForm { year: 1989, ..CarForm::default() };
        assert!(form.check().is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            CarForm::describe(&json!({"predicted_price": 17886.4})),
            Some("💰 Estimated Price: $17886.40".to_string())
        );
        assert_eq!(CarForm::describe(&json!({"price": 1})), None);
    }
}

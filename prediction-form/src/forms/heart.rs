//! Heart disease risk form

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PredictionForm;
use crate::config::FormConfig;
use crate::html::Field;

pub const GENDERS: &[&str] = &["Male", "Female"];
pub const YES_NO: &[&str] = &["No", "Yes"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartForm {
    pub age: i64,
    pub gender: String,
    pub current_smoker: String,
    pub cigs_per_day: f64,
    #[serde(rename = "BP_medication")]
    pub bp_medication: String,
    pub prevalent_stroke: String,
    pub prevalent_hypertensive: String,
    pub diabetes: String,
    pub total_cholesterol: f64,
    #[serde(rename = "systolicBP")]
    pub systolic_bp: f64,
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: f64,
    pub bmi: f64,
    pub heart_rate: i64,
    pub glucose: f64,
}

impl Default for HeartForm {
    fn default() -> Self {
        Self {
            age: 50,
            gender: "Male".to_string(),
            current_smoker: "No".to_string(),
            cigs_per_day: 0.0,
            bp_medication: "No".to_string(),
            prevalent_stroke: "No".to_string(),
            prevalent_hypertensive: "No".to_string(),
            diabetes: "No".to_string(),
            total_cholesterol: 230.0,
            systolic_bp: 130.0,
            diastolic_bp: 82.0,
            bmi: 25.8,
            heart_rate: 75,
            glucose: 82.0,
        }
    }
}

impl PredictionForm for HeartForm {
    const TITLE: &'static str = "❤️ Heart Disease Prediction";
    const INTRO: &'static str = "Enter patient data to estimate the ten-year risk of coronary heart disease.";
    const PATH: &'static str = "/heart";

    fn api_url(config: &FormConfig) -> &str {
        &config.heart_api_url
    }

    // Bounds match the service's range checks
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::number("age", "Age", 30.0, Some(80.0), 1.0, self.age),
            Field::select("gender", "Gender", GENDERS, &self.gender),
            Field::select("currentSmoker", "Current smoker", YES_NO, &self.current_smoker),
            Field::number("cigsPerDay", "Cigarettes per day", 0.0, None, 1.0, self.cigs_per_day),
            Field::select("BP_medication", "On blood pressure medication", YES_NO, &self.bp_medication),
            Field::select("prevalentStroke", "Prior stroke", YES_NO, &self.prevalent_stroke),
            Field::select("prevalentHypertensive", "Hypertensive", YES_NO, &self.prevalent_hypertensive),
            Field::select("diabetes", "Diabetes", YES_NO, &self.diabetes),
            Field::number("totalCholesterol", "Total cholesterol (mg/dL)", 100.0, Some(600.0), 1.0, self.total_cholesterol),
            Field::number("systolicBP", "Systolic BP (mmHg)", 80.0, Some(250.0), 0.5, self.systolic_bp),
            Field::number("diastolicBP", "Diastolic BP (mmHg)", 40.0, Some(150.0), 0.5, self.diastolic_bp),
            Field::number("bmi", "BMI", 10.0, Some(60.0), 0.1, self.bmi),
            Field::number("heartRate", "Heart rate (bpm)", 40.0, Some(200.0), 1.0, self.heart_rate),
            Field::number("glucose", "Glucose (mg/dL)", 50.0, Some(300.0), 1.0, self.glucose),
        ]
    }

    fn describe(result: &Value) -> Option<String> {
        match result.get("prediction")?.as_str()? {
            "yes" => Some("⚠️ Prediction: yes, elevated ten-year risk of heart disease".to_string()),
            "no" => Some("✅ Prediction: no, low ten-year risk of heart disease".to_string()),
            _ => None,
        }
    }
}

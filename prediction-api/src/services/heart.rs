//! Heart disease (ten-year CHD risk) service
//!
//! Wire names follow the published camelCase schema; snake_case names are
//! accepted as aliases. Flags and gender reach the model as 0/1 integers.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{PredictionService, ServiceInfo};
use crate::features::{FeatureSource, FeatureValue, FieldMapping};
use crate::model::InferenceError;
use crate::validate::{normalize_flag, normalize_gender, FlagPolicy, FlagValue};

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct HeartDiseaseInput {
    #[validate(range(min = 30, max = 80, message = "age must be between 30 and 80"))]
    pub age: i64,

    pub gender: FlagValue,

    #[serde(rename = "currentSmoker", alias = "current_smoker")]
    pub current_smoker: FlagValue,

    #[serde(rename = "cigsPerDay", alias = "cigs_per_day")]
    #[validate(range(min = 0.0, message = "cigsPerDay must be at least 0"))]
    pub cigs_per_day: f64,

    #[serde(rename = "BP_medication", alias = "bp_medication")]
    pub bp_medication: FlagValue,

    #[serde(rename = "prevalentStroke", alias = "prevalent_stroke")]
    pub prevalent_stroke: FlagValue,

    #[serde(rename = "prevalentHypertensive", alias = "prevalent_hypertensive")]
    pub prevalent_hypertensive: FlagValue,

    pub diabetes: FlagValue,

    #[serde(rename = "totalCholesterol", alias = "total_cholesterol")]
    #[validate(range(min = 100.0, max = 600.0, message = "totalCholesterol must be between 100 and 600"))]
    pub total_cholesterol: f64,

    #[serde(rename = "systolicBP", alias = "systolic_bp")]
    #[validate(range(min = 80.0, max = 250.0, message = "systolicBP must be between 80 and 250"))]
    pub systolic_bp: f64,

    #[serde(rename = "diastolicBP", alias = "diastolic_bp")]
    #[validate(range(min = 40.0, max = 150.0, message = "diastolicBP must be between 40 and 150"))]
    pub diastolic_bp: f64,

    #[validate(range(min = 10.0, max = 60.0, message = "bmi must be between 10 and 60"))]
    pub bmi: f64,

    #[serde(rename = "heartRate", alias = "heart_rate")]
    #[validate(range(min = 40, max = 200, message = "heartRate must be between 40 and 200"))]
    pub heart_rate: i64,

    #[validate(range(min = 50.0, max = 300.0, message = "glucose must be between 50 and 300"))]
    pub glucose: f64,
}

/// Validated input with every flag as 0/1
#[derive(Debug, Clone, PartialEq)]
pub struct HeartRecord {
    pub age: i64,
    pub gender: i64,
    pub current_smoker: i64,
    pub cigs_per_day: f64,
    pub bp_medication: i64,
    pub prevalent_stroke: i64,
    pub prevalent_hypertensive: i64,
    pub diabetes: i64,
    pub total_cholesterol: f64,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub bmi: f64,
    pub heart_rate: i64,
    pub glucose: f64,
}

impl FeatureSource for HeartRecord {
    fn feature(&self, wire: &str) -> Option<FeatureValue> {
        let value = match wire {
            "age" => self.age.into(),
            "gender" => self.gender.into(),
            "currentSmoker" => self.current_smoker.into(),
            "cigsPerDay" => self.cigs_per_day.into(),
            "BP_medication" => self.bp_medication.into(),
            "prevalentStroke" => self.prevalent_stroke.into(),
            "prevalentHypertensive" => self.prevalent_hypertensive.into(),
            "diabetes" => self.diabetes.into(),
            "totalCholesterol" => self.total_cholesterol.into(),
            "systolicBP" => self.systolic_bp.into(),
            "diastolicBP" => self.diastolic_bp.into(),
            "bmi" => self.bmi.into(),
            "heartRate" => self.heart_rate.into(),
            "glucose" => self.glucose.into(),
            _ => return None,
        };
        Some(value)
    }
}

/// `{"prediction": "yes" | "no"}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskPrediction {
    pub prediction: &'static str,
}

/// Class 1 → "yes", anything else → "no"
pub fn map_prediction(value: f64) -> &'static str {
    if value == 1.0 {
        "yes"
    } else {
        "no"
    }
}

pub struct HeartDisease;

impl PredictionService for HeartDisease {
    type Input = HeartDiseaseInput;
    type Record = HeartRecord;
    type Output = RiskPrediction;

    const INFO: ServiceInfo = ServiceInfo {
        env_prefix: "HEART_DISEASE",
        title: "Heart Disease Prediction API",
        description: "An API to predict heart disease based on patient data.",
        version: "1.0.0",
        health_message: "API is running",
        default_port: 8001,
    };

    const MAPPING: &'static [FieldMapping] = &[
        FieldMapping::same("age"),
        FieldMapping::same("gender"),
        FieldMapping::renamed("currentSmoker", "current_smoker"),
        FieldMapping::renamed("cigsPerDay", "cigs_per_day"),
        FieldMapping::renamed("BP_medication", "bp_medication"),
        FieldMapping::renamed("prevalentStroke", "prevalent_stroke"),
        FieldMapping::renamed("prevalentHypertensive", "prevalent_hypertensive"),
        FieldMapping::same("diabetes"),
        FieldMapping::renamed("totalCholesterol", "total_cholesterol"),
        FieldMapping::renamed("systolicBP", "systolic_bp"),
        FieldMapping::renamed("diastolicBP", "diastolic_bp"),
        FieldMapping::same("bmi"),
        FieldMapping::renamed("heartRate", "heart_rate"),
        FieldMapping::same("glucose"),
    ];

    fn normalize(input: HeartDiseaseInput, policy: FlagPolicy) -> Result<HeartRecord, String> {
        let mut problems = Vec::new();
        let mut flag = |name: &str, value: &FlagValue, gender: bool| {
            let result = if gender {
                normalize_gender(value, policy)
            } else {
                normalize_flag(value, policy)
            };
            result.unwrap_or_else(|e| {
                problems.push(format!("{}: {}", name, e));
                0
            })
        };

        let record = HeartRecord {
            age: input.age,
            gender: flag("gender", &input.gender, true),
            current_smoker: flag("currentSmoker", &input.current_smoker, false),
            cigs_per_day: input.cigs_per_day,
            bp_medication: flag("BP_medication", &input.bp_medication, false),
            prevalent_stroke: flag("prevalentStroke", &input.prevalent_stroke, false),
            prevalent_hypertensive: flag("prevalentHypertensive", &input.prevalent_hypertensive, false),
            diabetes: flag("diabetes", &input.diabetes, false),
            total_cholesterol: input.total_cholesterol,
            systolic_bp: input.systolic_bp,
            diastolic_bp: input.diastolic_bp,
            bmi: input.bmi,
            heart_rate: input.heart_rate,
            glucose: input.glucose,
        };

        if problems.is_empty() {
            Ok(record)
        } else {
            Err(problems.join("; "))
        }
    }

    fn respond(value: f64) -> Result<RiskPrediction, InferenceError> {
        if !value.is_finite() {
            return Err(InferenceError::NonFinite(value));
        }
        Ok(RiskPrediction {
            prediction: map_prediction(value),
        })
    }
}

//! Router tests: requests go through the full axum stack via `oneshot`.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use prediction_api::config::Config;
use prediction_api::features::{FeatureMapper, FeatureRow, FeatureValue};
use prediction_api::model::{InferenceError, Model, ModelSlot};
use prediction_api::services::{CarPrice, HeartDisease, HousePrice, PredictionService};
use prediction_api::validate::FlagPolicy;
use prediction_api::{create_router, prepare, AppState};

// ============================================================================
// HELPERS
// ============================================================================

/// Model double: records every call and the last row it saw
struct FakeModel {
    columns: Vec<String>,
    output: Result<f64, InferenceError>,
    calls: AtomicUsize,
    last_row: Mutex<Option<FeatureRow>>,
}

impl FakeModel {
    fn for_service<S: PredictionService>(output: Result<f64, InferenceError>) -> Arc<Self> {
        Arc::new(Self {
            columns: S::MAPPING.iter().map(|m| m.column.to_string()).collect(),
            output,
            calls: AtomicUsize::new(0),
            last_row: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_row(&self) -> FeatureRow {
        self.last_row.lock().unwrap().clone().expect("model was called")
    }
}

impl Model for FakeModel {
    fn format(&self) -> &'static str {
        "fake"
    }

    fn input_columns(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn predict(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_row.lock().unwrap() = Some(row.clone());
        self.output.clone()
    }
}

fn router<S: PredictionService>(slot: ModelSlot) -> Router {
    let state = AppState::new(Config::default(), slot, FeatureMapper::new(S::MAPPING));
    create_router::<S>(state)
}

fn artifact(name: &str) -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../models")).join(name)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

fn car_payload() -> Value {
    json!({
        "Make": "Honda", "Model": "Civic", "Fuel_Type": "Petrol", "Transmission": "Manual",
        "Year": 2015, "Engine_Size": 1.8, "Dist_Driven": 50000
    })
}

fn heart_payload() -> Value {
    json!({
        "age": 52, "gender": "Male", "currentSmoker": "Yes", "cigsPerDay": 10,
        "BP_medication": "No", "prevalentStroke": "no", "prevalentHypertensive": "yes",
        "diabetes": "no", "totalCholesterol": 240, "systolicBP": 135,
        "diastolicBP": 85, "bmi": 27.3, "heartRate": 75, "glucose": 90
    })
}

fn house_payload() -> Value {
    json!({
        "area_type": "Super built-up  Area", "location": "Whitefield",
        "total_sqft": 1200, "bath": 2, "bhk": 3
    })
}

// ============================================================================
// CAR PRICE
// ============================================================================

#[tokio::test]
async fn test_car_prediction_renames_columns() {
    let model = FakeModel::for_service::<CarPrice>(Ok(12345.5));
    let app = router::<CarPrice>(ModelSlot::from_model(model.clone()));

    let (status, body) = post(app, &car_payload().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"predicted_price": 12345.5}));
    assert_eq!(model.calls(), 1);

    let row = model.last_row();
    assert_eq!(row.get("Fuel Type"), Some(&FeatureValue::Text("Petrol".into())));
    assert_eq!(row.get("Engine Size"), Some(&FeatureValue::Float(1.8)));
    assert!(row.get("Fuel_Type").is_none());
}

#[tokio::test]
async fn test_car_prediction_with_shipped_artifact() {
    let config = Config {
        model_path: Some(artifact("car_price.json")),
        ..Config::default()
    };
    let state = prepare::<CarPrice>(config).unwrap();
    assert!(state.model.is_loaded());

    let (status, body) = post(create_router::<CarPrice>(state), &car_payload().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let price = body["predicted_price"].as_f64().expect("price is a number");
    assert!(price.is_finite() && price > 0.0, "price {}", price);
}

#[tokio::test]
async fn test_missing_field_never_reaches_model() {
    let model = FakeModel::for_service::<CarPrice>(Ok(1.0));
    let app = router::<CarPrice>(ModelSlot::from_model(model.clone()));

    let mut body = car_payload();
    body.as_object_mut().unwrap().remove("Year");
    let (status, body) = post(app, &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("Year"));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_wrong_type_never_reaches_model() {
    let model = FakeModel::for_service::<CarPrice>(Ok(1.0));
    let app = router::<CarPrice>(ModelSlot::from_model(model.clone()));

    let mut body = car_payload();
    body["Year"] = json!("twenty fifteen");
    let (status, _) = post(app, &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_client_error() {
    let model = FakeModel::for_service::<CarPrice>(Ok(1.0));
    let app = router::<CarPrice>(ModelSlot::from_model(model.clone()));

    let (status, _) = post(app, "{\"Make\": ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_inference_error_keeps_serving() {
    let model = FakeModel::for_service::<CarPrice>(Err(InferenceError::UnknownCategory {
        column: "Make".into(),
        value: "Lada".into(),
    }));
    let app = router::<CarPrice>(ModelSlot::from_model(model.clone()));

    let (status, body) = post(app.clone(), &car_payload().to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Error during prediction: Found unknown categories ['Lada']"));

    let (status, _) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_non_finite_output_is_an_error() {
    let model = FakeModel::for_service::<CarPrice>(Ok(f64::NAN));
    let app = router::<CarPrice>(ModelSlot::from_model(model));

    let (status, body) = post(app, &car_payload().to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("non-finite"));
}

// ============================================================================
// HEART DISEASE
// ============================================================================

#[tokio::test]
async fn test_heart_age_out_of_range_never_reaches_model() {
    let model = FakeModel::for_service::<HeartDisease>(Ok(1.0));
    let app = router::<HeartDisease>(ModelSlot::from_model(model.clone()));

    let mut body = heart_payload();
    body["age"] = json!(25);
    let (status, body) = post(app, &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "age must be between 30 and 80");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_heart_prediction_labels() {
    for (class, label) in [(1.0, "yes"), (0.0, "no")] {
        let model = FakeModel::for_service::<HeartDisease>(Ok(class));
        let app = router::<HeartDisease>(ModelSlot::from_model(model.clone()));

        let (status, body) = post(app, &heart_payload().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"prediction": label}));

        let row = model.last_row();
        assert_eq!(row.get("current_smoker"), Some(&FeatureValue::Int(1)));
        assert_eq!(row.get("bp_medication"), Some(&FeatureValue::Int(0)));
        assert_eq!(row.get("gender"), Some(&FeatureValue::Int(1)));
    }
}

#[tokio::test]
async fn test_heart_flag_spellings_produce_identical_rows() {
    let spellings = [json!("Yes"), json!("yes"), json!("YES"), json!(true), json!(1)];
    let mut rows = Vec::new();

    for spelling in spellings {
        let model = FakeModel::for_service::<HeartDisease>(Ok(0.0));
        let app = router::<HeartDisease>(ModelSlot::from_model(model.clone()));

        let mut body = heart_payload();
        body["diabetes"] = spelling;
        let (status, _) = post(app, &body.to_string()).await;
        assert_eq!(status, StatusCode::OK);

        let row = model.last_row();
        rows.push(serde_json::to_string(&row).unwrap());
    }

    assert!(rows.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn test_heart_unrecognized_flag_is_rejected() {
    let model = FakeModel::for_service::<HeartDisease>(Ok(0.0));
    let app = router::<HeartDisease>(ModelSlot::from_model(model.clone()));

    let mut body = heart_payload();
    body["diabetes"] = json!("maybe");
    let (status, body) = post(app, &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("diabetes"));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_heart_shipped_artifact_answers_yes_or_no() {
    let config = Config {
        model_path: Some(artifact("heart_disease.json")),
        ..Config::default()
    };
    let app = create_router::<HeartDisease>(prepare::<HeartDisease>(config).unwrap());

    let (status, body) = post(app, &heart_payload().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let label = body["prediction"].as_str().unwrap();
    assert!(label == "yes" || label == "no");
}

// ============================================================================
// HOUSE PRICE
// ============================================================================

#[tokio::test]
async fn test_house_shipped_artifact() {
    let config = Config {
        model_path: Some(artifact("house_price.json")),
        ..Config::default()
    };
    let app = create_router::<HousePrice>(prepare::<HousePrice>(config).unwrap());

    let (status, body) = post(app, &house_payload().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["predicted_price"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_house_unknown_area_type_is_inference_error() {
    let config = Config {
        model_path: Some(artifact("house_price.json")),
        ..Config::default()
    };
    let app = create_router::<HousePrice>(prepare::<HousePrice>(config).unwrap());

    let mut body = house_payload();
    body["area_type"] = json!("Penthouse");
    let (status, body) = post(app, &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Found unknown categories ['Penthouse'] in column 'area_type'"));
}

// ============================================================================
// MODEL SLOT
// ============================================================================

#[tokio::test]
async fn test_unloaded_model_answers_503_but_stays_healthy() {
    let app = router::<HousePrice>(ModelSlot::unavailable("MODEL_PATH is not set"));

    let (status, body) = post(app.clone(), &house_payload().to_string()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"error": "Model not loaded.", "status": 503}));

    let (status, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "API is running!"}));
}

#[tokio::test]
async fn test_validation_runs_before_slot_check() {
    let app = router::<HeartDisease>(ModelSlot::unavailable("MODEL_PATH is not set"));

    let mut body = heart_payload();
    body["age"] = json!(81);
    let (status, _) = post(app, &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_flag_validation_runs_before_slot_check() {
    let app = router::<HeartDisease>(ModelSlot::unavailable("MODEL_PATH is not set"));

    let mut body = heart_payload();
    body["diabetes"] = json!("maybe");
    let (status, body) = post(app, &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("diabetes"));
}

#[tokio::test]
async fn test_lenient_flag_policy_reaches_model() {
    let model = FakeModel::for_service::<HeartDisease>(Ok(0.0));
    let config = Config {
        flag_policy: FlagPolicy::Lenient,
        ..Config::default()
    };
    let state = AppState::new(
        config,
        ModelSlot::from_model(model.clone()),
        FeatureMapper::new(HeartDisease::MAPPING),
    );
    let app = create_router::<HeartDisease>(state);

    let mut body = heart_payload();
    body["diabetes"] = json!("sometimes");
    let (status, _) = post(app, &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(model.calls(), 1);
    assert_eq!(model.last_row().get("diabetes"), Some(&FeatureValue::Int(1)));
}

#[tokio::test]
async fn test_health_messages_per_service() {
    let slot = || ModelSlot::unavailable("unset");

    let (_, body) = get(router::<CarPrice>(slot()), "/").await;
    assert_eq!(body["status"], "API is running!");

    let (_, body) = get(router::<HeartDisease>(slot()), "/").await;
    assert_eq!(body["status"], "API is running");
}

#[tokio::test]
async fn test_model_status_reports_metadata() {
    let model = FakeModel::for_service::<CarPrice>(Ok(1.0));
    let app = router::<CarPrice>(ModelSlot::from_model(model.clone()));

    let (status, body) = get(app, "/model").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "Car Price Prediction API");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["model"]["format"], "fake");
    assert_eq!(body["columns"][2], "Fuel Type");
    assert_eq!(body["mapping"][2], json!({"wire": "Fuel_Type", "column": "Fuel Type"}));
    assert!(body.get("reason").is_none());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_model_status_reports_unavailable_reason() {
    let app = router::<HousePrice>(ModelSlot::unavailable("file not found"));

    let (_, body) = get(app, "/model").await;

    assert_eq!(body["model_loaded"], false);
    assert_eq!(body["reason"], "file not found");
    assert!(body.get("model").is_none());
}

// ============================================================================
// STARTUP
// ============================================================================

#[test]
fn test_prepare_rejects_mismatched_artifact() {
    // House artifact against the car mapping table
    let config = Config {
        model_path: Some(artifact("house_price.json")),
        ..Config::default()
    };
    let err = prepare::<CarPrice>(config).err().expect("schema mismatch");
    assert!(err.to_string().contains("does not match"));
}

#[test]
fn test_prepare_without_model_still_builds_state() {
    let state = prepare::<HeartDisease>(Config::default()).unwrap();
    assert!(!state.model.is_loaded());
}

#[test]
fn test_shipped_artifacts_match_their_tables() {
    fn check<S: PredictionService>(file: &str) {
        let slot = ModelSlot::load(Some(&artifact(file)));
        let loaded = slot.loaded().unwrap_or_else(|| panic!("{} should load", file));
        FeatureMapper::new(S::MAPPING)
            .verify(&loaded.model.input_columns())
            .unwrap();
    }

    check::<CarPrice>("car_price.json");
    check::<HeartDisease>("heart_disease.json");
    check::<HousePrice>("house_price.json");
}

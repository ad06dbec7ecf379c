//! Tabular Prediction Services
//!
//! Shared core of the car price, heart disease and house price APIs. Each
//! binary picks one [`services::PredictionService`] and calls [`run`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      PREDICTION SERVICE                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  POST /predict                                               │
//! │    │                                                         │
//! │    ▼                                                         │
//! │  ValidatedJson ──► normalize ──► FeatureMapper ──► Model     │
//! │  (schema, ranges)   (flags 0/1)   (wire → columns)   │       │
//! │                                                      ▼       │
//! │                                        respond ◄── f64       │
//! │                                                              │
//! │  GET /        liveness            GET /model   slot status   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod handlers;
pub mod model;
pub mod services;
pub mod validate;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

use config::Config;
use features::FeatureMapper;
use model::ModelSlot;
use services::PredictionService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: ModelSlot,
    pub mapper: FeatureMapper,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, model: ModelSlot, mapper: FeatureMapper) -> Self {
        Self { model, mapper, config }
    }
}

/// Create the router for one service
pub fn create_router<S: PredictionService>(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::check::<S>))
        .route("/model", get(handlers::model::status::<S>))
        .route("/predict", post(handlers::predict::predict::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

/// Load the model, check the mapping table against it and build the state
pub fn prepare<S: PredictionService>(config: Config) -> anyhow::Result<AppState> {
    let model = ModelSlot::load(config.model_path.as_deref());
    let mapper = FeatureMapper::new(S::MAPPING);

    if let Some(loaded) = model.loaded() {
        mapper.verify(&loaded.model.input_columns()).map_err(|e| {
            anyhow::anyhow!(
                "model {} does not match the {} mapping table: {}",
                loaded.metadata.model_path,
                S::INFO.title,
                e
            )
        })?;
        tracing::info!("Mapping table verified against model columns");
    } else {
        tracing::warn!("Serving without a model; /predict will answer 503");
    }

    Ok(AppState::new(config, model, mapper))
}

/// Service entry point used by the binaries
pub async fn run<S: PredictionService>() -> anyhow::Result<()> {
    // Load .env before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize logging (LOG_FORMAT=json for structured output)
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "prediction_api=debug,tower_http=debug".into()))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    let config = Config::from_env(S::INFO.env_prefix, S::INFO.default_port);

    tracing::info!("{} v{} starting...", S::INFO.title, S::INFO.version);
    tracing::info!(
        "Model path: {}",
        config
            .model_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unset>".to_string())
    );

    let state = prepare::<S>(config.clone())?;
    let app = create_router::<S>(state);

    let addr = config.bind_addr();
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

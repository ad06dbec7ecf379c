//! Prediction Form Client
//!
//! Small web app in front of the three prediction services. Renders one form
//! per service, posts the submitted values as the service's JSON payload and
//! shows the prediction or the error under the form.

pub mod client;
pub mod config;
pub mod forms;
pub mod html;

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    routing::get,
    Form, Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client::ApiClient;
use config::FormConfig;
use forms::{CarForm, HeartForm, HouseForm, PredictionForm};
use html::Outcome;

/// Shared application state
#[derive(Clone)]
pub struct FormState {
    pub config: Arc<FormConfig>,
    pub client: ApiClient,
}

impl FormState {
    pub fn new(config: FormConfig) -> anyhow::Result<Self> {
        let client = ApiClient::new(config.timeout())?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}

/// Create the router
pub fn create_router(state: FormState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(CarForm::PATH, get(show::<CarForm>).post(submit::<CarForm>))
        .route(HeartForm::PATH, get(show::<HeartForm>).post(submit::<HeartForm>))
        .route(HouseForm::PATH, get(show::<HouseForm>).post(submit::<HouseForm>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// HANDLERS
// ============================================================================

async fn index() -> Html<String> {
    Html(html::index_page(&[
        (CarForm::PATH, CarForm::TITLE),
        (HeartForm::PATH, HeartForm::TITLE),
        (HouseForm::PATH, HouseForm::TITLE),
    ]))
}

fn render<F: PredictionForm>(form: &F, outcome: Option<&Outcome>) -> Html<String> {
    Html(html::form_page(F::TITLE, F::INTRO, F::PATH, &form.fields(), outcome))
}

/// GET: empty form with defaults
async fn show<F: PredictionForm>() -> Html<String> {
    render(&F::default(), None)
}

/// POST: forward to the service and re-render with the outcome
async fn submit<F: PredictionForm>(
    State(state): State<FormState>,
    form: Result<Form<F>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!("Form rejected: {}", rejection.body_text());
            let outcome = Outcome::Failure(format!("Error: {}", rejection.body_text()));
            return render(&F::default(), Some(&outcome));
        }
    };

    if let Err(e) = form.check() {
        return render(&form, Some(&Outcome::Failure(format!("Error: {}", e))));
    }

    let url = F::api_url(&state.config);
    tracing::info!("Submitting {} to {}", F::PATH, url);

    let outcome = forms::outcome::<F>(state.client.predict(url, &form).await);
    render(&form, Some(&outcome))
}

// ============================================================================
// ENTRY POINT
// ============================================================================

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "prediction_form=debug,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = FormConfig::from_env();
    tracing::info!("Car API: {}", config.car_api_url);
    tracing::info!("Heart API: {}", config.heart_api_url);
    tracing::info!("House API: {}", config.house_api_url);

    let addr = config.bind_addr();
    let app = create_router(FormState::new(config)?);

    tracing::info!("🚀 Form client listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

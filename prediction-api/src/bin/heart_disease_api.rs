//! Heart disease prediction service

use prediction_api::services::HeartDisease;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    prediction_api::run::<HeartDisease>().await
}

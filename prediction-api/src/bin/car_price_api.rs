//! Car price prediction service

use prediction_api::services::CarPrice;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    prediction_api::run::<CarPrice>().await
}

//! House price prediction service

use prediction_api::services::HousePrice;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    prediction_api::run::<HousePrice>().await
}

//! Prediction form client binary

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    prediction_form::run().await
}

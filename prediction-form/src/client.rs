//! Prediction API Client
//!
//! Posts a flat JSON payload to a service's `/predict` endpoint. One attempt
//! per submission; no retries.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Error body returned by the prediction services
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// HTTP client shared by every form
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
}

impl ApiClient {
    /// Create a client with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// POST the payload and return the decoded success body
    pub async fn predict<T: Serialize + ?Sized>(&self, url: &str, payload: &T) -> Result<Value, ClientError> {
        tracing::debug!("POST {}", url);

        let response = self.http_client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response.json().await
                .map_err(|e| ClientError::Parse(e.to_string()));
        }

        let error_text = response.text().await.unwrap_or_default();
        let error = serde_json::from_str::<ErrorResponse>(&error_text)
            .ok()
            .map(|body| body.error);

        tracing::warn!("Prediction API answered {}: {}", status.as_u16(), error_text);
        Err(ClientError::Api {
            status: status.as_u16(),
            error,
        })
    }
}

/// Client errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-2xx answer; `error` is set when the body was the services' JSON error shape
    #[error("API Error: {status}")]
    Api { status: u16, error: Option<String> },

    #[error("Parse error: {0}")]
    Parse(String),
}

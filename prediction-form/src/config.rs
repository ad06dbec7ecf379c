//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_CAR_API_URL: &str = "http://127.0.0.1:8000/predict";
pub const DEFAULT_HEART_API_URL: &str = "http://127.0.0.1:8001/predict";
pub const DEFAULT_HOUSE_API_URL: &str = "http://127.0.0.1:8002/predict";

/// Form client configuration
#[derive(Debug, Clone)]
pub struct FormConfig {
    pub car_api_url: String,
    pub heart_api_url: String,
    pub house_api_url: String,

    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Per-request timeout towards the prediction services
    pub timeout_secs: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            car_api_url: DEFAULT_CAR_API_URL.to_string(),
            heart_api_url: DEFAULT_HEART_API_URL.to_string(),
            house_api_url: DEFAULT_HOUSE_API_URL.to_string(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8501,
            timeout_secs: 30,
        }
    }
}

impl FormConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            car_api_url: non_empty("CAR_API_URL").unwrap_or(defaults.car_api_url),
            heart_api_url: non_empty("HEART_API_URL").unwrap_or(defaults.heart_api_url),
            house_api_url: non_empty("HOUSE_API_URL").unwrap_or(defaults.house_api_url),
            host: non_empty("FORM_HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.host),
            port: non_empty("FORM_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            timeout_secs: non_empty("API_TIMEOUT_SECS")
                .and_then(|t| t.parse().ok())
                .filter(|t| *t > 0)
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

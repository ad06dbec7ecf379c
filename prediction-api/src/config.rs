//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::validate::FlagPolicy;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Model artifact path (`<PREFIX>_MODEL_PATH`, then `MODEL_PATH`)
    pub model_path: Option<PathBuf>,

    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Handling of unrecognized yes/no encodings
    pub flag_policy: FlagPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: None,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            flag_policy: FlagPolicy::Strict,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env(prefix: &str, default_port: u16) -> Self {
        Self::from_lookup(prefix, default_port, |key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable source
    pub fn from_lookup<F>(prefix: &str, default_port: u16, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            model_path: non_empty(&format!("{}_MODEL_PATH", prefix))
                .or_else(|| non_empty("MODEL_PATH"))
                .map(PathBuf::from),

            host: non_empty("HOST")
                .and_then(|h| h.trim().parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),

            port: non_empty("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(default_port),

            flag_policy: match non_empty("STRICT_FLAGS").map(|v| v.trim().to_lowercase()) {
                Some(v) if v == "false" || v == "0" || v == "no" => FlagPolicy::Lenient,
                _ => FlagPolicy::Strict,
            },
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

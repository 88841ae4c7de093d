// src/config.rs - Base URL and poll interval configuration
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Fixed refresh interval, matching the backend's expected poll cadence.
/// Deliberately not user-configurable.
pub const POLL_INTERVAL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
}

impl Config {
    /// Resolve the base URL: explicit override first, then the
    /// `API_BASE_URL` environment variable, then the default.
    pub fn resolve(override_url: Option<String>) -> Self {
        let api_base_url = override_url
            .or_else(|| env::var("API_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        Self { api_base_url }
    }
}

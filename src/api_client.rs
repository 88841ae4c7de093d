// src/api_client.rs - One request per logical backend resource
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::TransportError;
use crate::types::{
    AnalyticsSnapshot, MarketSnapshot, PerformanceSnapshot, StatusPayload, TogglePayload,
    TradeHistoryPayload,
};

/// Thin client over the backend HTTP API. Each operation issues exactly one
/// request and propagates failure to the caller; retry policy lives in the
/// poll coordinator.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        path: &str,
    ) -> Result<T, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| TransportError::Request { resource, source })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                resource,
                status: response.status(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| TransportError::Decode { resource, source })
    }

    pub async fn fetch_status(&self) -> Result<StatusPayload, TransportError> {
        self.get_json("status", "/status").await
    }

    pub async fn fetch_analytics(&self) -> Result<AnalyticsSnapshot, TransportError> {
        self.get_json("analytics", "/analytics").await
    }

    pub async fn fetch_trade_history(&self) -> Result<TradeHistoryPayload, TransportError> {
        self.get_json("trade-history", "/trade-history").await
    }

    pub async fn fetch_market_data(&self) -> Result<MarketSnapshot, TransportError> {
        self.get_json("market-data", "/market-data").await
    }

    pub async fn fetch_performance_metrics(&self) -> Result<PerformanceSnapshot, TransportError> {
        self.get_json("performance", "/performance").await
    }

    /// The one mutating operation. Not idempotent: two rapid invocations
    /// toggle twice.
    pub async fn toggle_auto_trading(&self) -> Result<TogglePayload, TransportError> {
        let resource = "toggle-auto";
        let url = format!("{}/toggle-auto", self.base_url);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| TransportError::Request { resource, source })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                resource,
                status: response.status(),
            });
        }

        response
            .json::<TogglePayload>()
            .await
            .map_err(|source| TransportError::Decode { resource, source })
    }
}

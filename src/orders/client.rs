//! HTTP client for the recent-orders endpoint.
//!
//! The API returns a window of recent orders plus metadata about the window
//! itself. Failures are typed so the caller can turn them into a
//! user-facing warning instead of aborting the session.

use crate::models::Order;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from the orders API, mirrored on the transport failure modes.
#[derive(Debug, Error)]
pub enum OrdersApiError {
    #[error("request to the sales API timed out after {0}s")]
    Timeout(u64),
    #[error("cannot connect to the sales API at {0}")]
    Connect(String),
    #[error("sales API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("sales API response was not valid JSON: {0}")]
    InvalidBody(#[from] reqwest::Error),
}

/// Raw response shape of the recent-orders endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrdersResponse {
    pub total_orders: u64,
    pub max_limit: u64,
    pub date_range: Option<String>,
    pub orders: Vec<Order>,
}

/// Client for fetching recent orders.
pub struct OrdersClient {
    base_url: String,
    timeout_seconds: u64,
    http_client: reqwest::Client,
}

impl OrdersClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            timeout_seconds,
            http_client,
        }
    }

    /// Fetch the recent-orders window.
    ///
    /// Warns when the API reports it hit its own limit, since the window is
    /// then truncated and metrics may undercount.
    pub async fn fetch_recent(&self) -> Result<OrdersResponse, OrdersApiError> {
        let url = format!("{}/orders/recent", self.base_url.trim_end_matches('/'));
        debug!("Fetching orders from {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OrdersApiError::Status { status, body });
        }

        let parsed: OrdersResponse = response.json().await?;

        if parsed.max_limit > 0 && parsed.total_orders >= parsed.max_limit {
            warn!(
                "API returned the max {} orders; data may be truncated",
                parsed.max_limit
            );
        }
        if let Some(ref range) = parsed.date_range {
            info!("Date range of data: {}", range);
        }

        Ok(parsed)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> OrdersApiError {
        if e.is_timeout() {
            OrdersApiError::Timeout(self.timeout_seconds)
        } else if e.is_connect() {
            OrdersApiError::Connect(self.base_url.clone())
        } else {
            OrdersApiError::InvalidBody(e)
        }
    }
}

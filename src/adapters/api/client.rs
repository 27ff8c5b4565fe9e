//! HTTP JSON Client - reqwest-backed `JsonFetcher`
//!
//! Shared by the price oracle and the Tron account lookup. Performs a
//! single GET per call; backoff is the caller's business and happens
//! in `RetryPolicy`, which only reacts to `ChainError::RateLimited`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::domain::error::ChainError;
use crate::ports::json_fetcher::JsonFetcher;

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
  /// Whole-request timeout.
  pub timeout: Duration,
  /// Sent as the `User-Agent` header.
  pub user_agent: String,
}

impl Default for HttpClientConfig {
  fn default() -> Self {
    Self {
      timeout: Duration::from_secs(15),
      user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
    }
  }
}

/// GET-and-parse client for public REST APIs.
#[derive(Debug, Clone)]
pub struct HttpJsonClient {
  http: Client,
}

impl HttpJsonClient {
  /// Build the underlying reqwest client.
  pub fn new(config: HttpClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .user_agent(config.user_agent)
      .pool_max_idle_per_host(5)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { http })
  }
}

/// Map a non-success status onto the error taxonomy.
pub fn classify_status(status: StatusCode, url: &str) -> Option<ChainError> {
  if status == StatusCode::TOO_MANY_REQUESTS {
    Some(ChainError::RateLimited)
  } else if status.is_success() {
    None
  } else {
    Some(ChainError::Http {
      status: status.as_u16(),
      url: url.to_string(),
    })
  }
}

#[async_trait]
impl JsonFetcher for HttpJsonClient {
  #[instrument(skip(self))]
  async fn get_json(&self, url: &str) -> Result<Value, ChainError> {
    let response = self
      .http
      .get(url)
      .header("Accept", "application/json")
      .send()
      .await
      .map_err(|e| ChainError::Connection(e.to_string()))?;

    let status = response.status();
    if let Some(err) = classify_status(status, url) {
      if err.is_rate_limited() {
        debug!("Upstream rate limited");
      } else {
        warn!(status = status.as_u16(), "Upstream returned error status");
      }
      return Err(err);
    }

    response
      .json::<Value>()
      .await
      .map_err(|e| ChainError::Decode(format!("{url}: {e}")))
  }
}

//! JSON Fetcher Port - REST GET Interface for Price and Explorer APIs
//!
//! DexScreener and Tronscan are both plain `GET → JSON` endpoints.
//! Adapters must report HTTP 429 as `ChainError::RateLimited` and any
//! other non-2xx status as `ChainError::Http`.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::ChainError;

/// Fetch a URL and parse the body as JSON.
#[async_trait]
pub trait JsonFetcher: Send + Sync + 'static {
  async fn get_json(&self, url: &str) -> Result<Value, ChainError>;
}

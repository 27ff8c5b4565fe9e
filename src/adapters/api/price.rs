//! Price Oracle - USD Spot Price per Chain Family
//!
//! EVM tokens are priced from DexScreener's token endpoint (first
//! listed pair), TRC-20 tokens from Tronscan's token info. A missing
//! listing yields `0.0`; transport failures propagate.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use crate::adapters::retry::RetryPolicy;
use crate::domain::asset::{PriceQuote, TokenContract, TokenIdentity};
use crate::domain::error::ChainError;
use crate::ports::json_fetcher::JsonFetcher;

use super::types::{DexTokensResponse, TronTokenResponse};

/// Default DexScreener API root.
pub const DEX_SCREENER_URL: &str = "https://api.dexscreener.com";
/// Default Tronscan token API root.
pub const TRONSCAN_API_URL: &str = "https://apilist.tronscanapi.com";

/// Chain-aware USD price lookup.
pub struct PriceOracle {
  http: Arc<dyn JsonFetcher>,
  retry: RetryPolicy,
  /// DexScreener root, without trailing slash.
  dex_base_url: String,
  /// Tronscan token API root, without trailing slash.
  tronscan_base_url: String,
}

impl PriceOracle {
  pub fn new(
    http: Arc<dyn JsonFetcher>,
    retry: RetryPolicy,
    dex_base_url: &str,
    tronscan_base_url: &str,
  ) -> Self {
    Self {
      http,
      retry,
      dex_base_url: dex_base_url.trim_end_matches('/').to_string(),
      tronscan_base_url: tronscan_base_url.trim_end_matches('/').to_string(),
    }
  }

  /// Oracle against the public DexScreener and Tronscan hosts.
  pub fn public(http: Arc<dyn JsonFetcher>, retry: RetryPolicy) -> Self {
    Self::new(http, retry, DEX_SCREENER_URL, TRONSCAN_API_URL)
  }

  /// USD per whole token, `0.0` when no market data exists.
  #[instrument(skip(self, token), fields(symbol = %token.symbol, network = %token.network))]
  pub async fn price_usd(&self, token: &TokenIdentity) -> Result<PriceQuote, ChainError> {
    let price = match &token.contract {
      TokenContract::Evm(_) => {
        let url = format!("{}/latest/dex/tokens/{}", self.dex_base_url, token.contract);
        self
          .fetch::<DexTokensResponse>("dexscreener_price", &url)
          .await?
          .first_price()
      }
      TokenContract::Tron(id) => {
        let url = format!("{}/api/token_trc20?contract={id}", self.tronscan_base_url);
        self
          .fetch::<TronTokenResponse>("tronscan_price", &url)
          .await?
          .first_price()
      }
    };

    info!(price_usd = price, "Quoted token price");
    Ok(price)
  }

  async fn fetch<T: DeserializeOwned>(&self, operation: &str, url: &str) -> Result<T, ChainError> {
    let body = self
      .retry
      .run(operation, || self.http.get_json(url))
      .await?;
    serde_json::from_value(body).map_err(|e| ChainError::Decode(format!("{operation}: {e}")))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;
  use std::time::Duration;

  use async_trait::async_trait;
  use serde_json::{json, Value};

  use super::*;
  use crate::domain::address::checksum;

  /// Replays queued responses and records requested URLs.
  struct Scripted {
    responses: Mutex<Vec<Result<Value, ChainError>>>,
    urls: Mutex<Vec<String>>,
  }

  impl Scripted {
    fn new(mut responses: Vec<Result<Value, ChainError>>) -> Arc<Self> {
      responses.reverse();
      Arc::new(Self {
        responses: Mutex::new(responses),
        urls: Mutex::new(Vec::new()),
      })
    }
  }

  #[async_trait]
  impl JsonFetcher for Scripted {
    async fn get_json(&self, url: &str) -> Result<Value, ChainError> {
      self.urls.lock().unwrap().push(url.to_string());
      self
        .responses
        .lock()
        .unwrap()
        .pop()
        .unwrap_or_else(|| Err(ChainError::Connection("script exhausted".into())))
    }
  }

  fn usdc_base() -> TokenIdentity {
    TokenIdentity::new(
      "USDC",
      TokenContract::Evm(checksum("0x833589fcd6edb6e08f4c7c32d4f71b54bda02913").unwrap()),
      "BASE",
      "https://basescan.org",
    )
  }

  fn usdt_tron() -> TokenIdentity {
    TokenIdentity::new(
      "USDT",
      TokenContract::Tron("TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t".parse().unwrap()),
      "TRON",
      "https://tronscan.org",
    )
  }

  fn oracle(http: Arc<Scripted>) -> PriceOracle {
    PriceOracle::new(
      http,
      RetryPolicy::new(3, Duration::from_millis(1)),
      "https://dex.test/",
      "https://tron.test",
    )
  }

  #[tokio::test]
  async fn test_evm_price_from_first_pair() {
    let http = Scripted::new(vec![Ok(json!({ "pairs": [{ "priceUsd": "1.23" }] }))]);
    let price = oracle(Arc::clone(&http)).price_usd(&usdc_base()).await.unwrap();

    assert_eq!(price, 1.23);
    assert_eq!(
      http.urls.lock().unwrap().as_slice(),
      ["https://dex.test/latest/dex/tokens/0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"]
    );
  }

  #[tokio::test]
  async fn test_evm_unlisted_is_zero() {
    let http = Scripted::new(vec![Ok(json!({ "pairs": null }))]);
    assert_eq!(oracle(http).price_usd(&usdc_base()).await.unwrap(), 0.0);
  }

  #[tokio::test]
  async fn test_tron_price_url_and_value() {
    let http = Scripted::new(vec![Ok(json!({
      "trc20_tokens": [{ "market_info": { "priceInUsd": 0.9997 } }]
    }))]);
    let price = oracle(Arc::clone(&http)).price_usd(&usdt_tron()).await.unwrap();

    assert_eq!(price, 0.9997);
    assert_eq!(
      http.urls.lock().unwrap().as_slice(),
      ["https://tron.test/api/token_trc20?contract=TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t"]
    );
  }

  #[tokio::test]
  async fn test_rate_limit_then_success() {
    let http = Scripted::new(vec![
      Err(ChainError::RateLimited),
      Ok(json!({ "pairs": [{ "priceUsd": "2.5" }] })),
    ]);
    let price = oracle(Arc::clone(&http)).price_usd(&usdc_base()).await.unwrap();
    assert_eq!(price, 2.5);
    assert_eq!(http.urls.lock().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn test_hard_failure_propagates() {
    let http = Scripted::new(vec![Err(ChainError::Http {
      status: 503,
      url: "https://dex.test".into(),
    })]);
    assert!(matches!(
      oracle(http).price_usd(&usdc_base()).await,
      Err(ChainError::Http { status: 503, .. })
    ));
  }

  #[tokio::test]
  async fn test_malformed_body_is_decode_error() {
    let http = Scripted::new(vec![Ok(json!({ "pairs": "nope" }))]);
    assert!(matches!(
      oracle(http).price_usd(&usdc_base()).await,
      Err(ChainError::Decode(_))
    ));
  }

  #[tokio::test]
  async fn test_unparsable_price_is_decode_error() {
    let http = Scripted::new(vec![Ok(json!({ "pairs": [{ "priceUsd": "N/A" }] }))]);
    assert!(matches!(
      oracle(http).price_usd(&usdc_base()).await,
      Err(ChainError::Decode(_))
    ));

    let http = Scripted::new(vec![Ok(json!({
      "trc20_tokens": [{ "market_info": { "priceInUsd": "oops" } }]
    }))]);
    assert!(matches!(
      oracle(http).price_usd(&usdt_tron()).await,
      Err(ChainError::Decode(_))
    ));
  }
}

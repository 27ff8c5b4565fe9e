//! Configuration Module - TOML-based Verifier Configuration
//!
//! Loads and validates configuration from `config.toml` with
//! environment variable overrides via `.env` files.
//! Token contracts, RPC endpoints and API roots are externalized
//! here - nothing is hardcoded in the adapters beyond public defaults.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

use crate::adapters::api::price::{DEX_SCREENER_URL, TRONSCAN_API_URL};
use crate::adapters::assets::tron::TRON_ACCOUNT_URL;
use crate::adapters::retry::RetryPolicy;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Service identity and logging.
  #[serde(default)]
  pub service: ServiceConfig,
  /// Backoff for rate-limited upstreams.
  #[serde(default)]
  pub retry: RetryConfig,
  /// Where contract ABIs live.
  #[serde(default)]
  pub abi: AbiConfig,
  /// Third-party REST API roots.
  #[serde(default)]
  pub endpoints: EndpointConfig,
  /// Payable tokens, in display order.
  pub assets: Vec<AssetConfig>,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  /// Human-readable service name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

/// Retry budget for HTTP 429 / JSON-RPC 429 responses.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
  /// Total attempts per call.
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
  /// First backoff delay; doubled after each retry.
  #[serde(default = "default_initial_delay_ms")]
  pub initial_delay_ms: u64,
}

impl Default for RetryConfig {
  fn default() -> Self {
    Self {
      max_retries: default_max_retries(),
      initial_delay_ms: default_initial_delay_ms(),
    }
  }
}

impl RetryConfig {
  pub fn policy(&self) -> RetryPolicy {
    RetryPolicy::new(self.max_retries, Duration::from_millis(self.initial_delay_ms))
  }
}

/// ABI lookup configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiConfig {
  /// Directory holding `<name>.abi` files.
  #[serde(default = "default_abi_dir")]
  pub dir: String,
}

impl Default for AbiConfig {
  fn default() -> Self {
    Self {
      dir: default_abi_dir(),
    }
  }
}

/// REST API roots and HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
  /// DexScreener API root (EVM prices).
  #[serde(default = "default_dex_screener_url")]
  pub dex_screener_url: String,
  /// Tronscan token API root (TRC-20 prices).
  #[serde(default = "default_tronscan_api_url")]
  pub tronscan_api_url: String,
  /// Tronscan account API root (TRC-20 balances).
  #[serde(default = "default_tron_account_url")]
  pub tron_account_url: String,
  /// HTTP request timeout in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_seconds: u64,
}

impl Default for EndpointConfig {
  fn default() -> Self {
    Self {
      dex_screener_url: default_dex_screener_url(),
      tronscan_api_url: default_tronscan_api_url(),
      tron_account_url: default_tron_account_url(),
      timeout_seconds: default_timeout(),
    }
  }
}

/// Chain family of a configured asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
  Evm,
  Tron,
}

/// One payable token.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
  pub kind: AssetKind,
  /// Ticker, e.g. "USDC".
  pub symbol: String,
  /// Network label, e.g. "BASE".
  pub network: String,
  /// Contract address (EVM, any case) or contract id (Tron).
  pub contract: String,
  /// Explorer page. Tron defaults to Tronscan's token page.
  pub link: Option<String>,
  /// JSON-RPC endpoint (EVM only).
  pub rpc_url: Option<String>,
  /// Environment variable that overrides `rpc_url` when set.
  pub rpc_url_env: Option<String>,
}

impl AssetConfig {
  /// `SYMBOL@NETWORK`, the key assets are selected by.
  pub fn key(&self) -> String {
    format!("{}@{}", self.symbol, self.network)
  }

  /// RPC endpoint after applying the environment override.
  pub fn resolved_rpc_url(&self) -> Option<String> {
    self
      .rpc_url_env
      .as_deref()
      .and_then(|name| std::env::var(name).ok())
      .filter(|url| !url.trim().is_empty())
      .or_else(|| self.rpc_url.clone())
  }
}

// Default value functions for serde

fn default_name() -> String {
  "deposit-verifier".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_max_retries() -> u32 {
  10
}

fn default_initial_delay_ms() -> u64 {
  1_000
}

fn default_abi_dir() -> String {
  "assets".to_string()
}

fn default_dex_screener_url() -> String {
  DEX_SCREENER_URL.to_string()
}

fn default_tronscan_api_url() -> String {
  TRONSCAN_API_URL.to_string()
}

fn default_tron_account_url() -> String {
  TRON_ACCOUNT_URL.to_string()
}

fn default_timeout() -> u64 {
  15
}

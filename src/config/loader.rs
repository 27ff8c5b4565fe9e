//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `.env` and `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::domain::address::{checksum, TronAddress};

use super::{AppConfig, AssetKind};

/// Load `.env` (if present), then load and validate a TOML config.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  if let Ok(env_file) = dotenv::dotenv() {
    debug!(path = %env_file.display(), "Loaded .env");
  }

  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    assets = config.assets.len(),
    max_retries = config.retry.max_retries,
    abi_dir = %config.abi.dir,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A non-zero retry budget
/// - At least one asset, with unique `SYMBOL@NETWORK` keys
/// - Contracts that parse for their chain family
/// - An RPC endpoint for every EVM asset
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    config.retry.max_retries >= 1,
    "retry.max_retries must be at least 1, got {}",
    config.retry.max_retries
  );
  anyhow::ensure!(
    config.endpoints.timeout_seconds > 0,
    "endpoints.timeout_seconds must be positive"
  );
  anyhow::ensure!(
    !config.assets.is_empty(),
    "At least one asset must be configured"
  );

  for (i, asset) in config.assets.iter().enumerate() {
    anyhow::ensure!(
      !asset.symbol.is_empty() && !asset.network.is_empty(),
      "Asset {i} must have a symbol and a network"
    );
    anyhow::ensure!(
      config.assets[..i].iter().all(|other| other.key() != asset.key()),
      "Asset {} is configured twice",
      asset.key()
    );

    match asset.kind {
      AssetKind::Evm => {
        checksum(&asset.contract)
          .with_context(|| format!("Asset {} has an invalid contract", asset.key()))?;
        anyhow::ensure!(
          asset.resolved_rpc_url().is_some(),
          "EVM asset {} needs rpc_url or a set {}",
          asset.key(),
          asset.rpc_url_env.as_deref().unwrap_or("rpc_url_env")
        );
        anyhow::ensure!(
          asset.link.is_some(),
          "EVM asset {} needs an explorer link",
          asset.key()
        );
      }
      AssetKind::Tron => {
        asset
          .contract
          .parse::<TronAddress>()
          .with_context(|| format!("Asset {} has an invalid contract", asset.key()))?;
      }
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  const VALID: &str = r#"
[service]
name = "verifier-test"

[retry]
max_retries = 4
initial_delay_ms = 250

[[assets]]
kind = "evm"
symbol = "USDC"
network = "BASE"
contract = "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913"
link = "https://basescan.org/token/0x833589fcd6edb6e08f4c7c32d4f71b54bda02913"
rpc_url = "https://mainnet.base.org"

[[assets]]
kind = "tron"
symbol = "USDT"
network = "TRON"
contract = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t"
"#;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_parse_valid_config_with_defaults() {
    let config = parse_config(VALID).unwrap();

    assert_eq!(config.service.name, "verifier-test");
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.retry.policy().max_retries, 4);
    assert_eq!(config.abi.dir, "assets");
    assert_eq!(config.endpoints.dex_screener_url, "https://api.dexscreener.com");
    assert_eq!(config.assets.len(), 2);
    assert_eq!(config.assets[1].kind, AssetKind::Tron);
    assert_eq!(config.assets[1].key(), "USDT@TRON");
  }

  #[test]
  fn test_rejects_evm_asset_without_rpc() {
    let text = VALID.replace("rpc_url = \"https://mainnet.base.org\"", "");
    let err = parse_config(&text).unwrap_err();
    assert!(err.to_string().contains("rpc_url"), "{err}");
  }

  #[test]
  fn test_rejects_zero_retry_budget() {
    let text = VALID.replace("max_retries = 4", "max_retries = 0");
    assert!(parse_config(&text).is_err());
  }

  #[test]
  fn test_rejects_bad_contracts() {
    let text = VALID.replace("0x833589fcd6edb6e08f4c7c32d4f71b54bda02913\"\nlink", "0x1234\"\nlink");
    assert!(parse_config(&text).is_err());

    let text = VALID.replace("TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t", "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6X");
    assert!(parse_config(&text).is_err());
  }

  #[test]
  fn test_rejects_duplicate_assets() {
    let text = format!(
      "{VALID}\n[[assets]]\nkind = \"tron\"\nsymbol = \"USDT\"\nnetwork = \"TRON\"\ncontract = \"TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t\"\n"
    );
    assert!(parse_config(&text).is_err());
  }

  #[test]
  fn test_rpc_env_override() {
    let text = VALID.replace(
      "rpc_url = \"https://mainnet.base.org\"",
      "rpc_url_env = \"DEPOSIT_VERIFIER_TEST_BASE_RPC\"",
    );
    // SAFETY: variable name is unique to this test.
    unsafe { std::env::set_var("DEPOSIT_VERIFIER_TEST_BASE_RPC", "https://base.example") };
    let config = parse_config(&text).unwrap();
    assert_eq!(
      config.assets[0].resolved_rpc_url().as_deref(),
      Some("https://base.example")
    );
  }
}

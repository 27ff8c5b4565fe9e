//! Asset Adapters - Configured Payable Tokens
//!
//! One `AssetAdapter` implementation per chain family:
//! - `evm`: ERC-20/BEP-20 via `ContractClient` and DexScreener
//! - `tron`: TRC-20 via the Tronscan REST API
//!
//! `AssetCatalog` wires the shared context (one connection registry,
//! one contract client, one price oracle, one HTTP client) and builds
//! every asset listed in the configuration.

pub mod evm;
pub mod tron;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::api::{HttpClientConfig, HttpJsonClient, PriceOracle};
use crate::adapters::chain::{AbiDirectory, ConnectionRegistry, ContractClient};
use crate::config::{AppConfig, AssetConfig, AssetKind};
use crate::domain::address::{checksum, TronAddress};
use crate::domain::asset::{TokenContract, TokenIdentity};
use crate::ports::abi_source::AbiSource;
use crate::ports::asset::AssetAdapter;
use crate::ports::evm_rpc::EvmRpc;
use crate::ports::json_fetcher::JsonFetcher;

pub use evm::EvmAsset;
pub use tron::TronAsset;

/// A configured asset, keeping its concrete type for chain-specific tools.
#[derive(Clone)]
pub enum ConfiguredAsset {
    Evm(Arc<EvmAsset>),
    Tron(Arc<TronAsset>),
}

impl ConfiguredAsset {
    /// The asset behind the uniform interface.
    pub fn adapter(&self) -> Arc<dyn AssetAdapter> {
        match self {
            Self::Evm(asset) => Arc::clone(asset) as Arc<dyn AssetAdapter>,
            Self::Tron(asset) => Arc::clone(asset) as Arc<dyn AssetAdapter>,
        }
    }

    pub fn as_evm(&self) -> Option<&EvmAsset> {
        match self {
            Self::Evm(asset) => Some(asset),
            Self::Tron(_) => None,
        }
    }

    pub fn identity(&self) -> &TokenIdentity {
        match self {
            Self::Evm(asset) => asset.identity(),
            Self::Tron(asset) => asset.identity(),
        }
    }

    /// `SYMBOL@NETWORK`
    pub fn key(&self) -> String {
        let identity = self.identity();
        format!("{}@{}", identity.symbol, identity.network)
    }
}

/// Every configured asset over one shared chain-access context.
pub struct AssetCatalog {
    assets: Vec<ConfiguredAsset>,
    registry: Arc<ConnectionRegistry<dyn EvmRpc>>,
}

impl AssetCatalog {
    /// Build the production context (alloy HTTP providers, reqwest,
    /// on-disk ABIs) and every configured asset.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = HttpJsonClient::new(HttpClientConfig {
            timeout: Duration::from_secs(config.endpoints.timeout_seconds),
            ..Default::default()
        })?;

        Self::with_parts(
            config,
            Arc::new(ConnectionRegistry::http()),
            Arc::new(http),
            Arc::new(AbiDirectory::new(&config.abi.dir)),
        )
    }

    /// Build assets over caller-supplied infrastructure.
    pub fn with_parts(
        config: &AppConfig,
        registry: Arc<ConnectionRegistry<dyn EvmRpc>>,
        http: Arc<dyn JsonFetcher>,
        abis: Arc<dyn AbiSource>,
    ) -> Result<Self> {
        let retry = config.retry.policy();
        let contracts = Arc::new(ContractClient::new(Arc::clone(&registry), abis, retry));
        let prices = Arc::new(PriceOracle::new(
            Arc::clone(&http),
            retry,
            &config.endpoints.dex_screener_url,
            &config.endpoints.tronscan_api_url,
        ));

        let mut assets = Vec::with_capacity(config.assets.len());
        for asset in &config.assets {
            let built = match asset.kind {
                AssetKind::Evm => {
                    let identity = evm_identity(asset)?;
                    let rpc_url = asset
                        .resolved_rpc_url()
                        .with_context(|| format!("No RPC endpoint for {}", asset.key()))?;
                    ConfiguredAsset::Evm(Arc::new(EvmAsset::new(
                        identity,
                        rpc_url,
                        Arc::clone(&contracts),
                        Arc::clone(&prices),
                    )))
                }
                AssetKind::Tron => {
                    let contract_id: TronAddress = asset
                        .contract
                        .parse()
                        .with_context(|| format!("Invalid contract for {}", asset.key()))?;
                    let link = asset
                        .link
                        .clone()
                        .unwrap_or_else(|| TronAsset::explorer_link(&contract_id));
                    let identity = TokenIdentity::new(
                        &asset.symbol,
                        TokenContract::Tron(contract_id.clone()),
                        &asset.network,
                        link,
                    );
                    ConfiguredAsset::Tron(Arc::new(TronAsset::new(
                        identity,
                        contract_id,
                        Arc::clone(&http),
                        Arc::clone(&prices),
                        retry,
                        &config.endpoints.tron_account_url,
                    )))
                }
            };
            assets.push(built);
        }

        info!(
            assets = assets.len(),
            keys = ?assets.iter().map(ConfiguredAsset::key).collect::<Vec<_>>(),
            "Asset catalog ready"
        );

        Ok(Self { assets, registry })
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfiguredAsset> {
        self.assets.iter()
    }

    /// Every asset behind the uniform interface, in configuration order.
    pub fn adapters(&self) -> Vec<Arc<dyn AssetAdapter>> {
        self.assets.iter().map(ConfiguredAsset::adapter).collect()
    }

    /// Select by position (`"0"`) or by `SYMBOL@NETWORK`, case-insensitive.
    pub fn find(&self, selector: &str) -> Option<&ConfiguredAsset> {
        let selector = selector.trim();
        if let Ok(index) = selector.parse::<usize>() {
            return self.assets.get(index);
        }
        self.assets
            .iter()
            .find(|asset| asset.key().eq_ignore_ascii_case(selector))
    }

    /// Shared RPC connection cache.
    pub fn registry(&self) -> &Arc<ConnectionRegistry<dyn EvmRpc>> {
        &self.registry
    }
}

fn evm_identity(asset: &AssetConfig) -> Result<TokenIdentity> {
    let address = checksum(&asset.contract)
        .with_context(|| format!("Invalid contract for {}", asset.key()))?;
    let link = asset
        .link
        .clone()
        .with_context(|| format!("No explorer link for {}", asset.key()))?;
    Ok(TokenIdentity::new(
        &asset.symbol,
        TokenContract::Evm(address),
        &asset.network,
        link,
    ))
}

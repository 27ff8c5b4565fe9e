//! EVM Asset - ERC-20 / BEP-20 Token over JSON-RPC
//!
//! Balances come from the token contract (`balanceOf` and `decimals`
//! issued concurrently); prices come from DexScreener. The contract is
//! bound on first use and reused for the asset's lifetime.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

use crate::adapters::api::PriceOracle;
use crate::adapters::chain::{BlockTimestampResolver, BoundContract, ContractClient};
use crate::adapters::wallet::{CoinType, WalletDeriver};
use crate::domain::asset::{BalanceResult, DepositWallet, PriceQuote, TokenIdentity};
use crate::domain::error::ChainError;
use crate::domain::units::to_whole_units;
use crate::ports::asset::AssetAdapter;

/// ABI every EVM asset is bound against.
pub const ERC20_ABI: &str = "erc20";

/// A fungible token on an EVM-compatible chain.
pub struct EvmAsset {
    identity: TokenIdentity,
    /// JSON-RPC endpoint of the token's chain.
    rpc_url: String,
    contracts: Arc<ContractClient>,
    prices: Arc<PriceOracle>,
    wallets: WalletDeriver,
    /// Contract bound lazily on first balance or transfer query.
    bound: OnceCell<BoundContract>,
}

impl EvmAsset {
    pub fn new(
        identity: TokenIdentity,
        rpc_url: impl Into<String>,
        contracts: Arc<ContractClient>,
        prices: Arc<PriceOracle>,
    ) -> Self {
        Self {
            identity,
            rpc_url: rpc_url.into(),
            contracts,
            prices,
            wallets: WalletDeriver::new(CoinType::Ethereum),
            bound: OnceCell::new(),
        }
    }

    /// The token contract, binding it on first call.
    pub async fn contract(&self) -> Result<&BoundContract, ChainError> {
        self.bound
            .get_or_try_init(|| async {
                let address = self.identity.contract.to_string();
                self.contracts
                    .bind(&self.rpc_url, ERC20_ABI, &address)
                    .await
            })
            .await
    }

    /// Block resolver on this asset's chain.
    pub async fn block_resolver(&self) -> Result<BlockTimestampResolver, ChainError> {
        let contract = self.contract().await?;
        Ok(BlockTimestampResolver::new(contract.rpc(), contract.retry()))
    }

    /// Whole-token amounts sent to `recipient` by this token in `tx_hash`.
    pub async fn transfers_to(&self, tx_hash: &str, recipient: &str) -> Result<Vec<f64>, ChainError> {
        let contract = self.contract().await?;
        let (transfers, decimals) =
            try_join(contract.transfers_to(tx_hash, recipient), contract.decimals()).await?;
        Ok(transfers
            .map(|value| to_whole_units(value, decimals))
            .collect())
    }
}

#[async_trait]
impl AssetAdapter for EvmAsset {
    fn identity(&self) -> &TokenIdentity {
        &self.identity
    }

    fn create_wallet(&self, index: u32) -> Result<DepositWallet, ChainError> {
        self.wallets.create_wallet(index)
    }

    async fn price_usd(&self) -> Result<PriceQuote, ChainError> {
        self.prices.price_usd(&self.identity).await
    }

    #[instrument(skip(self), fields(symbol = %self.identity.symbol, network = %self.identity.network))]
    async fn get_balance(&self, address: &str) -> Result<BalanceResult, ChainError> {
        let contract = self.contract().await?;
        let (raw, decimals) = try_join(contract.balance_of(address), contract.decimals()).await?;

        let balance = to_whole_units(raw, decimals);
        info!(%raw, decimals, balance, "Fetched EVM balance");
        Ok(balance)
    }
}

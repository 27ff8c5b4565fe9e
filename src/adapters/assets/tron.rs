//! Tron Asset - TRC-20 Token over the Tronscan REST API
//!
//! No contract binding: balances are read from the explorer's account
//! endpoint, which lists every TRC-20 holding with its decimals.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::adapters::api::types::TronAccountResponse;
use crate::adapters::api::PriceOracle;
use crate::adapters::retry::RetryPolicy;
use crate::adapters::wallet::{CoinType, WalletDeriver};
use crate::domain::address::TronAddress;
use crate::domain::asset::{BalanceResult, DepositWallet, PriceQuote, TokenIdentity};
use crate::domain::error::ChainError;
use crate::domain::units::{round_to, scale_decimal_str};
use crate::ports::asset::AssetAdapter;
use crate::ports::json_fetcher::JsonFetcher;

/// Default Tronscan account API root.
pub const TRON_ACCOUNT_URL: &str = "https://apilist.tronscan.org";

/// Fractional digits kept in reported balances.
const BALANCE_DIGITS: i32 = 6;

/// A TRC-20 token on Tron mainnet.
pub struct TronAsset {
    identity: TokenIdentity,
    /// Contract id matched against `tokenId` in account holdings.
    contract_id: TronAddress,
    http: Arc<dyn JsonFetcher>,
    prices: Arc<PriceOracle>,
    retry: RetryPolicy,
    /// Account API root, without trailing slash.
    account_base_url: String,
    wallets: WalletDeriver,
}

impl TronAsset {
    pub fn new(
        identity: TokenIdentity,
        contract_id: TronAddress,
        http: Arc<dyn JsonFetcher>,
        prices: Arc<PriceOracle>,
        retry: RetryPolicy,
        account_base_url: &str,
    ) -> Self {
        Self {
            identity,
            contract_id,
            http,
            prices,
            retry,
            account_base_url: account_base_url.trim_end_matches('/').to_string(),
            wallets: WalletDeriver::new(CoinType::Tron),
        }
    }

    /// Tronscan's link for a TRC-20 contract.
    pub fn explorer_link(contract_id: &TronAddress) -> String {
        format!("https://tronscan.org/#/token20/{contract_id}")
    }
}

#[async_trait]
impl AssetAdapter for TronAsset {
    fn identity(&self) -> &TokenIdentity {
        &self.identity
    }

    fn create_wallet(&self, index: u32) -> Result<DepositWallet, ChainError> {
        self.wallets.create_wallet(index)
    }

    async fn price_usd(&self) -> Result<PriceQuote, ChainError> {
        self.prices.price_usd(&self.identity).await
    }

    #[instrument(skip(self), fields(symbol = %self.identity.symbol))]
    async fn get_balance(&self, address: &str) -> Result<BalanceResult, ChainError> {
        let owner: TronAddress = address.parse()?;
        let url = format!(
            "{}/api/account?address={owner}&includeToken=true",
            self.account_base_url
        );

        let body = self
            .retry
            .run("tronscan_account", || self.http.get_json(&url))
            .await?;
        let account: TronAccountResponse = serde_json::from_value(body)
            .map_err(|e| ChainError::Decode(format!("tronscan_account: {e}")))?;

        let Some(holding) = account.holding(self.contract_id.as_str()) else {
            debug!("Token not held by account");
            return Ok(0.0);
        };

        let (raw, decimals) = holding.amount().ok_or_else(|| {
            ChainError::Decode(format!("holding {} lacks balance or tokenDecimal", holding.token_id))
        })?;
        let balance = scale_decimal_str(raw, decimals)
            .map(|value| round_to(value, BALANCE_DIGITS))
            .ok_or_else(|| ChainError::Decode(format!("balance {raw:?}")))?;

        info!(balance, "Fetched TRC-20 balance");
        Ok(balance)
    }
}

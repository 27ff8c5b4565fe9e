//! Asset Adapter Port - Uniform Interface Over Chain Families
//!
//! Every payable token (EVM or Tron) is driven through this trait:
//! metadata for display, a fresh deposit wallet, a USD quote, and the
//! balance at a deposit address. One concrete type per chain family
//! implements it; callers hold `Arc<dyn AssetAdapter>`.

use async_trait::async_trait;

use crate::domain::asset::{
  BalanceResult, ChainFamily, DepositWallet, PriceQuote, TokenIdentity,
};
use crate::domain::error::ChainError;

#[async_trait]
pub trait AssetAdapter: Send + Sync + 'static {
  /// Immutable token description.
  fn identity(&self) -> &TokenIdentity;

  /// Ticker, e.g. "USDT".
  fn symbol(&self) -> &str {
    &self.identity().symbol
  }

  /// Network label, e.g. "BSC".
  fn network(&self) -> &str {
    &self.identity().network
  }

  /// Explorer page for the token.
  fn link(&self) -> &str {
    &self.identity().explorer_link
  }

  fn family(&self) -> ChainFamily {
    self.identity().family()
  }

  /// Generate a brand-new mnemonic and derive the address at `index`.
  fn create_wallet(&self, index: u32) -> Result<DepositWallet, ChainError>;

  /// USD per whole token; `0.0` when no market lists the token.
  async fn price_usd(&self) -> Result<PriceQuote, ChainError>;

  /// Whole-token balance held by `address`; `0.0` when it holds none.
  async fn get_balance(&self, address: &str) -> Result<BalanceResult, ChainError>;
}

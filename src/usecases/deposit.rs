//! Deposit Desk Use Case - Quote a Deposit, Then Verify It
//!
//! Drives one payment through any `AssetAdapter`:
//! 1. Quote the token's USD price
//! 2. Derive a single-use deposit wallet
//! 3. Compute the token amount covering the fiat price
//! 4. Later, compare the wallet's balance with that amount
//!
//! Nothing is persisted: the caller keeps the `DepositQuote` (and the
//! mnemonic inside it) and hands it back for verification.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::asset::{DepositWallet, PriceQuote};
use crate::domain::error::ChainError;
use crate::ports::asset::AssetAdapter;

/// Fractional digits of a required token amount.
pub const AMOUNT_DP: u32 = 6;

/// Failure to open or verify a deposit.
#[derive(Debug, Error)]
pub enum DepositError {
  #[error(transparent)]
  Chain(#[from] ChainError),

  /// The price source has no quote, so no amount can be computed.
  #[error("{symbol} has no USD price")]
  Unpriced { symbol: String },

  #[error("fiat amount must be positive, got {0}")]
  InvalidFiat(Decimal),
}

/// An open deposit request handed to the payer.
#[derive(Debug, Clone, Serialize)]
pub struct DepositQuote {
  pub id: Uuid,
  pub symbol: String,
  pub network: String,
  /// Explorer page of the token.
  pub link: String,
  /// Receiving wallet; its mnemonic belongs to the caller from here on.
  pub wallet: DepositWallet,
  /// USD per token at quote time.
  pub price_usd: PriceQuote,
  /// Price being paid, in USD.
  pub fiat_usd: Decimal,
  /// Tokens to send, rounded up to `AMOUNT_DP` digits.
  pub required_amount: Decimal,
  pub created_at: DateTime<Utc>,
}

/// Outcome of a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentCheck {
  /// Observed balance of the deposit wallet.
  pub balance: Decimal,
  pub required: Decimal,
  /// `balance >= required`
  pub paid: bool,
}

/// Opens and verifies deposits. Stateless.
#[derive(Debug, Default, Clone, Copy)]
pub struct DepositDesk;

impl DepositDesk {
  pub const fn new() -> Self {
    Self
  }

  /// Quote `fiat_usd` in `asset` and create the receiving wallet.
  ///
  /// # Errors
  /// `Unpriced` when the asset has no USD price; chain errors from the
  /// price lookup or wallet derivation otherwise.
  #[instrument(skip(self, asset), fields(symbol = asset.symbol(), network = asset.network()))]
  pub async fn open(
    &self,
    asset: &dyn AssetAdapter,
    fiat_usd: Decimal,
  ) -> Result<DepositQuote, DepositError> {
    if fiat_usd <= Decimal::ZERO {
      return Err(DepositError::InvalidFiat(fiat_usd));
    }

    let price_usd = asset.price_usd().await?;
    let required_amount = required_amount(fiat_usd, price_usd).ok_or_else(|| {
      warn!(price_usd, "Refusing to quote unpriced asset");
      DepositError::Unpriced {
        symbol: asset.symbol().to_string(),
      }
    })?;

    let wallet = asset.create_wallet(0)?;

    let quote = DepositQuote {
      id: Uuid::new_v4(),
      symbol: asset.symbol().to_string(),
      network: asset.network().to_string(),
      link: asset.link().to_string(),
      wallet,
      price_usd,
      fiat_usd,
      required_amount,
      created_at: Utc::now(),
    };

    info!(
      id = %quote.id,
      address = %quote.wallet.address,
      %required_amount,
      price_usd,
      "Opened deposit"
    );
    Ok(quote)
  }

  /// Check the deposit wallet of `quote` once.
  #[instrument(skip(self, asset, quote), fields(id = %quote.id))]
  pub async fn verify(
    &self,
    asset: &dyn AssetAdapter,
    quote: &DepositQuote,
  ) -> Result<PaymentCheck, DepositError> {
    self
      .check_balance(asset, &quote.wallet.address, quote.required_amount)
      .await
  }

  /// Compare the balance at `address` with `required`.
  pub async fn check_balance(
    &self,
    asset: &dyn AssetAdapter,
    address: &str,
    required: Decimal,
  ) -> Result<PaymentCheck, DepositError> {
    let raw = asset.get_balance(address).await?;
    let balance = Decimal::from_f64(raw)
      .ok_or_else(|| ChainError::Decode(format!("balance {raw} is not a finite amount")))?;

    let check = PaymentCheck {
      balance,
      required,
      paid: balance >= required,
    };

    info!(
      %address,
      %balance,
      %required,
      paid = check.paid,
      "Checked deposit balance"
    );
    Ok(check)
  }
}

/// Tokens needed to cover `fiat_usd` at `price_usd`, rounded up.
///
/// `None` when the price is the "no data" sentinel or not a usable number.
pub fn required_amount(fiat_usd: Decimal, price_usd: PriceQuote) -> Option<Decimal> {
  if !(price_usd.is_finite() && price_usd > 0.0) {
    return None;
  }
  let price = Decimal::from_f64(price_usd)?;
  if price.is_zero() {
    return None;
  }
  fiat_usd
    .checked_div(price)
    .map(|amount| amount.round_dp_with_strategy(AMOUNT_DP, RoundingStrategy::ToPositiveInfinity))
}

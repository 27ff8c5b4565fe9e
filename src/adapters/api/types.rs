//! Price and Explorer API Response Types
//!
//! Only the fields the verifier reads are modelled; everything else in
//! the payloads is ignored. Upstreams are loose about numeric fields
//! (`"1.23"` vs `1.23`), so those go through `number_or_string`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// `GET /latest/dex/tokens/{address}` (DexScreener).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexTokensResponse {
  /// `null` when no market lists the token.
  #[serde(default)]
  pub pairs: Option<Vec<DexPair>>,
}

/// One trading pair.
#[derive(Debug, Clone, Deserialize)]
pub struct DexPair {
  #[serde(rename = "priceUsd", default, deserialize_with = "number_or_string")]
  pub price_usd: Option<f64>,
}

impl DexTokensResponse {
  /// USD price of the first listed pair, `0.0` if none.
  pub fn first_price(&self) -> f64 {
    self
      .pairs
      .as_deref()
      .and_then(<[DexPair]>::first)
      .and_then(|pair| pair.price_usd)
      .unwrap_or(0.0)
  }
}

/// `GET /api/token_trc20?contract={id}` (Tronscan).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TronTokenResponse {
  #[serde(default)]
  pub trc20_tokens: Option<Vec<TronToken>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TronToken {
  #[serde(default)]
  pub market_info: Option<TronMarketInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TronMarketInfo {
  #[serde(rename = "priceInUsd", default, deserialize_with = "number_or_string")]
  pub price_in_usd: Option<f64>,
}

impl TronTokenResponse {
  /// `trc20_tokens[0].market_info.priceInUsd`, `0.0` if any link is absent.
  pub fn first_price(&self) -> f64 {
    self
      .trc20_tokens
      .as_deref()
      .and_then(<[TronToken]>::first)
      .and_then(|token| token.market_info.as_ref())
      .and_then(|info| info.price_in_usd)
      .unwrap_or(0.0)
  }
}

/// `GET /api/account?address={addr}&includeToken=true` (Tronscan).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TronAccountResponse {
  #[serde(default)]
  pub trc20token_balances: Option<Vec<Trc20Balance>>,
}

/// One TRC-20 holding of an account.
///
/// Only the holding being looked up has to be complete; siblings with
/// missing fields are carried along and never read.
#[derive(Debug, Clone, Deserialize)]
pub struct Trc20Balance {
  /// Contract id of the token.
  #[serde(rename = "tokenId", default)]
  pub token_id: String,
  /// Raw balance in the token's smallest unit, as a decimal string.
  #[serde(default, deserialize_with = "string_or_number")]
  pub balance: Option<String>,
  #[serde(rename = "tokenDecimal", default)]
  pub token_decimal: Option<u32>,
}

impl Trc20Balance {
  /// `(raw balance, decimals)`, or `None` if either field is absent.
  pub fn amount(&self) -> Option<(&str, u32)> {
    Some((self.balance.as_deref()?, self.token_decimal?))
  }
}

impl TronAccountResponse {
  /// Holding of `contract`, if the account has one.
  pub fn holding(&self, contract: &str) -> Option<&Trc20Balance> {
    self
      .trc20token_balances
      .as_deref()
      .unwrap_or_default()
      .iter()
      .find(|token| token.token_id == contract)
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
  Number(f64),
  Text(String),
}

/// Accept `1.23`, `"1.23"`, `null` or `""`. Other text is an error.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<Loose>::deserialize(deserializer)? {
    Some(Loose::Number(n)) => Ok(Some(n)),
    Some(Loose::Text(s)) if s.trim().is_empty() => Ok(None),
    Some(Loose::Text(s)) => s
      .trim()
      .parse()
      .map(Some)
      .map_err(|_| D::Error::custom(format!("not a number: {s:?}"))),
    None => Ok(None),
  }
}

/// Accept `"1500000"`, `1500000` or `null`, yielding text.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    Int(u64),
    Text(String),
    Float(f64),
  }

  Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
    Raw::Int(n) => n.to_string(),
    Raw::Text(s) => s,
    Raw::Float(f) => f.to_string(),
  }))
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_dex_pairs_null_is_zero() {
    let response: DexTokensResponse = serde_json::from_value(json!({ "pairs": null })).unwrap();
    assert_eq!(response.first_price(), 0.0);

    let response: DexTokensResponse = serde_json::from_value(json!({})).unwrap();
    assert_eq!(response.first_price(), 0.0);
  }

  #[test]
  fn test_dex_first_pair_wins() {
    let response: DexTokensResponse = serde_json::from_value(json!({
      "schemaVersion": "1.0.0",
      "pairs": [
        { "chainId": "base", "priceUsd": "1.23" },
        { "chainId": "base", "priceUsd": "9.99" }
      ]
    }))
    .unwrap();
    assert_eq!(response.first_price(), 1.23);
  }

  #[test]
  fn test_dex_pair_without_price_is_zero() {
    let response: DexTokensResponse =
      serde_json::from_value(json!({ "pairs": [{ "chainId": "bsc" }] })).unwrap();
    assert_eq!(response.first_price(), 0.0);
  }

  #[test]
  fn test_tron_price_number_or_string() {
    let text: TronTokenResponse = serde_json::from_value(json!({
      "trc20_tokens": [{ "market_info": { "priceInUsd": "0.9998" } }]
    }))
    .unwrap();
    assert_eq!(text.first_price(), 0.9998);

    let number: TronTokenResponse = serde_json::from_value(json!({
      "trc20_tokens": [{ "market_info": { "priceInUsd": 1.0001 } }]
    }))
    .unwrap();
    assert_eq!(number.first_price(), 1.0001);
  }

  #[test]
  fn test_tron_price_missing_links_are_zero() {
    for payload in [
      json!({}),
      json!({ "trc20_tokens": [] }),
      json!({ "trc20_tokens": [{}] }),
      json!({ "trc20_tokens": [{ "market_info": null }] }),
      json!({ "trc20_tokens": [{ "market_info": {} }] }),
      json!({ "trc20_tokens": [{ "market_info": { "priceInUsd": "" } }] }),
    ] {
      let response: TronTokenResponse = serde_json::from_value(payload.clone()).unwrap();
      assert_eq!(response.first_price(), 0.0, "payload {payload}");
    }
  }

  #[test]
  fn test_account_holding_lookup() {
    let response: TronAccountResponse = serde_json::from_value(json!({
      "balance": 1000,
      "trc20token_balances": [
        { "tokenId": "TOther", "balance": "42", "tokenDecimal": 0 },
        { "tokenId": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t", "balance": 1500000, "tokenDecimal": 6 }
      ]
    }))
    .unwrap();

    let holding = response.holding("TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t").unwrap();
    assert_eq!(holding.amount(), Some(("1500000", 6)));
    assert!(response.holding("TMissing").is_none());
  }

  #[test]
  fn test_account_without_token_list() {
    let response: TronAccountResponse = serde_json::from_value(json!({ "balance": 0 })).unwrap();
    assert!(response.holding("TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t").is_none());
  }

  #[test]
  fn test_unparsable_prices_are_errors() {
    let dex = serde_json::from_value::<DexTokensResponse>(json!({
      "pairs": [{ "priceUsd": "N/A" }]
    }));
    assert!(dex.is_err());

    let tron = serde_json::from_value::<TronTokenResponse>(json!({
      "trc20_tokens": [{ "market_info": { "priceInUsd": "oops" } }]
    }));
    assert!(tron.is_err());
  }

  #[test]
  fn test_incomplete_sibling_holding_is_ignored() {
    let response: TronAccountResponse = serde_json::from_value(json!({
      "trc20token_balances": [
        { "tokenId": "TOther", "balance": "1" },
        { "balance": "7", "tokenDecimal": 0 },
        { "tokenId": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t", "balance": "1500000", "tokenDecimal": 6 }
      ]
    }))
    .unwrap();

    assert_eq!(response.holding("TOther").unwrap().amount(), None);
    let usdt = response.holding("TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t").unwrap();
    assert_eq!(usdt.amount(), Some(("1500000", 6)));
  }
}

//! Token unit conversion.
//!
//! Raw on-chain amounts are integers in the token's smallest unit;
//! callers work in whole tokens.

use alloy::primitives::U256;

/// Scale a raw integer amount down by `10^decimals`.
pub fn to_whole_units(raw: U256, decimals: u8) -> f64 {
    // U256 has no lossless f64 conversion; its decimal string always parses.
    let raw: f64 = raw.to_string().parse().unwrap_or(f64::INFINITY);
    raw / 10f64.powi(i32::from(decimals))
}

/// Same scaling for amounts reported as decimal strings by REST APIs.
pub fn scale_decimal_str(raw: &str, decimals: u32) -> Option<f64> {
    let raw: f64 = raw.trim().parse().ok()?;
    let decimals = i32::try_from(decimals).ok()?;
    Some(raw / 10f64.powi(decimals))
}

/// Round to a fixed number of fractional digits.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

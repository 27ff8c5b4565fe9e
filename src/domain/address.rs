//! Chain Addresses - EVM Checksumming and Tron Base58Check
//!
//! EVM addresses are accepted in any letter case and canonicalized to
//! EIP-55 mixed case. Tron addresses are the same 20-byte keccak body
//! as an EVM address, prefixed with `0x41` and base58check-encoded.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use super::error::ChainError;

/// Version byte of Tron mainnet addresses.
pub const TRON_ADDRESS_PREFIX: u8 = 0x41;

/// Parse an EVM address in any letter case.
///
/// Rejects anything that is not 20 bytes of `0x`-prefixed hex.
pub fn checksum(input: &str) -> Result<Address, ChainError> {
    let trimmed = input.trim();
    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(ChainError::InvalidAddress(input.to_string()));
    }
    Address::from_str(trimmed).map_err(|_| ChainError::InvalidAddress(input.to_string()))
}

/// EIP-55 string form of an EVM address.
pub fn to_checksum_string(address: &Address) -> String {
    address.to_checksum(None)
}

/// A validated Tron base58check address (`T...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TronAddress {
    encoded: String,
    body: Address,
}

impl TronAddress {
    /// Encode the 20-byte account body as a Tron address.
    pub fn from_evm(body: &Address) -> Self {
        let mut raw = Vec::with_capacity(21);
        raw.push(TRON_ADDRESS_PREFIX);
        raw.extend_from_slice(body.as_slice());
        Self {
            encoded: bs58::encode(raw).with_check().into_string(),
            body: *body,
        }
    }

    /// The 20-byte account body.
    pub const fn body(&self) -> Address {
        self.body
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl FromStr for TronAddress {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = bs58::decode(s.trim())
            .with_check(Some(TRON_ADDRESS_PREFIX))
            .into_vec()
            .map_err(|_| ChainError::InvalidAddress(s.to_string()))?;

        // 1 version byte + 20 body bytes (checksum already stripped)
        if raw.len() != 21 {
            return Err(ChainError::InvalidAddress(s.to_string()));
        }
        Ok(Self {
            encoded: s.trim().to_string(),
            body: Address::from_slice(&raw[1..]),
        })
    }
}

impl TryFrom<String> for TronAddress {
    type Error = ChainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TronAddress> for String {
    fn from(value: TronAddress) -> Self {
        value.encoded
    }
}

impl fmt::Display for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

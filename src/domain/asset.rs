//! Asset Domain Types - Token Identity, Deposit Wallets, Transfers
//!
//! Plain data shared by every adapter. A `TokenIdentity` is fixed at
//! construction; a `DepositWallet` is handed to the caller and never
//! retained by this crate.

use std::fmt;

use alloy::primitives::{Address, U256};
use serde::Serialize;

use super::address::{to_checksum_string, TronAddress};

/// USD per one whole token. `0.0` means "no price listed".
pub type PriceQuote = f64;

/// Whole-token balance, already scaled by the token's decimals.
pub type BalanceResult = f64;

/// Chain family an asset lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChainFamily {
    /// EVM-compatible chain reached over JSON-RPC.
    Evm,
    /// Tron reached over the Tronscan REST API.
    Tron,
}

impl fmt::Display for ChainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evm => write!(f, "EVM"),
            Self::Tron => write!(f, "TRON"),
        }
    }
}

/// On-chain location of a token contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenContract {
    /// ERC-20/BEP-20 contract address.
    Evm(Address),
    /// TRC-20 contract id.
    Tron(TronAddress),
}

impl TokenContract {
    pub const fn family(&self) -> ChainFamily {
        match self {
            Self::Evm(_) => ChainFamily::Evm,
            Self::Tron(_) => ChainFamily::Tron,
        }
    }
}

impl fmt::Display for TokenContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evm(address) => f.write_str(&to_checksum_string(address)),
            Self::Tron(id) => f.write_str(id.as_str()),
        }
    }
}

impl Serialize for TokenContract {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Immutable description of a payable token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenIdentity {
    /// Ticker shown to payers (e.g. "USDT").
    pub symbol: String,
    /// Contract address (EVM, checksummed) or contract id (Tron).
    pub contract: TokenContract,
    /// Network label (e.g. "BASE", "BSC", "TRON").
    pub network: String,
    /// Block explorer page for the token.
    pub explorer_link: String,
}

impl TokenIdentity {
    pub fn new(
        symbol: impl Into<String>,
        contract: TokenContract,
        network: impl Into<String>,
        explorer_link: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            contract,
            network: network.into(),
            explorer_link: explorer_link.into(),
        }
    }

    pub const fn family(&self) -> ChainFamily {
        self.contract.family()
    }
}

/// Single-use deposit wallet.
///
/// Ownership passes to the caller, which decides how (and whether) to
/// store the mnemonic. `Debug` redacts the phrase so a stray `?wallet`
/// in a log line cannot leak it.
#[derive(Clone, Serialize)]
pub struct DepositWallet {
    /// BIP-39 phrase, 12 words.
    pub mnemonic: String,
    /// Chain-native receiving address.
    pub address: String,
    /// BIP-44 address index the address was derived at.
    pub derivation_index: u32,
}

impl fmt::Debug for DepositWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepositWallet")
            .field("mnemonic", &"<redacted>")
            .field("address", &self.address)
            .field("derivation_index", &self.derivation_index)
            .finish()
    }
}

/// A decoded ERC-20 `Transfer(from, to, value)` log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

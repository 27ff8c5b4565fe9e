//! Wallet Deriver - BIP-39 Mnemonics and BIP-44 Deposit Addresses
//!
//! Every deposit gets a brand-new 12-word phrase drawn from the OS
//! CSPRNG. The receiving address is derived at
//! `m/44'/{coin}'/0'/0/{index}`: coin 60 for EVM chains, coin 195 for
//! Tron. Keys never leave this module; only the phrase and the address
//! are returned.

use alloy::primitives::Address;
use alloy::signers::local::coins_bip39::{English, Mnemonic};
use alloy::signers::local::MnemonicBuilder;
use tracing::debug;

use crate::domain::address::{to_checksum_string, TronAddress};
use crate::domain::asset::{ChainFamily, DepositWallet};
use crate::domain::error::ChainError;

/// Words in a generated phrase.
pub const MNEMONIC_WORDS: usize = 12;

/// SLIP-44 coin type used in the BIP-44 path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoinType {
    Ethereum = 60,
    Tron = 195,
}

impl CoinType {
    pub const fn slip44(self) -> u32 {
        self as u32
    }

    /// `m/44'/coin'/0'/0/index`
    pub fn path(self, index: u32) -> String {
        format!("m/44'/{}'/0'/0/{index}", self.slip44())
    }
}

impl From<ChainFamily> for CoinType {
    fn from(family: ChainFamily) -> Self {
        match family {
            ChainFamily::Evm => Self::Ethereum,
            ChainFamily::Tron => Self::Tron,
        }
    }
}

/// Derives single-use deposit wallets for one coin type.
#[derive(Debug, Clone, Copy)]
pub struct WalletDeriver {
    coin: CoinType,
}

impl WalletDeriver {
    pub const fn new(coin: CoinType) -> Self {
        Self { coin }
    }

    pub const fn coin(&self) -> CoinType {
        self.coin
    }

    /// Generate a fresh mnemonic and derive the address at `index`.
    pub fn create_wallet(&self, index: u32) -> Result<DepositWallet, ChainError> {
        let mnemonic = Mnemonic::<English>::new_with_count(&mut rand::thread_rng(), MNEMONIC_WORDS)
            .map_err(|e| ChainError::Derivation(e.to_string()))?;
        let phrase = mnemonic.to_phrase();
        let address = self.derive(&phrase, index)?;

        debug!(coin = self.coin.slip44(), index, %address, "Created deposit wallet");

        Ok(DepositWallet {
            mnemonic: phrase,
            address,
            derivation_index: index,
        })
    }

    /// Chain-native address for `phrase` at `index`. Deterministic.
    pub fn derive(&self, phrase: &str, index: u32) -> Result<String, ChainError> {
        let body = self.derive_body(phrase, index)?;
        Ok(match self.coin {
            CoinType::Ethereum => to_checksum_string(&body),
            CoinType::Tron => TronAddress::from_evm(&body).to_string(),
        })
    }

    /// The 20-byte account behind the derived key.
    fn derive_body(&self, phrase: &str, index: u32) -> Result<Address, ChainError> {
        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase.trim())
            .derivation_path(self.coin.path(index))
            .map_err(|e| ChainError::Derivation(e.to_string()))?
            .build()
            .map_err(|e| ChainError::Derivation(e.to_string()))?;
        Ok(signer.address())
    }
}

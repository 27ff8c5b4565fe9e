//! Domain layer - Core types of the deposit verifier.
//!
//! Addresses, token identities, deposit wallets and unit conversion.
//! No I/O here (hexagonal architecture inner ring); adapters and use
//! cases build on these types.

pub mod address;
pub mod asset;
pub mod error;
pub mod units;

// Re-export core types for convenience
pub use address::TronAddress;
pub use asset::{
    BalanceResult, ChainFamily, DepositWallet, PriceQuote, TokenContract, TokenIdentity,
    TransferEvent,
};
pub use error::ChainError;

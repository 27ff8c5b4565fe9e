//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the adapters and use cases
//! require from the outside world.
//!
//! Port categories:
//! - `AssetAdapter`: uniform per-token interface (wallet, price, balance)
//! - `EvmRpc`: minimal EVM JSON-RPC surface
//! - `JsonFetcher`: REST `GET → JSON`
//! - `AbiSource`: named contract ABI lookup

pub mod abi_source;
pub mod asset;
pub mod evm_rpc;
pub mod json_fetcher;

pub use abi_source::AbiSource;
pub use asset::AssetAdapter;
pub use evm_rpc::{EvmRpc, ReceiptLog};
pub use json_fetcher::JsonFetcher;

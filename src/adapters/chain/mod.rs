//! Chain Adapters - EVM Blockchain Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - One cached RPC provider per endpoint (`ConnectionRegistry`)
//! - ABI lookup from `<name>.abi` files
//! - ERC-20 reads and receipt `Transfer` scans (`ContractClient`)
//! - Timestamp to block-height resolution by binary search

pub mod abi;
pub mod blocks;
pub mod contracts;
pub mod provider;
pub mod registry;

pub use abi::AbiDirectory;
pub use blocks::{BlockLookup, BlockTimestampResolver};
pub use contracts::{BoundContract, ContractClient, Transfers};
pub use provider::AlloyRpc;
pub use registry::ConnectionRegistry;

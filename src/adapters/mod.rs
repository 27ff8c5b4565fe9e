//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (JSON-RPC providers, REST clients, ABI files,
//! BIP-39/BIP-44 derivation). Each sub-module groups adapters by
//! infrastructure concern.
//!
//! Adapter categories:
//! - `api`: DexScreener / Tronscan REST clients
//! - `assets`: per-chain `AssetAdapter` implementations and the catalog
//! - `chain`: EVM access via alloy-rs
//! - `retry`: rate-limit backoff shared by every outbound call
//! - `wallet`: deposit wallet generation

pub mod api;
pub mod assets;
pub mod chain;
pub mod retry;
pub mod wallet;

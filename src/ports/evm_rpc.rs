//! EVM RPC Port - Minimal JSON-RPC Surface Used by the Verifier
//!
//! Covers exactly the calls the chain-access layer needs:
//! `eth_blockNumber`, `eth_getBlockByNumber` (timestamp only),
//! `eth_call` and `eth_getTransactionReceipt` (logs only).
//! The alloy-backed adapter lives in `adapters::chain::provider`.

use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;

use crate::domain::error::ChainError;

/// One log entry from a transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLog {
  /// Contract that emitted the log.
  pub address: Address,
  /// Indexed topics; topic 0 is the event selector.
  pub topics: Vec<B256>,
  /// ABI-encoded non-indexed data.
  pub data: Bytes,
}

/// Read-only EVM JSON-RPC client bound to one endpoint.
///
/// Implementations map rate-limit responses to
/// `ChainError::RateLimited` so `RetryPolicy` can back off.
#[async_trait]
pub trait EvmRpc: Send + Sync + 'static {
  /// Current head block number.
  async fn block_number(&self) -> Result<u64, ChainError>;

  /// Timestamp (unix seconds) of the given block.
  async fn block_timestamp(&self, number: u64) -> Result<u64, ChainError>;

  /// Read-only contract call at the latest block.
  async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError>;

  /// Logs of a mined transaction, or `None` if the node has no receipt.
  async fn receipt_logs(&self, tx_hash: B256) -> Result<Option<Vec<ReceiptLog>>, ChainError>;
}

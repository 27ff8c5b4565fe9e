//! ABI Source Port - Named Contract Interface Lookup
//!
//! Maps an asset-class name ("erc20") to its JSON ABI. The default
//! adapter reads `<dir>/<name>.abi` from disk.

use alloy::json_abi::JsonAbi;
use async_trait::async_trait;

use crate::domain::error::ChainError;

#[async_trait]
pub trait AbiSource: Send + Sync + 'static {
  /// Load the ABI registered under `name`.
  async fn load(&self, name: &str) -> Result<JsonAbi, ChainError>;
}

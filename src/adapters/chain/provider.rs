//! EVM RPC Provider - alloy-rs 0.9 JSON-RPC Client
//!
//! Implements the `EvmRpc` port on top of an alloy HTTP provider.
//! Construction is lazy: no request is sent until the first call, so
//! building a client for a well-formed URL never fails on network
//! grounds. Failures are mapped onto `ChainError`, with HTTP 429 and
//! JSON-RPC code 429 both reported as `RateLimited`.
//!
//! The provider is stored with a boxed transport to keep alloy's
//! nested filler/transport generics out of the adapter API.

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{BlockTransactionsKind, TransactionRequest};
use alloy::transports::{BoxTransport, RpcError, TransportError, TransportErrorKind};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::error::ChainError;
use crate::ports::evm_rpc::{EvmRpc, ReceiptLog};

/// HTTP status / JSON-RPC error code signalling rate limiting.
const TOO_MANY_REQUESTS: u16 = 429;

/// JSON-RPC client for one EVM endpoint.
pub struct AlloyRpc {
    /// alloy provider over a type-erased HTTP transport.
    provider: RootProvider<BoxTransport>,
    /// Endpoint URL (diagnostics only; may embed an API key, never logged).
    endpoint: String,
}

impl AlloyRpc {
    /// Build a client for `endpoint` without contacting it.
    pub fn connect(endpoint: &str) -> Result<Self, ChainError> {
        let url: reqwest::Url = endpoint
            .trim()
            .parse()
            .map_err(|e| ChainError::Connection(format!("invalid RPC URL: {e}")))?;

        // alloy 0.9: on_http() is synchronous; boxed() erases the transport type
        let provider = ProviderBuilder::new().on_http(url).boxed();

        Ok(Self {
            provider,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Translate an alloy transport error into the crate taxonomy.
pub(crate) fn classify(err: TransportError) -> ChainError {
    match err {
        RpcError::Transport(TransportErrorKind::HttpError(http))
            if http.status == TOO_MANY_REQUESTS =>
        {
            ChainError::RateLimited
        }
        RpcError::ErrorResp(payload) if payload.code == i64::from(TOO_MANY_REQUESTS) => {
            ChainError::RateLimited
        }
        RpcError::Transport(kind) => ChainError::Connection(kind.to_string()),
        RpcError::DeserError { err, .. } => ChainError::Decode(err.to_string()),
        other => ChainError::Rpc(other.to_string()),
    }
}

#[async_trait]
impl EvmRpc for AlloyRpc {
    #[instrument(skip(self))]
    async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider.get_block_number().await.map_err(classify)
    }

    #[instrument(skip(self))]
    async fn block_timestamp(&self, number: u64) -> Result<u64, ChainError> {
        let block = self
            .provider
            .get_block_by_number(
                BlockNumberOrTag::Number(number),
                BlockTransactionsKind::Hashes,
            )
            .await
            .map_err(classify)?
            .ok_or_else(|| ChainError::Rpc(format!("block {number} not found")))?;

        debug!(number, timestamp = block.header.timestamp, "Fetched block");
        Ok(block.header.timestamp)
    }

    #[instrument(skip(self, input), fields(to = %to))]
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError> {
        let request = TransactionRequest::default().to(to).input(input.into());
        self.provider.call(&request).await.map_err(classify)
    }

    #[instrument(skip(self), fields(tx = %tx_hash))]
    async fn receipt_logs(&self, tx_hash: B256) -> Result<Option<Vec<ReceiptLog>>, ChainError> {
        let Some(receipt) = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(classify)?
        else {
            return Ok(None);
        };

        let logs = receipt
            .inner
            .logs()
            .iter()
            .map(|log| ReceiptLog {
                address: log.inner.address,
                topics: log.inner.data.topics().to_vec(),
                data: log.inner.data.data.clone(),
            })
            .collect();

        Ok(Some(logs))
    }
}

#[cfg(test)]
mod tests {
    use alloy::rpc::json_rpc::ErrorPayload;
    use alloy::transports::HttpError;

    use super::*;

    #[test]
    fn test_connect_rejects_malformed_url() {
        assert!(matches!(
            AlloyRpc::connect("::not-a-url::"),
            Err(ChainError::Connection(_))
        ));
    }

    #[test]
    fn test_connect_is_lazy() {
        let rpc = AlloyRpc::connect("http://127.0.0.1:1").unwrap();
        assert_eq!(rpc.endpoint(), "http://127.0.0.1:1");
    }

    #[test]
    fn test_http_429_is_rate_limited() {
        let err: TransportError = RpcError::Transport(TransportErrorKind::HttpError(HttpError {
            status: 429,
            body: "slow down".into(),
        }));
        assert!(classify(err).is_rate_limited());
    }

    #[test]
    fn test_http_500_is_connection_error() {
        let err: TransportError = RpcError::Transport(TransportErrorKind::HttpError(HttpError {
            status: 500,
            body: String::new(),
        }));
        assert!(matches!(classify(err), ChainError::Connection(_)));
    }

    #[test]
    fn test_rpc_code_429_is_rate_limited() {
        let payload = ErrorPayload {
            code: 429,
            message: "rate limit".into(),
            data: None,
        };
        assert!(classify(RpcError::ErrorResp(payload)).is_rate_limited());
    }
}

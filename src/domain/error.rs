//! Chain Error Taxonomy - Failures Surfaced by the Chain-Access Layer
//!
//! Every network-facing component returns `ChainError`. Only
//! `RateLimited` is transient: `RetryPolicy` absorbs it and escalates
//! to `RetryExhausted` once the attempt budget runs out. All other
//! variants propagate to the caller unchanged.
//!
//! Missing price listings and missing token holdings are NOT errors;
//! they surface as a `0.0` quote/balance.

use thiserror::Error;

/// Errors produced by RPC, REST and derivation calls.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Upstream answered "too many requests" (HTTP 429 or JSON-RPC code 429).
    #[error("rate limited by upstream")]
    RateLimited,

    /// The retry budget ran out while the upstream kept rate limiting.
    #[error("{operation}: retry budget exhausted after {attempts} attempts")]
    RetryExhausted {
        /// Name of the wrapped operation.
        operation: String,
        /// Number of attempts made.
        attempts: u32,
    },

    /// Endpoint is malformed or unreachable.
    #[error("connection error: {0}")]
    Connection(String),

    /// Input could not be parsed as a chain address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Input could not be parsed as a 32-byte transaction hash.
    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    /// Requested timestamp is ahead of the chain head.
    #[error("target timestamp {target} is ahead of head block timestamp {head_timestamp}")]
    FutureTimestamp {
        /// Requested timestamp (unix seconds).
        target: u64,
        /// Timestamp of the head block sampled at call start.
        head_timestamp: u64,
    },

    /// The node has no receipt for the transaction.
    #[error("no receipt for transaction {0}")]
    ReceiptNotFound(String),

    /// ABI missing, unreadable, or lacking the requested item.
    #[error("abi error: {0}")]
    Abi(String),

    /// Response payload did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Non-2xx, non-429 HTTP status.
    #[error("http {status} from {url}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Mnemonic generation or key derivation failed.
    #[error("key derivation failed: {0}")]
    Derivation(String),

    /// JSON-RPC level failure other than rate limiting.
    #[error("rpc error: {0}")]
    Rpc(String),
}

impl ChainError {
    /// Whether `RetryPolicy` should back off and try again.
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rate_limited_is_retryable() {
        assert!(ChainError::RateLimited.is_rate_limited());
        assert!(!ChainError::Connection("refused".into()).is_rate_limited());
        assert!(
            !ChainError::RetryExhausted {
                operation: "decimals".into(),
                attempts: 10
            }
            .is_rate_limited()
        );
    }

    #[test]
    fn test_messages_carry_context() {
        let err = ChainError::FutureTimestamp {
            target: 20,
            head_timestamp: 10,
        };
        assert_eq!(
            err.to_string(),
            "target timestamp 20 is ahead of head block timestamp 10"
        );
    }
}

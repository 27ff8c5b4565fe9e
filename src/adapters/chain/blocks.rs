//! Block Timestamp Resolver - First Block At or After a Unix Time
//!
//! Binary search over `[0, head]` where each probe fetches one block
//! timestamp through `RetryPolicy`. The head is sampled once when the
//! call starts; blocks mined during the search are never considered.
//!
//! The result carries a deadline ten minutes after the call started.
//! It is advisory: the search itself is never interrupted, callers
//! consult it to decide whether dependent work is still worth doing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::adapters::retry::RetryPolicy;
use crate::domain::error::ChainError;
use crate::ports::evm_rpc::EvmRpc;

/// Minutes of budget handed to the caller alongside the resolved block.
pub const DEADLINE_MINUTES: i64 = 10;

fn deadline_from(start: DateTime<Utc>) -> DateTime<Utc> {
    start + chrono::Duration::minutes(DEADLINE_MINUTES)
}

/// Outcome of a timestamp lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockLookup {
    /// Smallest block whose timestamp is `>= target`.
    pub block: u64,
    /// Head block number sampled at call start.
    pub head: u64,
    /// Call start plus `DEADLINE_MINUTES`.
    pub deadline: DateTime<Utc>,
}

impl BlockLookup {
    pub fn expired(&self) -> bool {
        Utc::now() >= self.deadline
    }
}

pub struct BlockTimestampResolver {
    rpc: Arc<dyn EvmRpc>,
    retry: RetryPolicy,
}

impl BlockTimestampResolver {
    pub fn new(rpc: Arc<dyn EvmRpc>, retry: RetryPolicy) -> Self {
        Self { rpc, retry }
    }

    /// Resolve `target` (unix seconds) to a block number.
    ///
    /// # Errors
    /// `FutureTimestamp` when `target` is later than the head block.
    /// Any RPC failure that survives the retry policy.
    #[instrument(skip(self))]
    pub async fn block_at_timestamp(&self, target: u64) -> Result<BlockLookup, ChainError> {
        let deadline = deadline_from(Utc::now());

        let head = self
            .retry
            .run("eth_blockNumber", || self.rpc.block_number())
            .await?;
        let head_timestamp = self.timestamp(head).await?;

        if target > head_timestamp {
            return Err(ChainError::FutureTimestamp {
                target,
                head_timestamp,
            });
        }

        let (mut low, mut high) = (0u64, head);
        let mut probes = 0u32;
        while low < high {
            let mid = low + (high - low) / 2;
            probes += 1;
            if self.timestamp(mid).await? < target {
                low = mid + 1;
            } else {
                high = mid;
            }
        }

        info!(block = low, head, probes, "Resolved block for timestamp");
        Ok(BlockLookup {
            block: low,
            head,
            deadline,
        })
    }

    async fn timestamp(&self, number: u64) -> Result<u64, ChainError> {
        let timestamp = self
            .retry
            .run("eth_getBlockByNumber", || self.rpc.block_timestamp(number))
            .await?;
        debug!(number, timestamp, "Probed block");
        Ok(timestamp)
    }
}

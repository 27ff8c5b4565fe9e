//! Contract Client - ABI-Bound ERC-20 Reads and Transfer Log Scans
//!
//! `ContractClient::bind` checksums a contract address, loads the ABI
//! registered under a name ("erc20"), and pairs both with the cached
//! RPC handle for the endpoint. The resulting `BoundContract` exposes
//! typed read calls and a lazy scan of a receipt's `Transfer` events.
//!
//! Every RPC round trip goes through `RetryPolicy`.

use std::sync::Arc;

use alloy::dyn_abi::{DynSolValue, EventExt, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Event, Function, JsonAbi};
use alloy::primitives::{Address, Bytes, B256, U256};
use tracing::{debug, info, instrument};

use crate::adapters::retry::RetryPolicy;
use crate::domain::address::checksum;
use crate::domain::asset::TransferEvent;
use crate::domain::error::ChainError;
use crate::ports::abi_source::AbiSource;
use crate::ports::evm_rpc::{EvmRpc, ReceiptLog};

use super::registry::ConnectionRegistry;

/// Name of the ERC-20 transfer event in the ABI.
const TRANSFER_EVENT: &str = "Transfer";

/// Binds contract addresses to ABIs over shared RPC connections.
pub struct ContractClient {
    /// Endpoint-keyed RPC handle cache.
    registry: Arc<ConnectionRegistry<dyn EvmRpc>>,
    /// ABI lookup by asset-class name.
    abis: Arc<dyn AbiSource>,
    /// Backoff applied to every contract call.
    retry: RetryPolicy,
}

impl ContractClient {
    pub fn new(
        registry: Arc<ConnectionRegistry<dyn EvmRpc>>,
        abis: Arc<dyn AbiSource>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            registry,
            abis,
            retry,
        }
    }

    /// Bind `address` on `endpoint` to the ABI named `abi_name`.
    ///
    /// # Errors
    /// `InvalidAddress` if the address cannot be checksummed,
    /// `Connection` if the endpoint is malformed, `Abi` if the ABI
    /// cannot be loaded.
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn bind(
        &self,
        endpoint: &str,
        abi_name: &str,
        address: &str,
    ) -> Result<BoundContract, ChainError> {
        let address = checksum(address)?;
        let rpc = self.registry.get_or_create(endpoint).await?;
        let abi = self.abis.load(abi_name).await?;

        info!(contract = %address, abi = abi_name, "Bound contract");

        Ok(BoundContract {
            rpc,
            abi: Arc::new(abi),
            address,
            retry: self.retry,
        })
    }
}

/// A contract address paired with its ABI and RPC handle.
#[derive(Clone)]
pub struct BoundContract {
    rpc: Arc<dyn EvmRpc>,
    abi: Arc<JsonAbi>,
    address: Address,
    retry: RetryPolicy,
}

impl BoundContract {
    /// Assemble from parts; `bind` is the usual entry point.
    pub fn new(rpc: Arc<dyn EvmRpc>, abi: JsonAbi, address: Address, retry: RetryPolicy) -> Self {
        Self {
            rpc,
            abi: Arc::new(abi),
            address,
            retry,
        }
    }

    /// Checksummed contract address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// RPC handle this contract reads through.
    pub fn rpc(&self) -> Arc<dyn EvmRpc> {
        Arc::clone(&self.rpc)
    }

    pub const fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Token decimals.
    pub async fn decimals(&self) -> Result<u8, ChainError> {
        let value = self.read_uint("decimals", &[]).await?;
        if value > U256::from(u8::MAX) {
            return Err(ChainError::Decode(format!("decimals out of range: {value}")));
        }
        Ok(value.to::<u8>())
    }

    /// Token ticker.
    pub async fn symbol(&self) -> Result<String, ChainError> {
        let mut outputs = self.read("symbol", &[]).await?;
        match outputs.pop() {
            Some(DynSolValue::String(symbol)) if outputs.is_empty() => Ok(symbol),
            other => Err(ChainError::Decode(format!("symbol returned {other:?}"))),
        }
    }

    /// Total supply in the token's smallest unit.
    pub async fn total_supply(&self) -> Result<U256, ChainError> {
        self.read_uint("totalSupply", &[]).await
    }

    /// Balance of `owner` in the token's smallest unit.
    pub async fn balance_of(&self, owner: &str) -> Result<U256, ChainError> {
        let owner = checksum(owner)?;
        self.read_uint("balanceOf", &[DynSolValue::Address(owner)])
            .await
    }

    /// Values of every `Transfer` to `recipient` emitted by this contract
    /// in transaction `tx_hash`, in emission order.
    ///
    /// The receipt is fetched once; logs are decoded lazily as the
    /// returned iterator is consumed.
    #[instrument(skip(self), fields(contract = %self.address))]
    pub async fn transfers_to(&self, tx_hash: &str, recipient: &str) -> Result<Transfers, ChainError> {
        let hash: B256 = tx_hash
            .trim()
            .parse()
            .map_err(|_| ChainError::InvalidHash(tx_hash.to_string()))?;
        let recipient = checksum(recipient)?;
        let event = self.event(TRANSFER_EVENT)?.clone();

        let logs = self
            .retry
            .run("eth_getTransactionReceipt", || self.rpc.receipt_logs(hash))
            .await?
            .ok_or_else(|| ChainError::ReceiptNotFound(tx_hash.to_string()))?;

        debug!(logs = logs.len(), "Fetched receipt");

        Ok(Transfers {
            event,
            contract: self.address,
            recipient,
            logs: logs.into_iter(),
        })
    }

    async fn read_uint(&self, name: &str, args: &[DynSolValue]) -> Result<U256, ChainError> {
        let outputs = self.read(name, args).await?;
        match outputs.as_slice() {
            [value] => value
                .as_uint()
                .map(|(value, _bits)| value)
                .ok_or_else(|| ChainError::Decode(format!("{name} returned {value:?}"))),
            other => Err(ChainError::Decode(format!("{name} returned {other:?}"))),
        }
    }

    /// Encode, `eth_call`, decode.
    async fn read(&self, name: &str, args: &[DynSolValue]) -> Result<Vec<DynSolValue>, ChainError> {
        let function = self.function(name)?;
        let input: Bytes = function
            .abi_encode_input(args)
            .map_err(|e| ChainError::Abi(format!("{name}: {e}")))?
            .into();

        let output = self
            .retry
            .run(name, || self.rpc.call(self.address, input.clone()))
            .await?;

        function
            .abi_decode_output(&output, true)
            .map_err(|e| ChainError::Decode(format!("{name}: {e}")))
    }

    fn function(&self, name: &str) -> Result<&Function, ChainError> {
        self.abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| ChainError::Abi(format!("ABI has no function {name}")))
    }

    fn event(&self, name: &str) -> Result<&Event, ChainError> {
        self.abi
            .event(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| ChainError::Abi(format!("ABI has no event {name}")))
    }
}

/// Lazy iterator over matching transfer values of one receipt.
pub struct Transfers {
    event: Event,
    contract: Address,
    recipient: Address,
    logs: std::vec::IntoIter<ReceiptLog>,
}

impl Iterator for Transfers {
    type Item = U256;

    fn next(&mut self) -> Option<U256> {
        for log in self.logs.by_ref() {
            if log.address != self.contract {
                continue;
            }
            // Logs that are not Transfer events are expected; skip them.
            let Some(transfer) = decode_transfer(&self.event, &log) else {
                continue;
            };
            if transfer.to == self.recipient {
                return Some(transfer.value);
            }
        }
        None
    }
}

/// Decode a log as `Transfer(address indexed from, address indexed to, uint256 value)`.
fn decode_transfer(event: &Event, log: &ReceiptLog) -> Option<TransferEvent> {
    let decoded = event
        .decode_log_parts(log.topics.iter().copied(), &log.data, true)
        .ok()?;

    let from = decoded.indexed.first()?.as_address()?;
    let to = decoded.indexed.get(1)?.as_address()?;
    let (value, _bits) = decoded.body.first()?.as_uint()?;

    Some(TransferEvent { from, to, value })
}

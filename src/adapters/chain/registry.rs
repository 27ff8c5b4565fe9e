//! Connection Registry - One Chain Client per RPC Endpoint
//!
//! Replaces a process-global singleton map with an explicit object
//! owned by whoever needs chain access. The first caller for an
//! endpoint constructs the client and installs it; every later or
//! concurrent caller receives a clone of the same `Arc`.
//!
//! The check-and-insert runs under one async mutex, so two tasks
//! racing on a cold endpoint never build two clients. A failed
//! construction leaves the map untouched.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::domain::error::ChainError;
use crate::ports::evm_rpc::EvmRpc;

use super::provider::AlloyRpc;

/// Builds a client for an endpoint. Called at most once per endpoint.
pub type Connector<C> = Box<dyn Fn(&str) -> Result<Arc<C>, ChainError> + Send + Sync>;

/// Endpoint-keyed cache of shared chain clients.
pub struct ConnectionRegistry<C: ?Sized> {
    /// Client factory.
    connector: Connector<C>,
    /// Installed handles, keyed by the exact endpoint string.
    handles: Mutex<HashMap<String, Arc<C>>>,
}

impl<C: ?Sized + Send + Sync> ConnectionRegistry<C> {
    /// Create an empty registry with a custom client factory.
    pub fn new(connector: Connector<C>) -> Self {
        Self {
            connector,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Return the handle for `endpoint`, constructing it on first use.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, endpoint: &str) -> Result<Arc<C>, ChainError> {
        let mut handles = self.handles.lock().await;

        if let Some(handle) = handles.get(endpoint) {
            debug!("Reusing cached connection");
            return Ok(Arc::clone(handle));
        }

        let handle = (self.connector)(endpoint)?;
        handles.insert(endpoint.to_string(), Arc::clone(&handle));
        info!(cached = handles.len(), "Opened new chain connection");

        Ok(handle)
    }

    /// Number of distinct endpoints with an installed handle.
    pub async fn len(&self) -> usize {
        self.handles.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl ConnectionRegistry<dyn EvmRpc> {
    /// Registry whose handles are alloy HTTP providers.
    pub fn http() -> Self {
        Self::new(Box::new(|endpoint: &str| {
            let rpc: Arc<dyn EvmRpc> = Arc::new(AlloyRpc::connect(endpoint)?);
            Ok(rpc)
        }))
    }
}

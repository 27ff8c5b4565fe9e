//! ABI Directory - `<name>.abi` Files on Disk
//!
//! Implements the `AbiSource` port by reading a JSON ABI array from
//! `<dir>/<name>.abi`. Names are restricted to a flat identifier so a
//! lookup can never escape the directory.

use std::path::PathBuf;

use alloy::json_abi::JsonAbi;
use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, instrument};

use crate::domain::error::ChainError;
use crate::ports::abi_source::AbiSource;

/// Filesystem-backed ABI lookup.
#[derive(Debug, Clone)]
pub struct AbiDirectory {
    dir: PathBuf,
}

impl AbiDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, ChainError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ChainError::Abi(format!("invalid ABI name {name:?}")));
        }
        Ok(self.dir.join(format!("{name}.abi")))
    }
}

#[async_trait]
impl AbiSource for AbiDirectory {
    #[instrument(skip(self))]
    async fn load(&self, name: &str) -> Result<JsonAbi, ChainError> {
        let path = self.path_for(name)?;

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| ChainError::Abi(format!("{}: {e}", path.display())))?;

        let abi: JsonAbi = serde_json::from_str(&content)
            .map_err(|e| ChainError::Abi(format!("{}: {e}", path.display())))?;

        debug!(
            functions = abi.functions().count(),
            events = abi.events().count(),
            "Loaded ABI"
        );
        Ok(abi)
    }
}

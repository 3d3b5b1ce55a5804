//! Deployment-time configuration of a distributor.
//!
//! ```json
//! {
//!   "airdropTokenAddress": "0x...",
//!   "airdropTokenStorageAddress": "0x..."
//! }
//! ```

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
    #[error("{0} has invalid value: {1}")]
    InvalidAddress(&'static str, Address),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorConfig {
    /// Token paid out on claims.
    pub airdrop_token_address: Address,
    /// Holder the payouts are transferred from.
    pub airdrop_token_storage_address: Address,
}

impl DistributorConfig {
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading distributor config from {}", path.display());
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.airdrop_token_address.is_zero() {
            return Err(ConfigError::InvalidAddress(
                "airdropTokenAddress",
                self.airdrop_token_address,
            ));
        }
        if self.airdrop_token_storage_address.is_zero() {
            return Err(ConfigError::InvalidAddress(
                "airdropTokenStorageAddress",
                self.airdrop_token_storage_address,
            ));
        }
        Ok(())
    }
}

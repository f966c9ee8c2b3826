//! Configuration management for w3push

use crate::error::{Error, Result};
use crate::gateway::GatewayConfig;
use crate::pricing::PricingConfig;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default single-chunk threshold: files at or below this stay whole,
/// larger files split into chunks of at most this many bytes
pub const DEFAULT_MAX_CHUNK_BYTES: u64 = 475 * 1024;

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Single-chunk threshold and per-chunk byte ceiling
    pub max_chunk_bytes: u64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        ChunkingConfig {
            max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES,
        }
    }
}

/// Contract addresses the client talks to
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractsConfig {
    /// Storage contract holding chunk data (the write target)
    pub storage: Address,

    /// File contract whose address forms the gateway subdomain
    pub file: Address,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Chunk splitting parameters
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Pay-per-byte pricing parameters
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Public gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Contract addresses
    #[serde(default)]
    pub contracts: ContractsConfig,
}

impl Config {
    /// Load configuration from a file, with environment variable overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(domain) = std::env::var("W3PUSH_GATEWAY_DOMAIN") {
            let domain = domain.trim().to_string();
            if !domain.is_empty() {
                self.gateway.domain = domain;
            }
        }

        if let Ok(max) = std::env::var("W3PUSH_MAX_CHUNK_BYTES") {
            if let Ok(max) = max.trim().parse::<u64>() {
                self.chunking.max_chunk_bytes = max;
            }
        }

        if let Ok(storage) = std::env::var("W3PUSH_STORAGE_CONTRACT") {
            if let Ok(address) = storage.trim().parse::<Address>() {
                self.contracts.storage = address;
            }
        }

        if let Ok(file) = std::env::var("W3PUSH_FILE_CONTRACT") {
            if let Ok(address) = file.trim().parse::<Address>() {
                self.contracts.file = address;
            }
        }
    }

    /// Save configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_chunk_bytes == 0 {
            return Err(Error::InvalidConfig(
                "Max chunk bytes must be greater than 0".to_string(),
            ));
        }

        if self.pricing.unit_bytes == 0 {
            return Err(Error::InvalidConfig(
                "Pricing unit bytes must be greater than 0".to_string(),
            ));
        }

        if self.pricing.overhead_bytes >= self.pricing.unit_bytes {
            return Err(Error::InvalidConfig(
                "Pricing overhead must be smaller than the unit size".to_string(),
            ));
        }

        if self.gateway.domain.is_empty() {
            return Err(Error::InvalidConfig(
                "Gateway domain is required".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.max_chunk_bytes, 475 * 1024);
        assert_eq!(config.gateway.domain, "w3q-g.w3link.io");
        assert!(config.pricing.check_balance);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w3push.json");

        let mut config = Config::default();
        config.chunking.max_chunk_bytes = 1024;
        config.contracts.storage = Address::repeat_byte(0x01);
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w3push.json");

        let mut config = Config::default();
        config.chunking.max_chunk_bytes = 0;
        config.save(&path).unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_sections_take_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_rejects_overhead_at_or_above_unit() {
        let mut config = Config::default();
        config.pricing.unit_bytes = 100;
        config.pricing.overhead_bytes = 100;
        assert!(config.validate().is_err());
    }
}

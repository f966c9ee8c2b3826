//! Public gateway URL resolution
//!
//! The gateway serves stored bytes at a fixed template:
//! `https://{file_contract}.{domain}/{account}-{file_name}`. Addresses in
//! the host and path are lowercase hex, since the host component is a DNS
//! label.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Default public gateway domain
pub const DEFAULT_GATEWAY_DOMAIN: &str = "w3q-g.w3link.io";

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Gateway host that resolves contract/account/file-name triples
    pub domain: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            domain: DEFAULT_GATEWAY_DOMAIN.to_string(),
        }
    }
}

/// Resolve the public retrieval URL for an uploaded file.
pub fn file_url(domain: &str, file_contract: Address, account: Address, file_name: &str) -> String {
    format!(
        "https://{:#x}.{}/{:#x}-{}",
        file_contract, domain, account, file_name
    )
}

//! Per-chunk storage pricing
//!
//! The contract charges per stored byte above a free allowance. The quote
//! must reproduce the on-chain rounding exactly (floor, whole tokens) or
//! writes under- or over-pay.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Wei per whole payment token
pub const WEI_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Default billing unit: bytes covered by one payment token
pub const DEFAULT_UNIT_BYTES: u64 = 24 * 1024;

/// Default per-chunk byte overhead added before billing
pub const DEFAULT_OVERHEAD_BYTES: u64 = 626;

/// Pricing parameters
///
/// The reviewed deployments differ in constants and in whether a balance
/// pre-check runs at all, so all of it is configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingConfig {
    /// Bytes covered by one payment token
    pub unit_bytes: u64,

    /// Storage overhead added to the chunk length before billing
    pub overhead_bytes: u64,

    /// Whether to check the account balance before each paid write
    pub check_balance: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            unit_bytes: DEFAULT_UNIT_BYTES,
            overhead_bytes: DEFAULT_OVERHEAD_BYTES,
            check_balance: true,
        }
    }
}

impl PricingConfig {
    /// Largest chunk length that stores for free
    pub fn free_limit(&self) -> u64 {
        self.unit_bytes.saturating_sub(self.overhead_bytes)
    }

    /// Quote the payment for a chunk, in whole tokens.
    ///
    /// Chunks at or below the free limit cost nothing; above it the cost is
    /// `floor((len + overhead) / unit)`.
    pub fn quote(&self, chunk_len: u64) -> u64 {
        if chunk_len <= self.free_limit() {
            0
        } else {
            (chunk_len + self.overhead_bytes) / self.unit_bytes
        }
    }
}

/// Convert a whole-token quote to wei for the transaction value.
pub fn to_wei(tokens: u64) -> U256 {
    U256::from(tokens) * U256::from(WEI_PER_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_chunks_are_free() {
        let pricing = PricingConfig::default();
        assert_eq!(pricing.quote(0), 0);
        assert_eq!(pricing.quote(1), 0);
        // exactly at the free limit: 24 * 1024 - 626 = 23950
        assert_eq!(pricing.free_limit(), 23950);
        assert_eq!(pricing.quote(23950), 0);
    }

    #[test]
    fn test_first_paid_byte() {
        let pricing = PricingConfig::default();
        // one past the free limit: (23951 + 626) / 24576 floors to 1
        assert_eq!(pricing.quote(23951), 1);
    }

    #[test]
    fn test_quote_rounds_down() {
        let pricing = PricingConfig::default();
        // (48000 + 626) / 24576 = 1.97... -> 1
        assert_eq!(pricing.quote(48000), 1);
        // (49000 + 626) / 24576 = 2.01... -> 2
        assert_eq!(pricing.quote(49000), 2);
    }

    #[test]
    fn test_quote_scales_linearly() {
        let pricing = PricingConfig::default();
        let unit = pricing.unit_bytes;
        for tokens in 1..=8u64 {
            let len = tokens * unit;
            assert_eq!(pricing.quote(len), tokens);
        }
    }

    #[test]
    fn test_custom_constants() {
        let pricing = PricingConfig {
            unit_bytes: 16,
            overhead_bytes: 4,
            check_balance: false,
        };
        assert_eq!(pricing.free_limit(), 12);
        assert_eq!(pricing.quote(12), 0);
        assert_eq!(pricing.quote(13), 1);
        assert_eq!(pricing.quote(100), 6);
    }

    #[test]
    fn test_to_wei() {
        assert_eq!(to_wei(0), U256::ZERO);
        assert_eq!(to_wei(1), U256::from(WEI_PER_TOKEN));
        assert_eq!(to_wei(3), U256::from(3u64) * U256::from(WEI_PER_TOKEN));
    }
}

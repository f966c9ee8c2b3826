//! Content hashing and hex codecs
//!
//! The storage contract addresses chunks by Keccak-256 digest and accepts
//! raw byte blobs as hex strings, so every payload and file name crosses
//! the wire in `0x`-prefixed hex.

use crate::error::Result;
use alloy_primitives::B256;
use sha3::{Digest, Keccak256};

/// Compute the Keccak-256 digest of a byte slice.
///
/// This is the digest the contract stores per chunk; comparing it against
/// the local digest is the sole oracle for "chunk unchanged".
pub fn keccak256(data: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    B256::from_slice(&hasher.finalize())
}

/// Encode bytes as a `0x`-prefixed lowercase hex string.
pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Decode a hex string, with or without a `0x` prefix.
pub fn from_hex(s: &str) -> Result<Vec<u8>> {
    let stripped = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    Ok(hex::decode(stripped)?)
}

/// Encode a UTF-8 string as hex bytes for on-chain storage.
///
/// Contract methods take file names as byte blobs, not strings.
pub fn string_to_hex(s: &str) -> String {
    to_hex(s.as_bytes())
}

/// Decode a hex-encoded on-chain name back to a UTF-8 string.
pub fn hex_to_string(s: &str) -> Result<String> {
    Ok(String::from_utf8(from_hex(s)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_known_vectors() {
        assert_eq!(
            to_hex(keccak256(b"").as_slice()),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            to_hex(keccak256(b"abc").as_slice()),
            "0x4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }

    #[test]
    fn test_keccak_deterministic() {
        let data = b"same input, same digest";
        assert_eq!(keccak256(data), keccak256(data));
    }

    #[test]
    fn test_hex_round_trip() {
        let cases: &[&[u8]] = &[b"", b"\x00", b"hello", &[0xff, 0x00, 0x7f, 0x80]];
        for case in cases {
            let encoded = to_hex(case);
            assert!(encoded.starts_with("0x"));
            assert_eq!(from_hex(&encoded).unwrap(), *case);
        }
    }

    #[test]
    fn test_from_hex_accepts_bare_strings() {
        assert_eq!(from_hex("deadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(from_hex("0xdeadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_from_hex_rejects_invalid() {
        assert!(from_hex("0xzz").is_err());
        assert!(from_hex("0x123").is_err());
    }

    #[test]
    fn test_string_round_trip() {
        let name = "track-01.mp3";
        let encoded = string_to_hex(name);
        assert_eq!(encoded, "0x747261636b2d30312e6d7033");
        assert_eq!(hex_to_string(&encoded).unwrap(), name);
    }
}

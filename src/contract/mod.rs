//! Storage contract boundary
//!
//! The on-chain file store is an opaque RPC service with a fixed method
//! set. Everything behind [`FileContract`] — transport, ABI encoding,
//! signing — is a backend concern; the uploader only sees hex payloads,
//! digests, and receipts.

mod memory;

pub use memory::MemoryFileContract;

use crate::error::Result;
use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category tag stored alongside each file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Plain file payload
    File = 0,
    /// Audio track
    Music = 1,
    /// Cover image
    Cover = 2,
}

impl FileKind {
    /// Numeric tag passed to the contract's `writeChunk`
    pub fn tag(self) -> u64 {
        self as u64
    }

    /// Decode a tag read back from the contract
    pub fn from_tag(tag: u64) -> Option<FileKind> {
        match tag {
            0 => Some(FileKind::File),
            1 => Some(FileKind::Music),
            2 => Some(FileKind::Cover),
            _ => None,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::File => write!(f, "file"),
            FileKind::Music => write!(f, "music"),
            FileKind::Cover => write!(f, "cover"),
        }
    }
}

/// Receipt for a submitted transaction, reported once it is finalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Transaction hash
    pub tx_hash: B256,
    /// Whether the ledger reports the transaction as successful
    pub success: bool,
}

/// One entry from an author's on-chain file listing
#[derive(Debug, Clone)]
pub struct AuthorFile {
    /// When the file was last written
    pub uploaded_at: DateTime<Utc>,
    /// Decoded file name
    pub name: String,
    /// Category tag
    pub kind: FileKind,
    /// Retrieval URL stored by the contract (may be empty)
    pub url: String,
}

/// Async interface to the storage contract.
///
/// File names and chunk payloads cross this boundary hex-encoded, matching
/// the contract's byte-blob calldata. Implementations must surface read
/// failures as errors; an absent chunk is reported by [`chunk_hash`]
/// returning the zero digest, never by an error.
///
/// [`chunk_hash`]: FileContract::chunk_hash
#[async_trait]
pub trait FileContract: Send + Sync {
    /// Number of chunks currently stored under `hex_name`
    async fn count_chunks(&self, hex_name: &str) -> Result<u64>;

    /// Stored digest of chunk `index`, or `B256::ZERO` if absent
    async fn chunk_hash(&self, hex_name: &str, index: u32) -> Result<B256>;

    /// Current balance of `account` in wei
    async fn balance_of(&self, account: Address) -> Result<U256>;

    /// Write one chunk, attaching `payment` wei, and await confirmation
    async fn write_chunk(
        &self,
        kind: FileKind,
        index: u32,
        hex_name: &str,
        hex_data: &str,
        payment: U256,
    ) -> Result<TxReceipt>;

    /// Remove every chunk stored under `hex_name` and await confirmation
    async fn remove(&self, hex_name: &str) -> Result<TxReceipt>;

    /// Remove several files in one transaction
    async fn remove_many(&self, hex_names: &[String]) -> Result<TxReceipt>;

    /// List the files written by `author`
    async fn author_files(&self, author: Address) -> Result<Vec<AuthorFile>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_tags_round_trip() {
        for kind in [FileKind::File, FileKind::Music, FileKind::Cover] {
            assert_eq!(FileKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(FileKind::from_tag(3), None);
    }

    #[test]
    fn test_file_kind_display() {
        assert_eq!(FileKind::Music.to_string(), "music");
    }
}

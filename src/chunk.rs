//! Chunk splitting
//!
//! Files are stored on-chain as an ordered sequence of chunks, each written
//! and hashed independently. Splitting must be reproducible: chunk index i
//! always maps to the same byte range for a given file size and target
//! count, so a re-upload can diff chunk-by-chunk against remote state.

use crate::codec;
use alloy_primitives::B256;
use bytes::Bytes;

/// A contiguous byte-range slice of a file, addressed by its index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based position; must match the write position on-chain
    pub index: u32,
    /// Chunk payload (zero-copy slice of the file buffer)
    pub data: Bytes,
}

impl Chunk {
    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Keccak-256 digest of the payload
    pub fn digest(&self) -> B256 {
        codec::keccak256(&self.data)
    }
}

/// Number of chunks a buffer of `total_len` bytes splits into, given the
/// single-chunk byte threshold.
///
/// Buffers at or below the threshold stay whole; larger buffers split into
/// `ceil(total_len / max_chunk_bytes)` chunks.
pub fn target_chunk_count(total_len: usize, max_chunk_bytes: usize) -> usize {
    if total_len <= max_chunk_bytes {
        1
    } else {
        total_len.div_ceil(max_chunk_bytes)
    }
}

/// Split a buffer into `target_count` ordered chunks.
///
/// Chunk size is `ceil(len / target_count)`; earlier chunks are full-size
/// and the remainder lands in the final chunk, so the actual chunk count
/// never exceeds `target_count`. Concatenating the chunks reproduces the
/// input exactly.
pub fn split(content: &Bytes, target_count: usize) -> Vec<Chunk> {
    let len = content.len();
    if len == 0 || target_count <= 1 {
        return vec![Chunk {
            index: 0,
            data: content.clone(),
        }];
    }

    let chunk_bytes = len.div_ceil(target_count);
    let mut chunks = Vec::with_capacity(target_count);
    let mut start = 0;
    while start < len {
        let end = usize::min(start + chunk_bytes, len);
        chunks.push(Chunk {
            index: chunks.len() as u32,
            data: content.slice(start..end),
        });
        start = end;
    }
    chunks
}

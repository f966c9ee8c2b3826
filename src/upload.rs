//! Upload orchestration
//!
//! Drives the end-to-end upload: stale-file clearing, the sequential
//! per-chunk diff-and-write loop, the balance pre-check, and fail-fast
//! short-circuiting. Chunks are strictly sequential because each write's
//! payment and balance check depend on up-to-date chain state, and a
//! mid-sequence failure must stop all subsequent writes. A failed upload
//! is not retried here; re-invoking re-runs the diff from chunk 0 and
//! skips whatever already matches.

use crate::chunk::{self, Chunk};
use crate::codec;
use crate::config::Config;
use crate::contract::{FileContract, FileKind};
use crate::error::{Error, Result};
use crate::gateway;
use crate::pricing;
use alloy_primitives::{Address, U256};
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// One file to upload
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Category tag stored with the file
    pub kind: FileKind,
    /// Account paying for chunk writes
    pub account: Address,
    /// File name, also the on-chain key
    pub file_name: String,
    /// Complete file bytes
    pub content: Bytes,
}

/// What happened to one chunk during an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// Remote digest already matched; nothing written
    Skipped,
    /// Written and confirmed, with the attached payment in wei
    Written { payment: U256 },
    /// The write stage failed; the upload stopped here
    Failed,
}

/// Progress of one upload, reported after each processed chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Chunks processed so far, 1-based and monotonically increasing
    pub completed: u32,
    /// Total chunk count for this upload
    pub total: u32,
}

impl ProgressEvent {
    /// Completion percentage, rounded down
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            100
        } else {
            self.completed * 100 / self.total
        }
    }
}

/// Receives incremental upload events.
///
/// The terminal outcome is the return value of [`Uploader::upload`]; this
/// trait only observes per-chunk progress.
pub trait UploadObserver: Send + Sync {
    /// Called after each chunk is processed (skipped or written)
    fn on_progress(&self, _event: ProgressEvent) {}

    /// Called with the outcome of each chunk, including the failing one
    fn on_chunk(&self, _index: u32, _outcome: &ChunkOutcome) {}
}

/// No-op observer
impl UploadObserver for () {}

/// Result of a completed upload
#[derive(Debug, Clone)]
pub struct UploadReport {
    /// Public retrieval URL for the uploaded file
    pub url: String,
    /// Per-chunk outcomes, in index order
    pub outcomes: Vec<ChunkOutcome>,
}

impl UploadReport {
    /// Number of chunks actually written
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ChunkOutcome::Written { .. }))
            .count()
    }

    /// Number of chunks skipped as unchanged
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ChunkOutcome::Skipped))
            .count()
    }
}

/// Drives uploads against one storage contract connection.
///
/// Holds no per-upload state; concurrent uploads of different files are
/// independent. Uploads of the same file name are serialized through a
/// per-name lock so clearing, diffing, and writing cannot interleave.
pub struct Uploader<C: FileContract> {
    contract: Arc<C>,
    config: Config,
    name_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<C: FileContract> Uploader<C> {
    /// Create an uploader over a contract connection
    pub fn new(contract: Arc<C>, config: Config) -> Self {
        Uploader {
            contract,
            config,
            name_locks: DashMap::new(),
        }
    }

    /// Upload a file, writing only the chunks whose remote digest differs.
    ///
    /// Fails fast: the first chunk failure aborts the remaining chunks and
    /// surfaces as the returned error. Prior successful writes persist.
    pub async fn upload(
        &self,
        request: UploadRequest,
        observer: &dyn UploadObserver,
    ) -> Result<UploadReport> {
        if request.file_name.is_empty() {
            return Err(Error::InvalidRequest("file name is empty".to_string()));
        }
        if request.account == Address::ZERO {
            return Err(Error::AccountUnavailable(
                "no signing account configured".to_string(),
            ));
        }

        let hex_name = codec::string_to_hex(&request.file_name);
        let lock = self
            .name_locks
            .entry(hex_name.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let target = chunk::target_chunk_count(
            request.content.len(),
            self.config.chunking.max_chunk_bytes as usize,
        );
        let chunks = chunk::split(&request.content, target);
        info!(
            "Uploading {} ({} bytes, {} chunks)",
            request.file_name,
            request.content.len(),
            chunks.len()
        );

        self.clear_stale(&request.file_name, &hex_name, chunks.len() as u64)
            .await?;

        let total = chunks.len() as u32;
        let mut outcomes = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let outcome = match self.sync_chunk(&request, &hex_name, chunk).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    observer.on_chunk(chunk.index, &ChunkOutcome::Failed);
                    return Err(e);
                }
            };
            observer.on_chunk(chunk.index, &outcome);
            observer.on_progress(ProgressEvent {
                completed: chunk.index + 1,
                total,
            });
            outcomes.push(outcome);
        }

        let url = gateway::file_url(
            &self.config.gateway.domain,
            self.config.contracts.file,
            request.account,
            &request.file_name,
        );
        info!("Upload of {} complete: {}", request.file_name, url);
        Ok(UploadReport { url, outcomes })
    }

    /// Remove a left-over longer version of the file before writing.
    ///
    /// Only needed when the remote chunk count exceeds the count about to
    /// be written; otherwise stale tail chunks would survive the upload.
    async fn clear_stale(&self, name: &str, hex_name: &str, new_count: u64) -> Result<()> {
        let old_count = self
            .contract
            .count_chunks(hex_name)
            .await
            .map_err(|e| Error::StaleStateCheck {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        if old_count <= new_count {
            return Ok(());
        }

        info!(
            "Removing stale file {} ({} chunks on chain, {} incoming)",
            name, old_count, new_count
        );
        let receipt = self
            .contract
            .remove(hex_name)
            .await
            .map_err(|e| Error::StaleStateCheck {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        if !receipt.success {
            warn!("Removal of {} reverted", name);
            return Err(Error::StaleStateCheck {
                name: name.to_string(),
                reason: "removal transaction reverted".to_string(),
            });
        }
        Ok(())
    }

    /// Diff one chunk against remote state and write it if it differs.
    async fn sync_chunk(
        &self,
        request: &UploadRequest,
        hex_name: &str,
        chunk: &Chunk,
    ) -> Result<ChunkOutcome> {
        let remote = self
            .contract
            .chunk_hash(hex_name, chunk.index)
            .await
            .map_err(|e| Error::StaleStateCheck {
                name: request.file_name.clone(),
                reason: e.to_string(),
            })?;

        if remote == chunk.digest() {
            debug!(
                "Chunk {} of {} unchanged, skipping",
                chunk.index, request.file_name
            );
            return Ok(ChunkOutcome::Skipped);
        }

        let quote = self.config.pricing.quote(chunk.len() as u64);
        let payment = pricing::to_wei(quote);

        if self.config.pricing.check_balance && payment > U256::ZERO {
            let balance = self
                .contract
                .balance_of(request.account)
                .await
                .map_err(|e| Error::WriteRejected {
                    index: chunk.index,
                    reason: e.to_string(),
                })?;
            if balance <= payment {
                return Err(Error::InsufficientBalance {
                    index: chunk.index,
                    required: payment,
                    balance,
                });
            }
        }

        debug!(
            "Writing chunk {} of {} ({} bytes, {} tokens)",
            chunk.index,
            request.file_name,
            chunk.len(),
            quote
        );
        let hex_data = codec::to_hex(&chunk.data);
        let receipt = self
            .contract
            .write_chunk(request.kind, chunk.index, hex_name, &hex_data, payment)
            .await
            .map_err(|e| Error::WriteRejected {
                index: chunk.index,
                reason: e.to_string(),
            })?;
        if !receipt.success {
            warn!(
                "Write of chunk {} of {} reverted",
                chunk.index, request.file_name
            );
            return Err(Error::WriteRejected {
                index: chunk.index,
                reason: "write transaction reverted".to_string(),
            });
        }

        debug!(
            "Chunk {} of {} confirmed in tx {:#x}",
            chunk.index, request.file_name, receipt.tx_hash
        );
        Ok(ChunkOutcome::Written { payment })
    }
}

//! In-memory storage contract backend
//!
//! Reproduces the contract's documented semantics — per-index chunk
//! digests, zero digest for absent chunks, balance debits on paid writes,
//! whole-file removal — without a node. Used by the test suite and for
//! local experiments; failure knobs let callers exercise the uploader's
//! error paths.

use crate::codec;
use crate::contract::{AuthorFile, FileContract, FileKind, TxReceipt};
use crate::error::{Error, Result};
use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

struct StoredFile {
    kind: FileKind,
    author: Address,
    hashes: Vec<B256>,
    updated_at: DateTime<Utc>,
    url: String,
}

#[derive(Default)]
struct State {
    sender: Address,
    files: HashMap<String, StoredFile>,
    balances: HashMap<Address, U256>,
    writes: Vec<(String, u32)>,
    removals: Vec<String>,
    tx_counter: u64,
    fail_state_reads: bool,
    reject_removals: bool,
    reject_write_at: Option<u32>,
}

impl State {
    fn next_tx_hash(&mut self) -> B256 {
        self.tx_counter += 1;
        codec::keccak256(&self.tx_counter.to_be_bytes())
    }
}

/// In-memory [`FileContract`] implementation
pub struct MemoryFileContract {
    state: Mutex<State>,
}

impl MemoryFileContract {
    /// Create an empty store with a zero sender and no balances
    pub fn new() -> Self {
        MemoryFileContract {
            state: Mutex::new(State::default()),
        }
    }

    /// Set the account debited for paid writes
    pub fn with_sender(self, sender: Address) -> Self {
        self.state.lock().sender = sender;
        self
    }

    /// Credit an account balance, in wei
    pub fn credit(&self, account: Address, wei: U256) {
        let mut state = self.state.lock();
        let balance = state.balances.entry(account).or_default();
        *balance += wei;
    }

    /// Every `(hex_name, index)` write accepted so far, in order
    pub fn write_log(&self) -> Vec<(String, u32)> {
        self.state.lock().writes.clone()
    }

    /// Every removal accepted so far, in order
    pub fn removal_log(&self) -> Vec<String> {
        self.state.lock().removals.clone()
    }

    /// Make `count_chunks` and `chunk_hash` fail, as a dead node would
    pub fn fail_state_reads(&self, fail: bool) {
        self.state.lock().fail_state_reads = fail;
    }

    /// Make removal transactions confirm with a failed status
    pub fn reject_removals(&self, reject: bool) {
        self.state.lock().reject_removals = reject;
    }

    /// Make the write for one chunk index confirm with a failed status
    pub fn reject_write_at(&self, index: Option<u32>) {
        self.state.lock().reject_write_at = index;
    }
}

impl Default for MemoryFileContract {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileContract for MemoryFileContract {
    async fn count_chunks(&self, hex_name: &str) -> Result<u64> {
        let state = self.state.lock();
        if state.fail_state_reads {
            return Err(Error::Rpc("node unavailable".to_string()));
        }
        Ok(state.files.get(hex_name).map_or(0, |f| f.hashes.len() as u64))
    }

    async fn chunk_hash(&self, hex_name: &str, index: u32) -> Result<B256> {
        let state = self.state.lock();
        if state.fail_state_reads {
            return Err(Error::Rpc("node unavailable".to_string()));
        }
        Ok(state
            .files
            .get(hex_name)
            .and_then(|f| f.hashes.get(index as usize))
            .copied()
            .unwrap_or(B256::ZERO))
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        let state = self.state.lock();
        Ok(state.balances.get(&account).copied().unwrap_or(U256::ZERO))
    }

    async fn write_chunk(
        &self,
        kind: FileKind,
        index: u32,
        hex_name: &str,
        hex_data: &str,
        payment: U256,
    ) -> Result<TxReceipt> {
        let digest = codec::keccak256(&codec::from_hex(hex_data)?);
        let mut state = self.state.lock();

        if state.reject_write_at == Some(index) {
            let tx_hash = state.next_tx_hash();
            return Ok(TxReceipt {
                tx_hash,
                success: false,
            });
        }

        if payment > U256::ZERO {
            let sender = state.sender;
            let balance = state.balances.entry(sender).or_default();
            if *balance < payment {
                return Err(Error::Rpc("insufficient funds for payment".to_string()));
            }
            *balance -= payment;
        }

        let sender = state.sender;
        let file = state.files.entry(hex_name.to_string()).or_insert_with(|| StoredFile {
            kind,
            author: sender,
            hashes: Vec::new(),
            updated_at: Utc::now(),
            url: String::new(),
        });

        let slot = index as usize;
        if slot > file.hashes.len() {
            return Err(Error::ChunkOutOfRange {
                name: hex_name.to_string(),
                index,
            });
        }
        if slot == file.hashes.len() {
            file.hashes.push(digest);
        } else {
            file.hashes[slot] = digest;
        }
        file.updated_at = Utc::now();

        state.writes.push((hex_name.to_string(), index));
        let tx_hash = state.next_tx_hash();
        Ok(TxReceipt {
            tx_hash,
            success: true,
        })
    }

    async fn remove(&self, hex_name: &str) -> Result<TxReceipt> {
        let mut state = self.state.lock();
        let tx_hash = state.next_tx_hash();
        if state.reject_removals {
            return Ok(TxReceipt {
                tx_hash,
                success: false,
            });
        }
        state.files.remove(hex_name);
        state.removals.push(hex_name.to_string());
        Ok(TxReceipt {
            tx_hash,
            success: true,
        })
    }

    async fn remove_many(&self, hex_names: &[String]) -> Result<TxReceipt> {
        let mut state = self.state.lock();
        let tx_hash = state.next_tx_hash();
        if state.reject_removals {
            return Ok(TxReceipt {
                tx_hash,
                success: false,
            });
        }
        for name in hex_names {
            state.files.remove(name);
            state.removals.push(name.clone());
        }
        Ok(TxReceipt {
            tx_hash,
            success: true,
        })
    }

    async fn author_files(&self, author: Address) -> Result<Vec<AuthorFile>> {
        let state = self.state.lock();
        let mut files = Vec::new();
        for (hex_name, file) in &state.files {
            if file.author != author {
                continue;
            }
            files.push(AuthorFile {
                uploaded_at: file.updated_at,
                name: codec::hex_to_string(hex_name)?,
                kind: file.kind,
                url: file.url.clone(),
            });
        }
        files.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then(a.name.cmp(&b.name)));
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_name(name: &str) -> String {
        codec::string_to_hex(name)
    }

    #[tokio::test]
    async fn test_absent_file_has_no_chunks() {
        let contract = MemoryFileContract::new();
        assert_eq!(contract.count_chunks(&hex_name("a.bin")).await.unwrap(), 0);
        assert_eq!(
            contract.chunk_hash(&hex_name("a.bin"), 0).await.unwrap(),
            B256::ZERO
        );
    }

    #[tokio::test]
    async fn test_write_then_read_back_digest() {
        let contract = MemoryFileContract::new();
        let name = hex_name("a.bin");
        let data = codec::to_hex(b"payload");

        let receipt = contract
            .write_chunk(FileKind::File, 0, &name, &data, U256::ZERO)
            .await
            .unwrap();
        assert!(receipt.success);

        assert_eq!(contract.count_chunks(&name).await.unwrap(), 1);
        assert_eq!(
            contract.chunk_hash(&name, 0).await.unwrap(),
            codec::keccak256(b"payload")
        );
        assert_eq!(contract.chunk_hash(&name, 1).await.unwrap(), B256::ZERO);
    }

    #[tokio::test]
    async fn test_write_rejects_index_gap() {
        let contract = MemoryFileContract::new();
        let name = hex_name("a.bin");
        let data = codec::to_hex(b"x");
        let err = contract
            .write_chunk(FileKind::File, 2, &name, &data, U256::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ChunkOutOfRange { index: 2, .. }));
    }

    #[tokio::test]
    async fn test_paid_write_debits_sender() {
        let sender = Address::repeat_byte(0x11);
        let contract = MemoryFileContract::new().with_sender(sender);
        contract.credit(sender, U256::from(10u64));

        let name = hex_name("a.bin");
        let data = codec::to_hex(b"x");
        contract
            .write_chunk(FileKind::File, 0, &name, &data, U256::from(4u64))
            .await
            .unwrap();
        assert_eq!(
            contract.balance_of(sender).await.unwrap(),
            U256::from(6u64)
        );

        // not enough left for an 8 wei payment
        let err = contract
            .write_chunk(FileKind::File, 1, &name, &data, U256::from(8u64))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Rpc(_)));
    }

    #[tokio::test]
    async fn test_remove_clears_chunks() {
        let contract = MemoryFileContract::new();
        let name = hex_name("a.bin");
        let data = codec::to_hex(b"x");
        contract
            .write_chunk(FileKind::File, 0, &name, &data, U256::ZERO)
            .await
            .unwrap();

        let receipt = contract.remove(&name).await.unwrap();
        assert!(receipt.success);
        assert_eq!(contract.count_chunks(&name).await.unwrap(), 0);
        assert_eq!(contract.removal_log(), vec![name]);
    }

    #[tokio::test]
    async fn test_remove_many_clears_all_names() {
        let contract = MemoryFileContract::new();
        let names = vec![hex_name("a.bin"), hex_name("b.bin")];
        let data = codec::to_hex(b"x");
        for name in &names {
            contract
                .write_chunk(FileKind::File, 0, name, &data, U256::ZERO)
                .await
                .unwrap();
        }

        contract.remove_many(&names).await.unwrap();
        for name in &names {
            assert_eq!(contract.count_chunks(name).await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn test_author_files_lists_written_names() {
        let author = Address::repeat_byte(0x42);
        let contract = MemoryFileContract::new().with_sender(author);
        let data = codec::to_hex(b"x");
        contract
            .write_chunk(FileKind::Music, 0, &hex_name("track.mp3"), &data, U256::ZERO)
            .await
            .unwrap();

        let files = contract.author_files(author).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "track.mp3");
        assert_eq!(files[0].kind, FileKind::Music);

        let other = contract.author_files(Address::repeat_byte(0x43)).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_state_read_failures() {
        let contract = MemoryFileContract::new();
        contract.fail_state_reads(true);
        assert!(contract.count_chunks(&hex_name("a.bin")).await.is_err());
        assert!(contract.chunk_hash(&hex_name("a.bin"), 0).await.is_err());

        contract.fail_state_reads(false);
        assert!(contract.count_chunks(&hex_name("a.bin")).await.is_ok());
    }
}

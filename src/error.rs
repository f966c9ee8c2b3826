//! Error types for w3push

use alloy_primitives::U256;
use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for w3push
#[derive(Error, Debug)]
pub enum Error {
    // Upload errors
    #[error("stale state check failed for {name}: {reason}")]
    StaleStateCheck { name: String, reason: String },

    #[error("insufficient balance: chunk {index} needs {required} wei, account holds {balance} wei")]
    InsufficientBalance {
        index: u32,
        required: U256,
        balance: U256,
    },

    #[error("chunk {index} write rejected: {reason}")]
    WriteRejected { index: u32, reason: String },

    #[error("signing account unavailable: {0}")]
    AccountUnavailable(String),

    #[error("invalid upload request: {0}")]
    InvalidRequest(String),

    // Contract transport errors
    #[error("contract call failed: {0}")]
    Rpc(String),

    #[error("chunk {index} out of range for {name}")]
    ChunkOutOfRange { name: String, index: u32 },

    // Codec errors
    #[error("invalid hex payload: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("decoded name is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    // Config errors
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

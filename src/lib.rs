//! w3push - chunked file uploads to on-chain storage
//!
//! This library splits files into chunks, writes each chunk to a storage
//! contract, and skips chunks whose Keccak-256 digest already matches
//! on-chain state, so re-uploads only pay for what changed.

pub mod chunk;
pub mod codec;
pub mod config;
pub mod contract;
pub mod error;
pub mod gateway;
pub mod pricing;
pub mod upload;

pub use config::Config;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::contract::{FileContract, FileKind};
    pub use crate::error::{Error, Result};
    pub use crate::upload::{UploadObserver, UploadReport, UploadRequest, Uploader};
}

//! Error types for directory Merkle trees and inclusion proofs.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the hashing and proof core
#[derive(Debug, Error)]
pub enum MerkleError {
    #[error("I/O error while hashing: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to generate nonce: {0}")]
    Randomness(#[from] rand::Error),

    #[error("Leaf index {index} is out of range for tree size {size}")]
    IndexOutOfRange { index: u64, size: u64 },

    #[error("Tree size does not match tree structure: {0}")]
    TreeSizeMismatch(String),

    #[error("Proof size does not match tree size and leaf index: {0}")]
    ProofSizeMismatch(String),
}

/// Application-level errors for tree files, proofs, and commands
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Merkle(#[from] MerkleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    #[error("Failed to encode payload: {0}")]
    Encode(String),

    #[error("Failed to decode payload: {0}")]
    Decode(String),

    #[error("File not found in Merkle tree: {0}")]
    FileNotInTree(String),

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    #[error("Ingestion failed: {0}")]
    Ingest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

//! merkdir: Merkle Trees of Directories
//!
//! Builds an RFC 9162 style Merkle tree over every regular file under a
//! directory, with nonce-salted BLAKE3 leaves so that an inclusion proof for
//! one file reveals nothing about the content of the others. Trees and proofs
//! are persisted in a small versioned container format.

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod proof;
pub mod store;
pub mod tree;
pub mod types;

pub use error::{ApiError, MerkleError};
pub use proof::{generate_proof, verify_proof, InclusionProof};
pub use store::TreeFile;
pub use tree::{build_tree, create_leaf, Node};

//! Inclusion Proofs
//!
//! An inclusion proof (audit path) carries the sibling hashes needed to
//! recompute the root from one leaf, following RFC 9162 §2.1.3. Proofs are
//! self-contained: they hold no reference into the tree they came from.

pub mod generate;
pub mod verify;

pub use generate::{generate_proof, locate_leaf};
pub use verify::{explain_proof, leaf_matches, verify_proof, verify_proof_with_leaf_hash};

use crate::types::{Hash, Nonce};

/// Proof that one leaf was part of a tree of a given size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionProof {
    /// Zero-based position of the proven leaf, left to right
    pub leaf_index: u64,
    /// Number of leaves in the tree when the proof was generated
    pub tree_size: u64,
    /// Nonce of the proven leaf, needed to recompute its hash
    pub nonce: Nonce,
    /// Sibling hashes, bottom to top
    pub path: Vec<Hash>,
}

/// Which side of the running hash a sibling is combined on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// hash(0x01 || sibling || running)
    Left,
    /// hash(0x01 || running || sibling)
    Right,
}

/// One combination performed while folding an audit path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStep {
    pub side: Side,
    pub sibling: Hash,
    /// Running hash after this step
    pub result: Hash,
}

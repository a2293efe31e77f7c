//! Tree Files
//!
//! The persisted description of one generated tree: where it came from, which
//! leaf index each file name maps to, when it was made, and the tree itself.
//! Tree files are written once and only read afterwards.

pub mod codec;

pub use codec::{read_proof, read_tree, write_proof, write_tree};

use crate::error::ApiError;
use crate::proof::{generate_proof, leaf_matches, locate_leaf, InclusionProof};
use crate::tree::node::{Leaf, Node};
use crate::tree::path;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{debug, info};

/// Tree plus the metadata needed to prove and re-verify its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    /// Absolute path of the source directory
    pub path: PathBuf,
    /// Relative file name to leaf index; its size is the tree size
    pub files: BTreeMap<String, u64>,
    pub created_at: DateTime<Utc>,
    pub root: Node,
}

/// Outcome of re-hashing a file against its stored leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// The file still hashes to its leaf
    Unchanged,
    /// The file's content differs from when the tree was built
    Changed,
}

impl TreeFile {
    /// Number of leaves
    pub fn tree_size(&self) -> u64 {
        self.files.len() as u64
    }

    pub fn root_hash(&self) -> crate::types::Hash {
        self.root.hash()
    }

    fn leaf_index(&self, name: &str) -> Result<u64, ApiError> {
        self.files
            .get(name)
            .copied()
            .ok_or_else(|| ApiError::FileNotInTree(name.to_string()))
    }

    /// Inclusion proof for a file, by the name stored in the tree
    pub fn inclusion_proof(&self, name: &str) -> Result<InclusionProof, ApiError> {
        let index = self.leaf_index(name)?;
        let proof = generate_proof(&self.root, self.tree_size(), index)?;
        info!(name, leaf_index = index, path_len = proof.path.len(), "Generated inclusion proof");
        Ok(proof)
    }

    /// Leaf node for a file, by the name stored in the tree
    pub fn leaf(&self, name: &str) -> Result<&Leaf, ApiError> {
        let index = self.leaf_index(name)?;
        Ok(locate_leaf(&self.root, self.tree_size(), index)?)
    }

    /// Leaf that an inclusion proof refers to, using the proof's own
    /// tree size and index
    pub fn leaf_for_proof(&self, proof: &InclusionProof) -> Result<&Leaf, ApiError> {
        Ok(locate_leaf(&self.root, proof.tree_size, proof.leaf_index)?)
    }

    /// Check whether a file on disk still matches its leaf
    ///
    /// Only the leaf is compared. The stored tree is assumed to be intact, so
    /// the path back to the root is not recomputed.
    pub fn verify_file(&self, name: &str) -> Result<FileStatus, ApiError> {
        let leaf = self.leaf(name)?;
        let file_path = path::resolve_name(&self.path, name)?;
        debug!(path = %file_path.display(), "Re-hashing file");
        let file = File::open(&file_path)?;
        let status = if leaf_matches(leaf, BufReader::new(file))? {
            FileStatus::Unchanged
        } else {
            FileStatus::Changed
        };
        info!(name, ?status, "Verified file against tree");
        Ok(status)
    }
}

//! Proof generation and leaf lookup by walking an in-memory tree

use crate::error::MerkleError;
use crate::proof::InclusionProof;
use crate::tree::hasher::flp2;
use crate::tree::node::{Leaf, Node};
use crate::types::Hash;
use tracing::{debug, instrument};

/// Generate an inclusion proof for leaf `m` of a tree believed to hold `n` leaves
///
/// The descent mirrors the builder's split, so a wrong `n` shows up as a
/// missing child or a non-leaf at the bottom and fails with
/// `TreeSizeMismatch`. File content is never touched.
#[instrument(skip(root), fields(root_hash = %hex::encode(root.hash())))]
pub fn generate_proof(root: &Node, n: u64, m: u64) -> Result<InclusionProof, MerkleError> {
    let mut path = Vec::new();
    let leaf = descend(root, n, m, Some(&mut path))?;
    debug!(path_len = path.len(), leaf = %leaf.name, "Generated inclusion proof");
    Ok(InclusionProof {
        leaf_index: m,
        tree_size: n,
        nonce: leaf.nonce,
        path,
    })
}

/// Find leaf `m` of a tree believed to hold `n` leaves
///
/// Fails the same way as [`generate_proof`].
pub fn locate_leaf(root: &Node, n: u64, m: u64) -> Result<&Leaf, MerkleError> {
    descend(root, n, m, None)
}

/// Walk from `node` down to leaf `m`, appending sibling hashes bottom-to-top
/// when a path is given.
fn descend<'a>(
    node: &'a Node,
    n: u64,
    m: u64,
    mut path: Option<&mut Vec<Hash>>,
) -> Result<&'a Leaf, MerkleError> {
    if m >= n {
        return Err(MerkleError::IndexOutOfRange { index: m, size: n });
    }
    if n == 1 {
        return node.as_leaf().ok_or_else(|| {
            MerkleError::TreeSizeMismatch("expected a leaf at subtree of size 1".to_string())
        });
    }

    let (left, right) = match (node.left(), node.right()) {
        (Some(left), Some(right)) => (left, right),
        _ => {
            return Err(MerkleError::TreeSizeMismatch(format!(
                "expected an internal node for subtree of size {}",
                n
            )))
        }
    };

    let k = flp2(n);
    let (leaf, sibling) = if m < k {
        (descend(left, k, m, path.as_deref_mut())?, right)
    } else {
        (descend(right, n - k, m - k, path.as_deref_mut())?, left)
    };
    // Appended after recursing, so the path reads bottom to top
    if let Some(path) = path {
        path.push(sibling.hash());
    }
    Ok(leaf)
}

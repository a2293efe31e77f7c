//! Proof verification: recompute a candidate root from a leaf and its audit path
//!
//! Verification never decides trust. It returns the root the proof leads to,
//! and the caller compares it against a root hash it already trusts.

use crate::error::MerkleError;
use crate::proof::{AuditStep, InclusionProof, Side};
use crate::tree::hasher::{hash_internal, hash_leaf};
use crate::tree::node::Leaf;
use crate::types::Hash;
use std::io::Read;
use tracing::{debug, trace};

/// Compute the candidate root for a proof and the proven file's bytes
///
/// The leaf hash is recomputed with the proof's nonce. An `Ok` result only
/// means a root could be computed; it says nothing about which tree the file
/// belongs to.
pub fn verify_proof<R: Read>(proof: &InclusionProof, reader: R) -> Result<Hash, MerkleError> {
    let leaf_hash = hash_leaf(reader, &proof.nonce)?;
    verify_proof_with_leaf_hash(proof, &leaf_hash)
}

/// Compute the candidate root for a proof from an already-computed leaf hash
pub fn verify_proof_with_leaf_hash(
    proof: &InclusionProof,
    leaf_hash: &Hash,
) -> Result<Hash, MerkleError> {
    let root = fold_audit_path(proof, leaf_hash, |_| {})?;
    debug!(
        leaf_index = proof.leaf_index,
        tree_size = proof.tree_size,
        candidate_root = %hex::encode(root),
        "Computed candidate root"
    );
    Ok(root)
}

/// List the combinations that take a leaf hash to the root, bottom to top
///
/// Uses the same fold as verification, so the steps always agree with it.
pub fn explain_proof(
    proof: &InclusionProof,
    leaf_hash: &Hash,
) -> Result<Vec<AuditStep>, MerkleError> {
    let mut steps = Vec::with_capacity(proof.path.len());
    fold_audit_path(proof, leaf_hash, |step| steps.push(step))?;
    Ok(steps)
}

/// Re-hash a byte stream with a leaf's nonce and compare with the stored hash
///
/// `false` means the content changed since the tree was built; it is not an
/// error.
pub fn leaf_matches<R: Read>(leaf: &Leaf, reader: R) -> Result<bool, MerkleError> {
    let hash = hash_leaf(reader, &leaf.nonce)?;
    Ok(hash == leaf.hash)
}

/// RFC 9162 §2.1.3.2 audit path fold
fn fold_audit_path<F>(
    proof: &InclusionProof,
    leaf_hash: &Hash,
    mut on_step: F,
) -> Result<Hash, MerkleError>
where
    F: FnMut(AuditStep),
{
    if proof.leaf_index >= proof.tree_size {
        return Err(MerkleError::IndexOutOfRange {
            index: proof.leaf_index,
            size: proof.tree_size,
        });
    }

    let mut fn_ = proof.leaf_index;
    let mut sn = proof.tree_size - 1;
    let mut r = *leaf_hash;

    for (i, p) in proof.path.iter().enumerate() {
        if sn == 0 {
            return Err(MerkleError::ProofSizeMismatch(format!(
                "path has more than the {} hashes allowed for leaf {} of {}",
                i,
                proof.leaf_index,
                proof.tree_size
            )));
        }

        let side = if fn_ & 1 == 1 || fn_ == sn {
            r = hash_internal(p, &r);
            // Skip levels where this node had no sibling (right edge of the tree)
            while fn_ & 1 == 0 && fn_ != 0 {
                fn_ >>= 1;
                sn >>= 1;
            }
            Side::Left
        } else {
            r = hash_internal(&r, p);
            Side::Right
        };
        trace!(?side, fn_, sn, "Folded audit path step");
        on_step(AuditStep {
            side,
            sibling: *p,
            result: r,
        });

        fn_ >>= 1;
        sn >>= 1;
    }

    if sn != 0 {
        return Err(MerkleError::ProofSizeMismatch(format!(
            "path of {} hashes is too short for leaf {} of {}",
            proof.path.len(),
            proof.leaf_index,
            proof.tree_size
        )));
    }
    Ok(r)
}

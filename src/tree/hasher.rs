//! Hash computation for tree nodes using BLAKE3
//!
//! Leaf and internal digests are domain separated by a one-byte prefix, as in
//! RFC 9162 §2.1.1, so a leaf hash can never be mistaken for an internal one.

use crate::error::MerkleError;
use crate::tree::node::{Leaf, Node};
use crate::types::{Hash, Nonce, NONCE_SIZE};
use blake3::Hasher;
use rand::rngs::OsRng;
use rand::RngCore;
use std::io::Read;
use tracing::trace;

/// Domain prefix for leaf digests
pub const LEAF_PREFIX: u8 = 0x00;

/// Domain prefix for internal node digests
pub const INTERNAL_PREFIX: u8 = 0x01;

/// Compute a leaf digest
///
/// digest = hash(0x00 || nonce || content)
///
/// The reader is streamed into the hasher, so memory use does not depend on
/// the content size.
pub fn hash_leaf<R: Read>(mut reader: R, nonce: &Nonce) -> Result<Hash, MerkleError> {
    let mut hasher = Hasher::new();
    hasher.update(&[LEAF_PREFIX]);
    hasher.update(nonce);
    let copied = std::io::copy(&mut reader, &mut hasher)?;
    trace!(bytes = copied, "Hashed leaf content");
    Ok(*hasher.finalize().as_bytes())
}

/// Compute an internal node digest
///
/// digest = hash(0x01 || left || right)
pub fn hash_internal(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(&[INTERNAL_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    *hasher.finalize().as_bytes()
}

/// Digest of the empty tree: hash of the empty byte string
pub fn empty_hash() -> Hash {
    *blake3::hash(&[]).as_bytes()
}

/// Generate a fresh 128-bit nonce from the operating system's CSPRNG
pub fn generate_nonce() -> Result<Nonce, MerkleError> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.try_fill_bytes(&mut nonce)?;
    Ok(nonce)
}

/// Create a leaf node for a named byte stream
///
/// A random nonce is generated when none is given. The nonce hides the plain
/// content hash, so a leaf digest alone does not reveal which known file it is.
pub fn create_leaf<R: Read>(
    name: impl Into<String>,
    reader: R,
    nonce: Option<Nonce>,
) -> Result<Node, MerkleError> {
    let nonce = match nonce {
        Some(nonce) => nonce,
        None => generate_nonce()?,
    };
    let hash = hash_leaf(reader, &nonce)?;
    Ok(Node::Leaf(Leaf {
        name: name.into(),
        nonce,
        hash,
    }))
}

/// Largest power of two strictly less than `n`
///
/// Only meaningful for `n >= 2`; this is the left subtree size at each split.
pub fn flp2(n: u64) -> u64 {
    debug_assert!(n >= 2, "flp2 requires at least two leaves");
    1u64 << (63 - (n - 1).leading_zeros())
}

//! Tree builder for combining ordered leaves into a Merkle tree
//!
//! Follows RFC 9162 §2.1.1: the left subtree at every split holds the largest
//! power of two strictly less than the number of leaves.

use crate::tree::hasher::flp2;
use crate::tree::node::Node;
use std::time::Instant;
use tracing::{debug, info};

/// Build a Merkle tree from leaves, in the order given
///
/// Zero leaves produce the empty-tree node. A single leaf is promoted to the
/// root without further hashing.
pub fn build_tree(leaves: Vec<Node>) -> Node {
    let start = Instant::now();
    let leaf_count = leaves.len();
    let root = build_subtree(leaves);
    info!(
        leaf_count,
        root_hash = %hex::encode(root.hash()),
        duration_ms = start.elapsed().as_millis(),
        "Tree build completed"
    );
    root
}

fn build_subtree(mut leaves: Vec<Node>) -> Node {
    match leaves.len() {
        0 => Node::empty(),
        1 => leaves.remove(0),
        n => {
            let k = flp2(n as u64) as usize;
            let right_leaves = leaves.split_off(k);
            debug!(size = n, split = k, "Splitting subtree");
            let left = build_subtree(leaves);
            let right = build_subtree(right_leaves);
            Node::internal(left, right)
        }
    }
}

//! Tree node types

use crate::tree::hasher;
use crate::types::{Hash, Nonce};

/// A hashed file: the only node kind that carries a name and nonce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    /// Relative file path within the source directory, `/`-separated
    pub name: String,
    /// Random value mixed into the leaf hash
    pub nonce: Nonce,
    pub hash: Hash,
}

/// Combination of two subtrees
///
/// Children are exclusively owned; trees are never shared or cyclic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Internal {
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub hash: Hash,
}

/// Merkle tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Root of a tree with zero leaves
    Empty,
    Leaf(Leaf),
    Internal(Internal),
}

impl Node {
    /// The canonical empty-tree node
    pub fn empty() -> Self {
        Node::Empty
    }

    /// Combine two subtrees into an internal node
    pub fn internal(left: Node, right: Node) -> Self {
        let hash = hasher::hash_internal(&left.hash(), &right.hash());
        Node::Internal(Internal {
            left: Box::new(left),
            right: Box::new(right),
            hash,
        })
    }

    pub fn hash(&self) -> Hash {
        match self {
            Node::Empty => hasher::empty_hash(),
            Node::Leaf(leaf) => leaf.hash,
            Node::Internal(internal) => internal.hash,
        }
    }

    /// File name, for leaves only
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Leaf(leaf) => Some(&leaf.name),
            _ => None,
        }
    }

    /// Leaf nonce, for leaves only
    pub fn nonce(&self) -> Option<&Nonce> {
        match self {
            Node::Leaf(leaf) => Some(&leaf.nonce),
            _ => None,
        }
    }

    pub fn left(&self) -> Option<&Node> {
        match self {
            Node::Internal(internal) => Some(&internal.left),
            _ => None,
        }
    }

    pub fn right(&self) -> Option<&Node> {
        match self {
            Node::Internal(internal) => Some(&internal.right),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Number of leaves below (and including) this node
    pub fn leaf_count(&self) -> u64 {
        match self {
            Node::Empty => 0,
            Node::Leaf(_) => 1,
            Node::Internal(internal) => internal.left.leaf_count() + internal.right.leaf_count(),
        }
    }
}

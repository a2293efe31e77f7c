//! Directory Merkle Tree
//!
//! Hashes every file of a directory into a leaf and combines the leaves, in
//! walk order, into a single root as described by RFC 9162 §2.1.

pub mod builder;
pub mod dot;
pub mod hasher;
pub mod node;
pub mod path;
pub mod walker;

pub use builder::build_tree;
pub use hasher::{create_leaf, hash_leaf};
pub use node::{Internal, Leaf, Node};

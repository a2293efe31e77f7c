//! Core types for directory Merkle trees.

/// Hash: 256-bit BLAKE3 digest
pub type Hash = [u8; 32];

/// Nonce: random value mixed into a leaf hash
pub type Nonce = [u8; 16];

/// Size of a digest in bytes
pub const HASH_SIZE: usize = 32;

/// Size of a leaf nonce in bytes (128 bits)
pub const NONCE_SIZE: usize = 16;

//! Container format for tree and proof files
//!
//! Layout: the ASCII magic `merkdir`, one version byte, then a single CBOR
//! value. Field names and value shapes follow the established on-disk layout
//! so existing files stay readable:
//!
//! - tree: `{Path, Files, CreatedAt (unix seconds), Root}`
//! - node: `{Hash, Name?, Left?, Right?, Nonce?}` with absent fields omitted
//! - proof: `{LeafIndex, TreeSize, Nonce, Proof}`
//!
//! Node shape is recovered from which fields are present.

use crate::error::ApiError;
use crate::proof::InclusionProof;
use crate::store::TreeFile;
use crate::tree::hasher::{empty_hash, hash_internal};
use crate::tree::node::{Internal, Leaf, Node};
use crate::types::{Hash, Nonce};
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_bytes::{ByteBuf, Bytes};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Magic bytes at the start of every container
pub const MAGIC: &[u8] = b"merkdir";

/// Current container version. Version 0 is reserved as invalid.
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = MAGIC.len() + 1;

fn write_header<W: Write>(w: &mut W) -> Result<(), ApiError> {
    w.write_all(MAGIC)?;
    w.write_all(&[FORMAT_VERSION])?;
    Ok(())
}

fn read_header<R: Read>(r: &mut R) -> Result<(), ApiError> {
    let mut header = [0u8; HEADER_LEN];
    r.read_exact(&mut header).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => {
            ApiError::InvalidContainer("file is shorter than the header".to_string())
        }
        _ => ApiError::Io(e),
    })?;

    if &header[..MAGIC.len()] != MAGIC {
        return Err(ApiError::InvalidContainer("invalid file header".to_string()));
    }
    match header[MAGIC.len()] {
        FORMAT_VERSION => Ok(()),
        0 => Err(ApiError::InvalidContainer(
            "version 0 is reserved and never valid".to_string(),
        )),
        other => Err(ApiError::InvalidContainer(format!(
            "unsupported version {} (expected {})",
            other, FORMAT_VERSION
        ))),
    }
}

/// Borrowed view of a node for encoding
struct NodeOut<'a>(&'a Node);

impl Serialize for NodeOut<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Node::Empty => {
                let hash = empty_hash();
                let mut state = serializer.serialize_struct("Node", 1)?;
                state.serialize_field("Hash", Bytes::new(&hash))?;
                state.end()
            }
            Node::Leaf(leaf) => {
                let mut state = serializer.serialize_struct("Node", 3)?;
                state.serialize_field("Hash", Bytes::new(&leaf.hash))?;
                state.serialize_field("Name", &leaf.name)?;
                state.serialize_field("Nonce", Bytes::new(&leaf.nonce))?;
                state.end()
            }
            Node::Internal(internal) => {
                let mut state = serializer.serialize_struct("Node", 3)?;
                state.serialize_field("Hash", Bytes::new(&internal.hash))?;
                state.serialize_field("Left", &NodeOut(&internal.left))?;
                state.serialize_field("Right", &NodeOut(&internal.right))?;
                state.end()
            }
        }
    }
}

#[derive(Deserialize)]
struct NodeRecord {
    #[serde(rename = "Hash")]
    hash: ByteBuf,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Left", default)]
    left: Option<Box<NodeRecord>>,
    #[serde(rename = "Right", default)]
    right: Option<Box<NodeRecord>>,
    #[serde(rename = "Nonce", default)]
    nonce: Option<ByteBuf>,
}

fn to_hash(bytes: &[u8]) -> Result<Hash, ApiError> {
    bytes.try_into().map_err(|_| {
        ApiError::InvalidContainer(format!("hash has {} bytes, expected 32", bytes.len()))
    })
}

fn to_nonce(bytes: &[u8]) -> Result<Nonce, ApiError> {
    bytes.try_into().map_err(|_| {
        ApiError::InvalidContainer(format!("nonce has {} bytes, expected 16", bytes.len()))
    })
}

impl TryFrom<NodeRecord> for Node {
    type Error = ApiError;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        let hash = to_hash(&record.hash)?;
        match (record.name, record.nonce, record.left, record.right) {
            (Some(name), Some(nonce), None, None) => Ok(Node::Leaf(Leaf {
                name,
                nonce: to_nonce(&nonce)?,
                hash,
            })),
            (None, None, Some(left), Some(right)) => {
                let left = Node::try_from(*left)?;
                let right = Node::try_from(*right)?;
                if hash_internal(&left.hash(), &right.hash()) != hash {
                    return Err(ApiError::InvalidContainer(
                        "internal node hash does not match its children".to_string(),
                    ));
                }
                Ok(Node::Internal(Internal {
                    left: Box::new(left),
                    right: Box::new(right),
                    hash,
                }))
            }
            (None, None, None, None) => {
                if hash != empty_hash() {
                    return Err(ApiError::InvalidContainer(
                        "childless node without a name is not the empty tree".to_string(),
                    ));
                }
                Ok(Node::Empty)
            }
            _ => Err(ApiError::InvalidContainer(
                "node is neither a leaf nor an internal node".to_string(),
            )),
        }
    }
}

#[derive(Serialize)]
struct TreeOut<'a> {
    #[serde(rename = "Path")]
    path: Cow<'a, str>,
    #[serde(rename = "Files")]
    files: &'a BTreeMap<String, u64>,
    #[serde(rename = "CreatedAt", with = "chrono::serde::ts_seconds")]
    created_at: DateTime<Utc>,
    #[serde(rename = "Root")]
    root: NodeOut<'a>,
}

#[derive(Deserialize)]
struct TreeRecord {
    #[serde(rename = "Path")]
    path: String,
    #[serde(rename = "Files")]
    files: BTreeMap<String, u64>,
    #[serde(rename = "CreatedAt", with = "chrono::serde::ts_seconds")]
    created_at: DateTime<Utc>,
    #[serde(rename = "Root")]
    root: NodeRecord,
}

#[derive(Serialize)]
struct ProofOut<'a> {
    #[serde(rename = "LeafIndex")]
    leaf_index: u64,
    #[serde(rename = "TreeSize")]
    tree_size: u64,
    #[serde(rename = "Nonce")]
    nonce: &'a Bytes,
    #[serde(rename = "Proof")]
    path: Vec<&'a Bytes>,
}

#[derive(Deserialize)]
struct ProofRecord {
    #[serde(rename = "LeafIndex")]
    leaf_index: u64,
    #[serde(rename = "TreeSize")]
    tree_size: u64,
    #[serde(rename = "Nonce")]
    nonce: ByteBuf,
    #[serde(rename = "Proof")]
    path: Vec<ByteBuf>,
}

/// Encode a tree file into a container
pub fn encode_tree<W: Write>(tree: &TreeFile, mut w: W) -> Result<(), ApiError> {
    write_header(&mut w)?;
    let record = TreeOut {
        path: tree.path.to_string_lossy(),
        files: &tree.files,
        created_at: tree.created_at,
        root: NodeOut(&tree.root),
    };
    ciborium::ser::into_writer(&record, &mut w).map_err(|e| ApiError::Encode(e.to_string()))?;
    w.flush()?;
    Ok(())
}

/// Decode a tree file from a container
pub fn decode_tree<R: Read>(mut r: R) -> Result<TreeFile, ApiError> {
    read_header(&mut r)?;
    let record: TreeRecord =
        ciborium::de::from_reader(&mut r).map_err(|e| ApiError::Decode(e.to_string()))?;
    let root = Node::try_from(record.root)?;

    let leaf_count = root.leaf_count();
    if leaf_count != record.files.len() as u64 {
        return Err(ApiError::InvalidContainer(format!(
            "tree has {} leaves but maps {} files",
            leaf_count,
            record.files.len()
        )));
    }

    Ok(TreeFile {
        path: PathBuf::from(record.path),
        files: record.files,
        created_at: record.created_at,
        root,
    })
}

/// Encode an inclusion proof into a container
pub fn encode_proof<W: Write>(proof: &InclusionProof, mut w: W) -> Result<(), ApiError> {
    write_header(&mut w)?;
    let record = ProofOut {
        leaf_index: proof.leaf_index,
        tree_size: proof.tree_size,
        nonce: Bytes::new(&proof.nonce),
        path: proof.path.iter().map(|h| Bytes::new(h)).collect(),
    };
    ciborium::ser::into_writer(&record, &mut w).map_err(|e| ApiError::Encode(e.to_string()))?;
    w.flush()?;
    Ok(())
}

/// Decode an inclusion proof from a container
pub fn decode_proof<R: Read>(mut r: R) -> Result<InclusionProof, ApiError> {
    read_header(&mut r)?;
    let record: ProofRecord =
        ciborium::de::from_reader(&mut r).map_err(|e| ApiError::Decode(e.to_string()))?;
    let path = record
        .path
        .iter()
        .map(|h| to_hash(h))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(InclusionProof {
        leaf_index: record.leaf_index,
        tree_size: record.tree_size,
        nonce: to_nonce(&record.nonce)?,
        path,
    })
}

/// Write a tree file to disk, replacing any existing file
#[instrument(skip_all, fields(path = %path.display()))]
pub fn write_tree(tree: &TreeFile, path: &Path) -> Result<(), ApiError> {
    let file = File::create(path)?;
    encode_tree(tree, BufWriter::new(file))?;
    debug!(tree_size = tree.tree_size(), "Wrote tree file");
    Ok(())
}

/// Read a tree file from disk
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_tree(path: &Path) -> Result<TreeFile, ApiError> {
    let file = File::open(path)?;
    let tree = decode_tree(BufReader::new(file))?;
    debug!(tree_size = tree.tree_size(), "Read tree file");
    Ok(tree)
}

/// Write an inclusion proof to disk, replacing any existing file
pub fn write_proof(proof: &InclusionProof, path: &Path) -> Result<(), ApiError> {
    let file = File::create(path)?;
    encode_proof(proof, BufWriter::new(file))
}

/// Read an inclusion proof from disk
pub fn read_proof(path: &Path) -> Result<InclusionProof, ApiError> {
    let file = File::open(path)?;
    decode_proof(BufReader::new(file))
}

//! CLI presentation: text and JSON rendering of command results.

use crate::error::ApiError;
use crate::proof::{explain_proof, InclusionProof, Side};
use crate::store::TreeFile;
use crate::tree::node::Leaf;
use crate::types::Hash;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::fmt::Write;

fn fmt_err(e: std::fmt::Error) -> ApiError {
    ApiError::Encode(e.to_string())
}

fn json_string(value: &serde_json::Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::Encode(e.to_string()))
}

fn two_column_table(rows: Vec<(&str, String)>) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    for (field, value) in rows {
        table.add_row(vec![field.to_string(), value]);
    }
    table.to_string()
}

/// Human-readable walk from a file's leaf digest up to the root hash
///
/// `leaf_hash` is the stored leaf digest of `name`.
pub fn format_proof_explanation(
    tree: &TreeFile,
    name: &str,
    proof: &InclusionProof,
    leaf_hash: &Hash,
) -> Result<String, ApiError> {
    let steps = explain_proof(proof, leaf_hash)?;

    let mut out = String::new();
    writeln!(out, "== Text explanation of inclusion proof ==").map_err(fmt_err)?;
    writeln!(out, "Tree size: {}", proof.tree_size).map_err(fmt_err)?;
    writeln!(
        out,
        "Provided file ({}) corresponds to leaf index {}",
        name, proof.leaf_index
    )
    .map_err(fmt_err)?;
    writeln!(out, "Tree root hash: {}", hex::encode(tree.root_hash())).map_err(fmt_err)?;
    writeln!(out, "File nonce: {}", hex::encode(proof.nonce)).map_err(fmt_err)?;
    writeln!(out, "Operations to calculate that root hash:").map_err(fmt_err)?;
    writeln!(out, "digest = hash(0x00 || nonce || file data)").map_err(fmt_err)?;
    for step in &steps {
        let sibling = hex::encode(step.sibling);
        let line = match step.side {
            Side::Left => writeln!(out, "digest = hash(0x01 || {} || digest)", sibling),
            Side::Right => writeln!(out, "digest = hash(0x01 || digest || {})", sibling),
        };
        line.map_err(fmt_err)?;
    }
    let matches = steps
        .last()
        .map(|s| s.result)
        .unwrap_or(*leaf_hash)
        == tree.root_hash();
    if matches {
        write!(out, "Final digest equals the tree root hash").map_err(fmt_err)?;
    } else {
        write!(out, "Final digest does not equal the tree root hash").map_err(fmt_err)?;
    }
    Ok(out)
}

/// Summary of a tree file
pub fn format_tree_info(tree: &TreeFile, format: &str) -> Result<String, ApiError> {
    let root_hash = hex::encode(tree.root_hash());
    let created_at = tree.created_at.to_rfc3339();
    if format == "json" {
        return json_string(&serde_json::json!({
            "root_hash": root_hash,
            "path": tree.path,
            "files": tree.tree_size(),
            "created_at": created_at,
        }));
    }
    Ok(two_column_table(vec![
        ("Root hash", root_hash),
        ("FS root", tree.path.display().to_string()),
        ("Num. of files", tree.tree_size().to_string()),
        ("Creation time", created_at),
    ]))
}

/// Summary of an inclusion proof, with the file name taken from its tree
pub fn format_proof_info(
    proof: &InclusionProof,
    leaf: &Leaf,
    format: &str,
) -> Result<String, ApiError> {
    if format == "json" {
        return json_string(&serde_json::json!({
            "leaf_index": proof.leaf_index,
            "tree_size": proof.tree_size,
            "name": leaf.name,
            "nonce": hex::encode(proof.nonce),
            "proof_length": proof.path.len(),
        }));
    }
    Ok(two_column_table(vec![
        ("File index", proof.leaf_index.to_string()),
        ("File name", leaf.name.clone()),
        ("Nonce", hex::encode(proof.nonce)),
        ("Proof length", format!("{} hashes", proof.path.len())),
    ]))
}

/// OK / NOT OK line, coloured when `color` is set
pub fn format_verdict(ok: bool, message: &str, color: bool) -> String {
    let line = if ok {
        format!("OK: {}", message)
    } else {
        format!("NOT OK: {}", message)
    };
    match (color, ok) {
        (false, _) => line,
        (true, true) => line.green().to_string(),
        (true, false) => line.red().to_string(),
    }
}

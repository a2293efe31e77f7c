//! DOT (graphviz) rendering of a tree

use crate::tree::node::Node;
use std::io::{self, Write};

/// Label for a node: the file name for leaves, otherwise a short hash prefix
fn dot_label(node: &Node) -> String {
    match node.name() {
        Some(name) => escape(name),
        None => hex::encode(&node.hash()[..3]),
    }
}

/// Escape a name for use inside a double-quoted DOT ID
fn escape(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn write_edges<W: Write>(node: &Node, w: &mut W) -> io::Result<()> {
    let parent = dot_label(node);
    for child in [node.left(), node.right()].into_iter().flatten() {
        writeln!(w, "\"{}\" -> \"{}\"", parent, dot_label(child))?;
        write_edges(child, w)?;
    }
    Ok(())
}

impl Node {
    /// Write a directed graph of this subtree in the DOT language
    ///
    /// Edges are written depth first, left before right.
    pub fn write_dot<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "digraph \"{}\" {{", hex::encode(self.hash()))?;
        write_edges(self, w)?;
        write!(w, "}}")
    }
}

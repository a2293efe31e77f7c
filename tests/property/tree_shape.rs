//! Structural properties of built trees

use merkdir::tree::builder::build_tree;
use merkdir::tree::hasher::{create_leaf, flp2, hash_internal};
use merkdir::tree::node::Node;
use proptest::prelude::*;

fn leaves(n: usize) -> Vec<Node> {
    (0..n)
        .map(|i| create_leaf(format!("leaf{}", i), &[i as u8][..], Some([0u8; 16])).unwrap())
        .collect()
}

fn check_shape(node: &Node, n: u64) -> Result<(), TestCaseError> {
    prop_assert_eq!(node.leaf_count(), n);
    if n == 1 {
        prop_assert!(node.is_leaf());
        return Ok(());
    }
    let (left, right) = (node.left().unwrap(), node.right().unwrap());
    prop_assert_eq!(node.hash(), hash_internal(&left.hash(), &right.hash()));

    let k = flp2(n);
    check_shape(left, k)?;
    check_shape(right, n - k)
}

/// Left subtrees always hold the largest power of two below the size
#[test]
fn test_split_point_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(1usize..200), |n| {
            let root = build_tree(leaves(n));
            check_shape(&root, n as u64)
        })
        .unwrap();
}

/// Leaves appear left to right in input order
#[test]
fn test_leaf_order_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(1usize..200), |n| {
            let root = build_tree(leaves(n));
            let mut names = Vec::new();
            collect_names(&root, &mut names);
            let expected: Vec<String> = (0..n).map(|i| format!("leaf{}", i)).collect();
            prop_assert_eq!(names, expected);
            Ok(())
        })
        .unwrap();
}

fn collect_names(node: &Node, out: &mut Vec<String>) {
    if let Some(name) = node.name() {
        out.push(name.to_string());
    }
    for child in [node.left(), node.right()].into_iter().flatten() {
        collect_names(child, out);
    }
}

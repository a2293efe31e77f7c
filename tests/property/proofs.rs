//! Round-trip and tamper properties of inclusion proofs

use merkdir::error::MerkleError;
use merkdir::proof::{
    explain_proof, generate_proof, locate_leaf, verify_proof, verify_proof_with_leaf_hash,
    InclusionProof, Side,
};
use merkdir::tree::builder::build_tree;
use merkdir::tree::hasher::create_leaf;
use merkdir::tree::node::Node;
use proptest::prelude::*;

fn tree_of(n: usize, seed: u8) -> (Node, Vec<Vec<u8>>) {
    let contents: Vec<Vec<u8>> = (0..n)
        .map(|i| format!("{}:{}", seed, i).into_bytes())
        .collect();
    let leaves = contents
        .iter()
        .enumerate()
        .map(|(i, c)| create_leaf(format!("f{}", i), c.as_slice(), Some([seed; 16])).unwrap())
        .collect();
    (build_tree(leaves), contents)
}

fn size_and_index() -> impl Strategy<Value = (u64, u64)> {
    (1u64..300).prop_flat_map(|n| (Just(n), 0..n))
}

/// Every leaf of every tree size proves back to the root
#[test]
fn test_proof_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(size_and_index(), any::<u8>()), |((n, m), seed)| {
            let (root, contents) = tree_of(n as usize, seed);
            let proof = generate_proof(&root, n, m).unwrap();
            let candidate = verify_proof(&proof, contents[m as usize].as_slice()).unwrap();
            prop_assert_eq!(candidate, root.hash());
            Ok(())
        })
        .unwrap();
}

/// Flipping any bit of any path element changes the computed root
#[test]
fn test_tampered_path_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(size_and_index(), any::<prop::sample::Index>(), 0usize..256),
            |((n, m), element, bit)| {
                prop_assume!(n > 1);
                let (root, contents) = tree_of(n as usize, 1);
                let mut proof = generate_proof(&root, n, m).unwrap();
                let i = element.index(proof.path.len());
                proof.path[i][bit / 8] ^= 1 << (bit % 8);

                let candidate = verify_proof(&proof, contents[m as usize].as_slice()).unwrap();
                prop_assert_ne!(candidate, root.hash());
                Ok(())
            },
        )
        .unwrap();
}

/// A proof for one leaf never verifies another leaf's content
#[test]
fn test_proof_binds_content_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(size_and_index(), any::<prop::sample::Index>()), |((n, m), other)| {
            let (root, contents) = tree_of(n as usize, 2);
            let other = other.index(n as usize);
            prop_assume!(other as u64 != m);

            let proof = generate_proof(&root, n, m).unwrap();
            let candidate = verify_proof(&proof, contents[other].as_slice()).unwrap();
            prop_assert_ne!(candidate, root.hash());
            Ok(())
        })
        .unwrap();
}

/// The last leaf only has siblings at levels where it descends to the
/// right of a split, so the fold must skip the levels above it where it
/// sits alone on the right edge. Its path length is popcount(n - 1).
#[test]
fn test_last_leaf_path_length_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(2u64..1000), |n| {
            let (root, _) = tree_of(n as usize, 3);
            let proof = generate_proof(&root, n, n - 1).unwrap();
            prop_assert_eq!(proof.path.len() as u32, (n - 1).count_ones());

            let leaf_hash = locate_leaf(&root, n, n - 1).unwrap().hash;
            let steps = explain_proof(&proof, &leaf_hash).unwrap();
            prop_assert_eq!(steps.len(), proof.path.len());
            prop_assert_eq!(
                verify_proof_with_leaf_hash(&proof, &leaf_hash).unwrap(),
                root.hash()
            );
            Ok(())
        })
        .unwrap();
}

/// Path lengths never exceed the tree height and shrinking the path is
/// always detected
#[test]
fn test_truncated_path_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&size_and_index(), |(n, m)| {
            prop_assume!(n > 1);
            let (root, contents) = tree_of(n as usize, 4);
            let mut proof = generate_proof(&root, n, m).unwrap();
            let height = 64 - (n - 1).leading_zeros();
            prop_assert!(proof.path.len() as u32 <= height);

            proof.path.pop();
            let result = verify_proof(&proof, contents[m as usize].as_slice());
            prop_assert!(matches!(result, Err(MerkleError::ProofSizeMismatch(_))));
            Ok(())
        })
        .unwrap();
}

/// Moving a proof to another leaf index of the same tree is always detected
#[test]
fn test_tampered_leaf_index_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(size_and_index(), any::<prop::sample::Index>()), |((n, m), other)| {
            let other = other.index(n as usize) as u64;
            prop_assume!(other != m);
            let (root, contents) = tree_of(n as usize, 5);
            let mut proof = generate_proof(&root, n, m).unwrap();
            proof.leaf_index = other;

            match verify_proof(&proof, contents[m as usize].as_slice()) {
                Ok(candidate) => prop_assert_ne!(candidate, root.hash()),
                Err(e) => prop_assert!(matches!(e, MerkleError::ProofSizeMismatch(_))),
            }
            Ok(())
        })
        .unwrap();
}

/// Changing the tree size is detected unless the forged size folds the path
/// with exactly the same sides, in which case it describes the same position
#[test]
fn test_tampered_tree_size_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(size_and_index(), 1u64..600), |((n, m), forged)| {
            prop_assume!(forged > m && forged != n);
            let (root, contents) = tree_of(n as usize, 6);
            let proof = generate_proof(&root, n, m).unwrap();
            let mut tampered = proof.clone();
            tampered.tree_size = forged;

            match verify_proof(&tampered, contents[m as usize].as_slice()) {
                Ok(candidate) if candidate == root.hash() => {
                    let leaf_hash = locate_leaf(&root, n, m).unwrap().hash;
                    let sides = |p: &InclusionProof| -> Vec<Side> {
                        explain_proof(p, &leaf_hash)
                            .unwrap()
                            .into_iter()
                            .map(|step| step.side)
                            .collect()
                    };
                    prop_assert_eq!(sides(&tampered), sides(&proof));
                }
                Ok(_) => {}
                Err(e) => prop_assert!(matches!(e, MerkleError::ProofSizeMismatch(_))),
            }
            Ok(())
        })
        .unwrap();
}

/// The first leaf of a four-leaf tree folds right twice, exactly as in a
/// three-leaf tree, so the tree size alone is not bound by the path
#[test]
fn test_tree_size_with_identical_fold_reaches_same_root() {
    let (root, contents) = tree_of(4, 7);
    let mut proof = generate_proof(&root, 4, 0).unwrap();
    proof.tree_size = 3;
    assert_eq!(verify_proof(&proof, contents[0].as_slice()).unwrap(), root.hash());

    proof.tree_size = 5;
    assert!(matches!(
        verify_proof(&proof, contents[0].as_slice()),
        Err(MerkleError::ProofSizeMismatch(_))
    ));
}

//! Generic binary Merkle tree builder, used to compute `ValidatorSet`'s
//! canonical root over its ordered validator encodings.
//!
//! The receipt-path verifier used to check account inclusion against a
//! previously-issued anchor lives in `verity-layers::merkle` — it walks a
//! caller-supplied `(sibling, side)` path rather than building a tree from
//! scratch, since receipts are not required to originate from a balanced
//! tree built by this crate.

use crate::Hash;

/// Merkle inclusion proof for a leaf in a binary Merkle tree built by
/// [`build_merkle_tree_with_proofs`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleProof {
    /// Index of the leaf in the tree (0-based).
    pub leaf_index: u32,

    /// Sibling hashes from leaf to root.
    pub siblings: Vec<Hash>,
}

impl MerkleProof {
    /// Verify that `leaf_hash` is included in `root` at `leaf_index`.
    pub fn verify(&self, leaf_hash: &Hash, root: &Hash) -> bool {
        let mut current = *leaf_hash;
        let mut index = self.leaf_index;

        for sibling in &self.siblings {
            current = if index.is_multiple_of(2) {
                Hash::pair(&current, sibling)
            } else {
                Hash::pair(sibling, &current)
            };
            index /= 2;
        }

        current == *root
    }

    /// Depth of the tree this proof is for.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }
}

/// Compute just the root over `leaves`, in order, without proofs.
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    build_merkle_tree_with_proofs(leaves).0
}

/// Build a Merkle tree from leaf hashes and generate proofs for all leaves.
///
/// Returns the Merkle root and a proof for each leaf (in the same order as input).
///
/// Leaves are padded to the next power of 2 with zero hashes before the tree
/// is built bottom-up.
///
/// # Panics
///
/// Panics if `leaves` is empty.
pub fn build_merkle_tree_with_proofs(leaves: &[Hash]) -> (Hash, Vec<MerkleProof>) {
    assert!(
        !leaves.is_empty(),
        "Cannot build Merkle tree with no leaves"
    );

    if leaves.len() == 1 {
        return (
            leaves[0],
            vec![MerkleProof {
                leaf_index: 0,
                siblings: vec![],
            }],
        );
    }

    let n = leaves.len().next_power_of_two();
    let depth = n.trailing_zeros() as usize;

    // Layout: [leaves (n), level 1 (n/2), level 2 (n/4), ..., root (1)]
    let mut tree = vec![Hash::ZERO; 2 * n - 1];
    tree[..leaves.len()].copy_from_slice(leaves);

    let mut level_start = 0;
    let mut level_size = n;

    for _ in 0..depth {
        let next_level_start = level_start + level_size;
        let next_level_size = level_size / 2;

        for i in 0..next_level_size {
            let left = &tree[level_start + 2 * i];
            let right = &tree[level_start + 2 * i + 1];
            tree[next_level_start + i] = Hash::pair(left, right);
        }

        level_start = next_level_start;
        level_size = next_level_size;
    }

    let root = tree[tree.len() - 1];

    let proofs: Vec<MerkleProof> = (0..leaves.len())
        .map(|leaf_idx| {
            let mut siblings = Vec::with_capacity(depth);
            let mut level_start = 0;
            let mut level_size = n;
            let mut idx = leaf_idx;

            for _ in 0..depth {
                let sibling_idx = if idx % 2 == 0 { idx + 1 } else { idx - 1 };
                siblings.push(tree[level_start + sibling_idx]);

                level_start += level_size;
                level_size /= 2;
                idx /= 2;
            }

            MerkleProof {
                leaf_index: leaf_idx as u32,
                siblings,
            }
        })
        .collect();

    (root, proofs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_leaf() {
        let leaf = Hash::from_bytes(b"single leaf");
        let (root, proofs) = build_merkle_tree_with_proofs(&[leaf]);

        assert_eq!(root, leaf);
        assert_eq!(proofs.len(), 1);
        assert!(proofs[0].verify(&leaf, &root));
    }

    #[test]
    fn test_two_leaves() {
        let leaf0 = Hash::from_bytes(b"leaf 0");
        let leaf1 = Hash::from_bytes(b"leaf 1");
        let (root, proofs) = build_merkle_tree_with_proofs(&[leaf0, leaf1]);

        let expected_root = Hash::pair(&leaf0, &leaf1);
        assert_eq!(root, expected_root);

        assert_eq!(proofs.len(), 2);
        assert!(proofs[0].verify(&leaf0, &root));
        assert!(proofs[1].verify(&leaf1, &root));
        assert_eq!(proofs[0].depth(), 1);
    }

    #[test]
    fn test_four_leaves() {
        let leaves: Vec<Hash> = (0..4).map(|i| Hash::from_bytes(&[i])).collect();
        let (root, proofs) = build_merkle_tree_with_proofs(&leaves);

        for (i, (proof, leaf)) in proofs.iter().zip(leaves.iter()).enumerate() {
            assert!(proof.verify(leaf, &root), "Proof {} failed to verify", i);
            assert_eq!(proof.leaf_index, i as u32);
            assert_eq!(proof.depth(), 2);
        }
    }

    #[test]
    fn test_non_power_of_two_leaves() {
        let leaves: Vec<Hash> = (0..5).map(|i| Hash::from_bytes(&[i])).collect();
        let (root, proofs) = build_merkle_tree_with_proofs(&leaves);

        assert_eq!(proofs.len(), 5);
        for (proof, leaf) in proofs.iter().zip(leaves.iter()) {
            assert!(proof.verify(leaf, &root));
            assert_eq!(proof.depth(), 3);
        }
    }

    #[test]
    fn test_proof_rejects_wrong_leaf() {
        let leaves: Vec<Hash> = (0..4).map(|i| Hash::from_bytes(&[i])).collect();
        let (root, proofs) = build_merkle_tree_with_proofs(&leaves);

        assert!(!proofs[0].verify(&leaves[1], &root));
    }

    #[test]
    fn test_merkle_root_matches_tree_root() {
        let leaves: Vec<Hash> = (0..7).map(|i| Hash::from_bytes(&[i])).collect();
        let (root, _) = build_merkle_tree_with_proofs(&leaves);
        assert_eq!(merkle_root(&leaves), root);
    }

    #[test]
    #[should_panic(expected = "Cannot build Merkle tree with no leaves")]
    fn test_empty_leaves_panics() {
        build_merkle_tree_with_proofs(&[]);
    }
}

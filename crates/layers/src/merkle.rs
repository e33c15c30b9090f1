//! C2 — the generic Merkle receipt verifier (spec §4.2).
//!
//! Grounded on the teacher's `MerkleProof::verify` loop shape
//! (`verity-types::merkle`), generalized from a fixed-index binary tree
//! proof to an explicit per-entry `Side`, since a receipt here is not
//! required to come from a tree this crate built.

use verity_types::{Hash, Receipt, Side};

/// Evaluate `receipt.path` starting from `leaf`, returning whether the
/// result equals `receipt.anchor` byte-for-byte.
///
/// An empty path is a valid edge case: the running hash is `leaf` itself,
/// so the receipt verifies iff `leaf == receipt.anchor`.
pub fn verify_receipt(leaf: Hash, receipt: &Receipt) -> bool {
    evaluate_path(leaf, receipt) == receipt.anchor
}

/// Evaluate the path without comparing to the anchor — exposed so callers
/// needing the intermediate running hash (e.g. stitching) don't have to
/// re-derive it.
pub fn evaluate_path(leaf: Hash, receipt: &Receipt) -> Hash {
    let mut running = leaf;
    for entry in &receipt.path {
        running = match entry.side {
            Side::Right => Hash::pair(&running, &entry.hash),
            Side::Left => Hash::pair(&entry.hash, &running),
        };
    }
    running
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_types::ReceiptEntry;

    fn receipt(path: Vec<ReceiptEntry>, anchor: Hash) -> Receipt {
        Receipt::new(path, anchor, 0)
    }

    #[test]
    fn empty_path_verifies_iff_leaf_equals_anchor() {
        let leaf = Hash::from_bytes(b"leaf");
        let r = receipt(vec![], leaf);
        assert!(verify_receipt(leaf, &r));

        let other = receipt(vec![], Hash::from_bytes(b"other"));
        assert!(!verify_receipt(leaf, &other));
    }

    #[test]
    fn two_step_path_matches_manual_hashing() {
        let leaf = Hash::from_bytes(b"leaf");
        let sib1 = Hash::from_bytes(b"sib1");
        let sib2 = Hash::from_bytes(b"sib2");

        // leaf is left child of sib1 (sib1 on the right), then the result
        // is the right child of sib2 (sib2 on the left).
        let step1 = Hash::pair(&leaf, &sib1);
        let expected_anchor = Hash::pair(&sib2, &step1);

        let r = receipt(
            vec![
                ReceiptEntry::new(sib1, Side::Right),
                ReceiptEntry::new(sib2, Side::Left),
            ],
            expected_anchor,
        );
        assert!(verify_receipt(leaf, &r));
    }

    #[test]
    fn bit_flip_in_last_entry_breaks_verification() {
        let leaf = Hash::from_bytes(b"leaf");
        let sib1 = Hash::from_bytes(b"sib1");
        let sib2 = Hash::from_bytes(b"sib2");
        let step1 = Hash::pair(&leaf, &sib1);
        let anchor = Hash::pair(&sib2, &step1);

        let flipped_sib2 = Hash::from_bytes(b"sib2-flipped");
        let r = receipt(
            vec![
                ReceiptEntry::new(sib1, Side::Right),
                ReceiptEntry::new(flipped_sib2, Side::Left),
            ],
            anchor,
        );
        assert!(!verify_receipt(leaf, &r));
    }

    proptest::proptest! {
        #[test]
        fn verify_receipt_agrees_with_evaluate_path(
            leaf_bytes: [u8; 32],
            anchor_bytes: [u8; 32],
        ) {
            let leaf = Hash::from_hash_bytes(&leaf_bytes);
            let anchor = Hash::from_hash_bytes(&anchor_bytes);
            let r = receipt(vec![], anchor);
            prop_assert_eq!(verify_receipt(leaf, &r), evaluate_path(leaf, &r) == r.anchor);
        }
    }
}

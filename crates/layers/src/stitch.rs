//! C7 — the receipt stitcher (spec §4.8).
//!
//! Joins are checked by raw byte equality only — never hashing, never
//! hex-string comparison.

use verity_types::{Hash, Receipt, VerifyError};

/// Compose two consecutive receipts into one, enforcing `r2.leaf == r1.anchor`.
///
/// The caller supplies `r1_leaf` explicitly since `Receipt` does not carry
/// its own leaf (the leaf is derived by whichever layer produced the
/// receipt, e.g. L1's account hash).
pub fn stitch(r1_leaf: Hash, r1: &Receipt, r2_leaf: Hash, r2: &Receipt) -> Result<Receipt, VerifyError> {
    if r2_leaf != r1.anchor {
        return Err(VerifyError::MalformedInput(
            "receipt stitching requires r2's leaf to equal r1's anchor byte-for-byte".into(),
        ));
    }

    let mut path = r1.path.clone();
    path.extend(r2.path.iter().copied());

    Ok(Receipt::new(path, r2.anchor, r1.origin_block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_types::{ReceiptEntry, Side};

    fn leaf_receipt(leaf: Hash, sib: Hash, side: Side) -> (Hash, Receipt) {
        let anchor = match side {
            Side::Right => Hash::pair(&leaf, &sib),
            Side::Left => Hash::pair(&sib, &leaf),
        };
        (leaf, Receipt::new(vec![ReceiptEntry::new(sib, side)], anchor, 0))
    }

    #[test]
    fn stitches_when_leaf_matches_anchor() {
        let a_leaf = Hash::from_bytes(b"a");
        let (a_leaf, r1) = leaf_receipt(a_leaf, Hash::from_bytes(b"sib1"), Side::Right);

        let b_leaf = r1.anchor; // R2's leaf equals R1's anchor
        let (_, r2) = leaf_receipt(b_leaf, Hash::from_bytes(b"sib2"), Side::Left);

        let combined = stitch(a_leaf, &r1, b_leaf, &r2).unwrap();
        assert_eq!(combined.anchor, r2.anchor);
        assert_eq!(combined.path.len(), r1.path.len() + r2.path.len());
    }

    #[test]
    fn rejects_mismatched_join() {
        let a_leaf = Hash::from_bytes(b"a");
        let (a_leaf, r1) = leaf_receipt(a_leaf, Hash::from_bytes(b"sib1"), Side::Right);

        let wrong_leaf = Hash::from_bytes(b"not-r1-anchor");
        let (_, r2) = leaf_receipt(wrong_leaf, Hash::from_bytes(b"sib2"), Side::Left);

        let err = stitch(a_leaf, &r1, wrong_leaf, &r2).unwrap_err();
        assert!(matches!(err, VerifyError::MalformedInput(_)));
    }

    #[test]
    fn stitching_is_associative_when_all_joins_are_byte_equal() {
        let a_leaf = Hash::from_bytes(b"a");
        let (a_leaf, r_a) = leaf_receipt(a_leaf, Hash::from_bytes(b"sib1"), Side::Right);
        let b_leaf = r_a.anchor;
        let (_, r_b) = leaf_receipt(b_leaf, Hash::from_bytes(b"sib2"), Side::Left);
        let c_leaf = r_b.anchor;
        let (_, r_c) = leaf_receipt(c_leaf, Hash::from_bytes(b"sib3"), Side::Right);

        let left_first = stitch(a_leaf, &r_a, b_leaf, &r_b).unwrap();
        let ab_c = stitch(a_leaf, &left_first, c_leaf, &r_c).unwrap();

        let right_first = stitch(b_leaf, &r_b, c_leaf, &r_c).unwrap();
        let a_bc = stitch(a_leaf, &r_a, b_leaf, &right_first).unwrap();

        assert_eq!(ab_c, a_bc);
    }
}

//! Merkle inclusion receipts (spec §3, §4.2).

use crate::Hash;

/// Which side of the running hash a sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Sibling is the left operand: `running = H2(entry.hash, running)`.
    Left,
    /// Sibling is the right operand: `running = H2(running, entry.hash)`.
    Right,
}

/// One step of a Merkle inclusion path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptEntry {
    pub hash: Hash,
    pub side: Side,
}

impl ReceiptEntry {
    pub fn new(hash: Hash, side: Side) -> Self {
        Self { hash, side }
    }
}

/// An ordered Merkle inclusion path terminating in a declared anchor.
///
/// Evaluating the path from a leaf hash MUST reproduce `anchor` byte-for-byte
/// (verified by `verity-layers::merkle::verify_receipt`). `origin_block` is
/// carried alongside the path for downstream layers, not itself verified
/// here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub path: Vec<ReceiptEntry>,
    pub anchor: Hash,
    pub origin_block: u64,
}

impl Receipt {
    pub fn new(path: Vec<ReceiptEntry>, anchor: Hash, origin_block: u64) -> Self {
        Self {
            path,
            anchor,
            origin_block,
        }
    }
}

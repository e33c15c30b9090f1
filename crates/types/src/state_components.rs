//! Inputs composing a block's application hash (spec §3, §4.4).

use crate::Hash;

/// The four inputs composing `app_hash` (spec §4.4): the field order is
/// normative and enforced by this struct's layout, never a runtime choice.
///
/// `app_hash = SHA256(main_chain_root ‖ minor_roots ‖ partition_root ‖ receipt_root)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateComponents {
    pub main_chain_root: Hash,
    pub minor_roots: Hash,
    pub partition_root: Hash,
    pub receipt_root: Hash,
}

impl StateComponents {
    /// Compute the candidate application hash from these components.
    pub fn compose(&self) -> Hash {
        Hash::from_parts(&[
            self.main_chain_root.as_bytes(),
            self.minor_roots.as_bytes(),
            self.partition_root.as_bytes(),
            self.receipt_root.as_bytes(),
        ])
    }
}

//! Validator-set rotation records (spec §3, §4.6).

use crate::{CommitSignature, Hash};

/// One validator-set rotation, signed by the **old** set (spec §4.6).
///
/// Chain invariant across a sequence: `T[i].new_set_root == T[i+1].old_set_root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorTransition {
    pub from_height: u64,
    pub to_height: u64,
    pub old_set_root: Hash,
    pub new_set_root: Hash,
    pub signatures: Vec<CommitSignature>,
}

impl ValidatorTransition {
    /// Canonical transition message signed by the old validator set:
    /// `H(old_set_root ‖ new_set_root ‖ u64_be(from_height) ‖ u64_be(to_height))`.
    pub fn sign_bytes(&self) -> Hash {
        Hash::from_parts(&[
            self.old_set_root.as_bytes(),
            self.new_set_root.as_bytes(),
            &self.from_height.to_be_bytes(),
            &self.to_height.to_be_bytes(),
        ])
    }
}

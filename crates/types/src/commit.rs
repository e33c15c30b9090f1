//! Consensus commit signatures (spec §3, §4.5).

/// One validator's commit-round signature. An empty `signature` means an
/// absent vote — counted as non-signing, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSignature {
    pub validator_address: Vec<u8>,
    pub timestamp: i64,
    pub signature: Vec<u8>,
}

impl CommitSignature {
    pub fn is_absent(&self) -> bool {
        self.signature.is_empty()
    }
}

/// A block's commit round: the set of (possibly absent) validator
/// signatures gathered for one height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Defaults to 0 if absent upstream (spec §4.5 edge case).
    pub round: u32,
    pub signatures: Vec<CommitSignature>,
}

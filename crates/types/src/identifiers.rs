//! Domain-specific identifier types.

use std::fmt;

/// Validator identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidatorId(pub u64);

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validator({})", self.0)
    }
}

/// Block height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    /// Genesis block height.
    pub const GENESIS: Self = BlockHeight(0);

    /// Get the next block height.
    pub fn next(self) -> Self {
        BlockHeight(self.0 + 1)
    }

    /// Get the previous block height (returns None if at genesis).
    pub fn prev(self) -> Option<Self> {
        if self.0 > 0 {
            Some(BlockHeight(self.0 - 1))
        } else {
            None
        }
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.0)
    }
}

/// Vote power (stake weight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VotePower(pub u64);

impl VotePower {
    /// Minimum vote power.
    pub const MIN: Self = VotePower(1);

    /// Create from u64, ensuring it's at least 1.
    pub fn new(power: u64) -> Self {
        VotePower(power.max(1))
    }

    /// Get the raw value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Calculate total vote power from a list.
    pub fn sum(powers: &[VotePower]) -> u64 {
        powers.iter().map(|p| p.0).sum()
    }

    /// BFT quorum threshold: `voted > floor(2*total/3)`, equivalently the
    /// smallest integer satisfying `voted >= floor(2*total/3) + 1`.
    pub fn has_quorum(voted: u64, total: u64) -> bool {
        voted * 3 > total * 2
    }

    /// The exact threshold vote power `floor(2*total/3) + 1`.
    pub fn quorum_threshold(total: u64) -> u64 {
        (2 * total) / 3 + 1
    }
}

impl fmt::Display for VotePower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_height_next_prev() {
        let height = BlockHeight(10);
        assert_eq!(height.next(), BlockHeight(11));
        assert_eq!(height.prev(), Some(BlockHeight(9)));

        assert_eq!(BlockHeight::GENESIS.prev(), None);
        assert_eq!(BlockHeight::GENESIS.next(), BlockHeight(1));
    }

    #[test]
    fn test_vote_power_quorum() {
        let total = 4;

        assert!(!VotePower::has_quorum(2, total)); // 2/4 = 50% (not enough)
        assert!(VotePower::has_quorum(3, total)); // 3/4 = 75% (quorum!)
        assert!(VotePower::has_quorum(4, total)); // 4/4 = 100% (quorum!)
    }

    #[test]
    fn test_quorum_exactness_at_total_100() {
        assert_eq!(VotePower::quorum_threshold(100), 67);
        assert!(!VotePower::has_quorum(66, 100));
        assert!(VotePower::has_quorum(67, 100));
    }
}

//! Per-layer and whole-verification results, and the trust-level grader's
//! output type (spec §3, §4.7).

use crate::{Hash, VerifyError};
use std::collections::BTreeMap;

/// Which of the four proof layers a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    L1,
    L2,
    L3,
    L4,
}

/// The outcome of a single layer verifier.
///
/// `api_limitation = true` means a required input was unavailable — a
/// distinct condition from a cryptographic failure, and never promoted to
/// `verified = true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerResult {
    pub verified: bool,
    pub evidence: Vec<Hash>,
    pub error: Option<VerifyError>,
    pub api_limitation: bool,
}

impl LayerResult {
    pub fn verified(evidence: Vec<Hash>) -> Self {
        Self {
            verified: true,
            evidence,
            error: None,
            api_limitation: false,
        }
    }

    pub fn failed(error: VerifyError, evidence: Vec<Hash>) -> Self {
        Self {
            verified: false,
            evidence,
            error: Some(error),
            api_limitation: false,
        }
    }

    pub fn unavailable(error: VerifyError) -> Self {
        Self {
            verified: false,
            evidence: Vec::new(),
            error: Some(error),
            api_limitation: true,
        }
    }
}

/// Trust levels, ordered from weakest to strongest (spec §4.7). The derived
/// `Ord` lets the grader be expressed as a fold/max over layer booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrustLevel {
    NoVerification,
    ApiTrust,
    BlockchainTrust,
    MinimalTrust,
    ZeroTrust,
}

impl TrustLevel {
    /// Classify the outcome from which layers verified (spec §4.7's table).
    /// Trust accrues only while layers verify contiguously from L1; a gap
    /// (e.g. L1 and L3 verified but not L2) caps the level at the last
    /// contiguous layer.
    pub fn grade(layers: &BTreeMap<Layer, LayerResult>) -> Self {
        let verified = |l: Layer| layers.get(&l).is_some_and(|r| r.verified);

        if !verified(Layer::L1) {
            return TrustLevel::NoVerification;
        }
        if !verified(Layer::L2) {
            return TrustLevel::ApiTrust;
        }
        if !verified(Layer::L3) {
            return TrustLevel::BlockchainTrust;
        }
        if !verified(Layer::L4) {
            return TrustLevel::MinimalTrust;
        }
        TrustLevel::ZeroTrust
    }
}

/// The orchestrator's final, owned output for one verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub account: String,
    pub layers: BTreeMap<Layer, LayerResult>,
    pub trust_level: TrustLevel,
    pub fully_verified: bool,
}

impl VerificationResult {
    pub fn new(account: impl Into<String>, layers: BTreeMap<Layer, LayerResult>) -> Self {
        let trust_level = TrustLevel::grade(&layers);
        let fully_verified = trust_level == TrustLevel::ZeroTrust;
        Self {
            account: account.into(),
            layers,
            trust_level,
            fully_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verified_result() -> LayerResult {
        LayerResult::verified(vec![])
    }

    fn unverified_result() -> LayerResult {
        LayerResult::failed(VerifyError::PathMismatch, vec![])
    }

    #[test]
    fn grades_zero_trust_when_all_verified() {
        let mut layers = BTreeMap::new();
        layers.insert(Layer::L1, verified_result());
        layers.insert(Layer::L2, verified_result());
        layers.insert(Layer::L3, verified_result());
        layers.insert(Layer::L4, verified_result());
        let result = VerificationResult::new("acc://x", layers);
        assert_eq!(result.trust_level, TrustLevel::ZeroTrust);
        assert!(result.fully_verified);
    }

    #[test]
    fn grades_minimal_trust_when_l4_fails() {
        let mut layers = BTreeMap::new();
        layers.insert(Layer::L1, verified_result());
        layers.insert(Layer::L2, verified_result());
        layers.insert(Layer::L3, verified_result());
        layers.insert(Layer::L4, unverified_result());
        let result = VerificationResult::new("acc://x", layers);
        assert_eq!(result.trust_level, TrustLevel::MinimalTrust);
        assert!(!result.fully_verified);
    }

    #[test]
    fn grades_no_verification_when_l1_fails() {
        let mut layers = BTreeMap::new();
        layers.insert(Layer::L1, unverified_result());
        let result = VerificationResult::new("acc://x", layers);
        assert_eq!(result.trust_level, TrustLevel::NoVerification);
    }

    #[test]
    fn ordering_reflects_trust_strength() {
        assert!(TrustLevel::ZeroTrust > TrustLevel::MinimalTrust);
        assert!(TrustLevel::MinimalTrust > TrustLevel::BlockchainTrust);
        assert!(TrustLevel::BlockchainTrust > TrustLevel::ApiTrust);
        assert!(TrustLevel::ApiTrust > TrustLevel::NoVerification);
    }
}

//! Validators and validator sets (spec §3, §9 "validator ordering").

use crate::{merkle, Hash, PublicKey};
use std::collections::HashSet;

/// A single validator (spec §3). `voting_power` is strictly positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validator {
    pub address: Vec<u8>,
    pub pubkey: PublicKey,
    pub voting_power: i64,
}

impl Validator {
    pub fn new(address: Vec<u8>, pubkey: PublicKey, voting_power: i64) -> Self {
        Self {
            address,
            pubkey,
            voting_power,
        }
    }

    /// Canonical leaf encoding used when computing the set's merkle root:
    /// `address ‖ pubkey_bytes ‖ voting_power_be`.
    fn leaf_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.address.len() + 64 + 8);
        buf.extend_from_slice(&self.address);
        buf.extend_from_slice(&pubkey_bytes(&self.pubkey));
        buf.extend_from_slice(&self.voting_power.to_be_bytes());
        buf
    }
}

fn pubkey_bytes(pk: &PublicKey) -> Vec<u8> {
    match pk {
        PublicKey::Ed25519(bytes) => bytes.to_vec(),
        PublicKey::Bls12381(bytes) => bytes.clone(),
    }
}

/// An ordered validator set at a given height (spec §3).
///
/// Identity is `(height, merkle_root)`. The merkle root is computed over the
/// validators' canonical leaf encodings **in the order they were received** —
/// implementations MUST NOT sort by address or public key (spec §9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorSet {
    pub height: u64,
    pub validators: Vec<Validator>,
    pub total_power: i64,
}

/// Structural problems detected while constructing a `ValidatorSet`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidatorSetError {
    #[error("duplicate validator address")]
    DuplicateAddress,
    #[error("duplicate validator public key")]
    DuplicatePubkey,
    #[error("non-positive voting power for a validator")]
    NonPositivePower,
    #[error("declared total_power {declared} does not match sum of voting powers {actual}")]
    TotalPowerMismatch { declared: i64, actual: i64 },
}

impl ValidatorSet {
    /// Build a validator set, checking the invariants in spec §3: no
    /// duplicate addresses, no duplicate public keys, strictly positive
    /// voting power, and a `total_power` equal to the sum of member powers.
    pub fn new(
        height: u64,
        validators: Vec<Validator>,
        total_power: i64,
    ) -> Result<Self, ValidatorSetError> {
        let mut seen_addrs = HashSet::new();
        let mut seen_pubkeys = HashSet::new();
        let mut sum: i64 = 0;

        for v in &validators {
            if v.voting_power <= 0 {
                return Err(ValidatorSetError::NonPositivePower);
            }
            if !seen_addrs.insert(v.address.clone()) {
                return Err(ValidatorSetError::DuplicateAddress);
            }
            if !seen_pubkeys.insert(pubkey_bytes(&v.pubkey)) {
                return Err(ValidatorSetError::DuplicatePubkey);
            }
            sum += v.voting_power;
        }

        if sum != total_power {
            return Err(ValidatorSetError::TotalPowerMismatch {
                declared: total_power,
                actual: sum,
            });
        }

        Ok(Self {
            height,
            validators,
            total_power,
        })
    }

    /// Deterministic merkle root over the canonical (received) ordering.
    pub fn merkle_root(&self) -> Hash {
        let leaves: Vec<Hash> = self
            .validators
            .iter()
            .map(|v| Hash::from_bytes(&v.leaf_bytes()))
            .collect();
        if leaves.is_empty() {
            return Hash::ZERO;
        }
        merkle::merkle_root(&leaves)
    }

    pub fn find_by_address(&self, address: &[u8]) -> Option<&Validator> {
        self.validators.iter().find(|v| v.address == address)
    }
}

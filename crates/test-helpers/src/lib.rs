//! Fixture builders shared by the workspace's test suites: signed receipts,
//! validator sets, and a matching genesis trust root, all built from
//! deterministic seeds so fixtures are reproducible across runs.

use verity_layers::l3::vote_sign_bytes;
use verity_layers::l4::TrustRoot;
use verity_types::{
    Commit, CommitSignature, Hash, KeyPair, KeyType, PublicKey, Receipt, ReceiptEntry, Side,
    Validator, ValidatorSet,
};

/// A deterministic Ed25519 keypair derived from a small integer seed.
pub fn validator_keypair(seed: u8) -> KeyPair {
    KeyPair::from_seed(KeyType::Ed25519, &[seed; 32])
}

/// A deterministic BLS12-381 keypair derived from a small integer seed.
pub fn bls_keypair(seed: u8) -> KeyPair {
    KeyPair::from_seed(KeyType::Bls12381, &[seed; 32])
}

/// Build an `n`-validator set with equal voting power, addresses `[seed; 20]`
/// for `seed` in `1..=n`, and Ed25519 keys (suitable for L3/L4 fixtures).
pub fn equal_power_validator_set(n: u8, power_each: i64) -> (ValidatorSet, Vec<KeyPair>) {
    let keys: Vec<KeyPair> = (1..=n).map(validator_keypair).collect();
    let validators: Vec<Validator> = (1..=n)
        .zip(keys.iter())
        .map(|(seed, kp)| Validator::new(vec![seed; 20], kp.public_key(), power_each))
        .collect();
    let total = power_each * n as i64;
    let set = ValidatorSet::new(0, validators, total).expect("fixture validator set is valid");
    (set, keys)
}

/// A genesis trust root whose validator set matches `validators` exactly —
/// useful for fixtures that don't exercise validator-set rotation.
pub fn genesis_trust_root(validators: ValidatorSet) -> TrustRoot {
    let genesis_hash = validators.merkle_root();
    TrustRoot {
        genesis_hash,
        genesis_validators: validators,
    }
}

/// A `Commit` where the first `signers` validators (in set order) cast a
/// canonical PRECOMMIT vote for `block_hash` at `(chain_id, height, round)`
/// with the given Ed25519 keys; the rest are absent.
#[allow(clippy::too_many_arguments)]
pub fn sign_commit(
    keys: &[KeyPair],
    validators: &ValidatorSet,
    chain_id: &str,
    height: u64,
    round: u32,
    block_hash: Hash,
    signers: usize,
) -> Commit {
    let timestamp = 1_700_000_000i64;
    let message = vote_sign_bytes(chain_id, height, round, timestamp, block_hash);
    let signatures = validators
        .validators
        .iter()
        .zip(keys.iter())
        .enumerate()
        .map(|(i, (validator, kp))| {
            if i < signers {
                CommitSignature {
                    validator_address: validator.address.clone(),
                    timestamp,
                    signature: kp.sign(&message).to_bytes(),
                }
            } else {
                CommitSignature {
                    validator_address: validator.address.clone(),
                    timestamp: 0,
                    signature: Vec::new(),
                }
            }
        })
        .collect();
    Commit { round, signatures }
}

/// A single-step Merkle receipt proving `leaf` under `anchor`, built from an
/// explicit list of siblings (closest-to-leaf first).
pub fn receipt_from_siblings(siblings: &[(Hash, Side)], anchor: Hash, origin_block: u64) -> Receipt {
    let path = siblings
        .iter()
        .map(|&(hash, side)| ReceiptEntry { hash, side })
        .collect();
    Receipt { path, anchor, origin_block }
}

/// A minimal BLS validator whose public key is guaranteed parseable, for
/// attestation-aggregator fixtures.
pub fn bls_validator(seed: u8, power: i64) -> (Validator, KeyPair) {
    let kp = bls_keypair(seed);
    let pubkey: PublicKey = kp.public_key();
    (Validator::new(vec![seed; 20], pubkey, power), kp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_layers::merkle::verify_receipt;

    #[test]
    fn equal_power_validator_set_is_internally_consistent() {
        let (set, keys) = equal_power_validator_set(4, 25);
        assert_eq!(set.validators.len(), 4);
        assert_eq!(keys.len(), 4);
        assert_eq!(set.total_power, 100);
    }

    #[test]
    fn sign_commit_leaves_unsigned_validators_absent() {
        let (set, keys) = equal_power_validator_set(4, 25);
        let block_hash = Hash::from_bytes(b"block");
        let commit = sign_commit(&keys, &set, "devnet", 10, 0, block_hash, 3);
        assert!(commit.signatures[3].is_absent());
        assert!(!commit.signatures[0].is_absent());
    }

    #[test]
    fn receipt_from_siblings_round_trips_through_verify_receipt() {
        let leaf = Hash::from_bytes(b"leaf");
        let sibling = Hash::from_bytes(b"sibling");
        let anchor = Hash::pair(&leaf, &sibling);
        let receipt = receipt_from_siblings(&[(sibling, Side::Right)], anchor, 1);
        assert!(verify_receipt(leaf, &receipt));
    }
}

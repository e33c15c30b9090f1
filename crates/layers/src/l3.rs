//! C5 — L3, block hash to validator quorum (spec §4.5).
//!
//! Vote bytes are domain-separated the way the teacher domain-separates its
//! gossip message payloads: a fixed ASCII tag followed by length-prefixed
//! and big-endian fields, so a signature collected for one message shape
//! can never be replayed against another. `chain_id` is always a runtime
//! parameter — hard-coding it is the exact defect spec §9 calls out and
//! test `chain_id_is_folded_into_signed_bytes` guards against.

use std::collections::HashSet;
use verity_core::LayerVerifier;
use verity_types::{Commit, Hash, LayerResult, PublicKey, Signature, ValidatorSet, VerifyError};

const VOTE_SIGN_TAG: &[u8] = b"VERITY_VOTE_PRECOMMIT_V1";

/// Build the canonical PRECOMMIT vote bytes a validator signs.
pub fn vote_sign_bytes(chain_id: &str, height: u64, round: u32, timestamp: i64, block_hash: Hash) -> Vec<u8> {
    let mut buf = Vec::with_capacity(VOTE_SIGN_TAG.len() + 4 + chain_id.len() + 8 + 4 + 8 + 32);
    buf.extend_from_slice(VOTE_SIGN_TAG);
    buf.extend_from_slice(&(chain_id.len() as u32).to_be_bytes());
    buf.extend_from_slice(chain_id.as_bytes());
    buf.extend_from_slice(&height.to_be_bytes());
    buf.extend_from_slice(&round.to_be_bytes());
    buf.extend_from_slice(&timestamp.to_be_bytes());
    buf.extend_from_slice(block_hash.as_bytes());
    buf
}

#[derive(Debug, Clone)]
pub struct L3Input {
    pub block_hash: Hash,
    pub height: u64,
    pub chain_id: String,
    pub validator_set: ValidatorSet,
    pub commit: Commit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L3Output {
    pub signed_power: i64,
    pub total_power: i64,
}

pub struct L3;

impl LayerVerifier for L3 {
    type Input = L3Input;
    type Output = L3Output;

    fn verify(input: L3Input) -> (LayerResult, Option<L3Output>) {
        verify_l3(input)
    }
}

/// BFT quorum threshold: `floor(2*total/3) + 1`.
pub fn quorum_threshold(total_power: i64) -> i64 {
    (2 * total_power) / 3 + 1
}

pub fn verify_l3(input: L3Input) -> (LayerResult, Option<L3Output>) {
    let total_power = input.validator_set.total_power;
    let round = input.commit.round;

    let mut counted = HashSet::new();
    let mut signed_power: i64 = 0;
    let mut any_signature_invalid = false;

    for sig in &input.commit.signatures {
        if sig.is_absent() {
            continue;
        }
        let Some(validator) = input
            .validator_set
            .find_by_address(&sig.validator_address)
        else {
            continue; // unknown validator: ignored, not an error
        };
        if !counted.insert(validator.address.clone()) {
            continue; // duplicate commit-signature: first valid one wins
        }

        let message = vote_sign_bytes(&input.chain_id, input.height, round, sig.timestamp, input.block_hash);
        let signature = Signature::Ed25519(sig.signature.clone());
        let ok = matches!(validator.pubkey, PublicKey::Ed25519(_))
            && validator.pubkey.verify(&message, &signature);

        if ok {
            signed_power += validator.voting_power;
        } else {
            any_signature_invalid = true;
            counted.remove(&validator.address); // don't prevent a later, unrelated entry from counting it
        }
    }

    let threshold = quorum_threshold(total_power);
    let evidence = vec![input.block_hash];

    if signed_power >= threshold {
        (
            LayerResult::verified(evidence),
            Some(L3Output {
                signed_power,
                total_power,
            }),
        )
    } else {
        let err = if any_signature_invalid && signed_power == 0 {
            VerifyError::SignatureInvalid
        } else {
            VerifyError::QuorumNotMet {
                signed: signed_power,
                threshold,
                total: total_power,
            }
        };
        (LayerResult::failed(err, evidence), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_types::{CommitSignature, KeyPair, KeyType, Validator};

    fn validator_with_seed(seed: u8, power: i64) -> (KeyPair, Validator) {
        let kp = KeyPair::from_seed(KeyType::Ed25519, &[seed; 32]);
        let pubkey = kp.public_key();
        let validator = Validator::new(vec![seed; 20], pubkey, power);
        (kp, validator)
    }

    #[test]
    fn quorum_exactness_at_total_100() {
        assert_eq!(quorum_threshold(100), 67);
    }

    #[test]
    fn verified_when_three_of_four_equal_power_validators_sign() {
        let chain_id = "devnet";
        let height = 100;
        let block_hash = Hash::from_bytes(b"block");
        let ts = 1_700_000_000i64;

        let (kp1, v1) = validator_with_seed(1, 25);
        let (kp2, v2) = validator_with_seed(2, 25);
        let (kp3, v3) = validator_with_seed(3, 25);
        let (_kp4, v4) = validator_with_seed(4, 25);

        let validator_set =
            ValidatorSet::new(height, vec![v1.clone(), v2.clone(), v3.clone(), v4.clone()], 100).unwrap();

        let sign = |kp: &KeyPair, addr: &[u8]| CommitSignature {
            validator_address: addr.to_vec(),
            timestamp: ts,
            signature: kp
                .sign(&vote_sign_bytes(chain_id, height, 0, ts, block_hash))
                .to_bytes(),
        };

        let commit = Commit {
            round: 0,
            signatures: vec![
                sign(&kp1, &v1.address),
                sign(&kp2, &v2.address),
                sign(&kp3, &v3.address),
            ],
        };

        let (result, output) = verify_l3(L3Input {
            block_hash,
            height,
            chain_id: chain_id.to_string(),
            validator_set,
            commit,
        });

        assert!(result.verified);
        assert_eq!(output.unwrap().signed_power, 75);
    }

    #[test]
    fn quorum_not_met_when_only_two_of_four_sign() {
        let chain_id = "devnet";
        let height = 100;
        let block_hash = Hash::from_bytes(b"block");
        let ts = 1_700_000_000i64;

        let (kp1, v1) = validator_with_seed(1, 25);
        let (kp2, v2) = validator_with_seed(2, 25);
        let (_kp3, v3) = validator_with_seed(3, 25);
        let (_kp4, v4) = validator_with_seed(4, 25);

        let validator_set =
            ValidatorSet::new(height, vec![v1.clone(), v2.clone(), v3, v4], 100).unwrap();

        let sign = |kp: &KeyPair, addr: &[u8]| CommitSignature {
            validator_address: addr.to_vec(),
            timestamp: ts,
            signature: kp
                .sign(&vote_sign_bytes(chain_id, height, 0, ts, block_hash))
                .to_bytes(),
        };

        let commit = Commit {
            round: 0,
            signatures: vec![sign(&kp1, &v1.address), sign(&kp2, &v2.address)],
        };

        let (result, output) = verify_l3(L3Input {
            block_hash,
            height,
            chain_id: chain_id.to_string(),
            validator_set,
            commit,
        });

        assert!(!result.verified);
        assert_eq!(
            result.error,
            Some(VerifyError::QuorumNotMet {
                signed: 50,
                threshold: 67,
                total: 100
            })
        );
        assert!(output.is_none());
    }

    #[test]
    fn chain_id_is_folded_into_signed_bytes() {
        let block_hash = Hash::from_bytes(b"block");
        let (kp, v) = validator_with_seed(1, 100);
        let validator_set = ValidatorSet::new(10, vec![v.clone()], 100).unwrap();
        let ts = 1i64;

        // Signed for "devnet", replayed against "mainnet".
        let sig = kp.sign(&vote_sign_bytes("devnet", 10, 0, ts, block_hash));
        let commit = Commit {
            round: 0,
            signatures: vec![CommitSignature {
                validator_address: v.address.clone(),
                timestamp: ts,
                signature: sig.to_bytes(),
            }],
        };

        let (result, _) = verify_l3(L3Input {
            block_hash,
            height: 10,
            chain_id: "mainnet".to_string(),
            validator_set,
            commit,
        });
        assert!(!result.verified);
    }

    #[test]
    fn duplicate_signatures_for_same_validator_count_once() {
        let chain_id = "devnet";
        let height = 1;
        let block_hash = Hash::from_bytes(b"block");
        let ts = 1i64;

        let (kp, v) = validator_with_seed(1, 100);
        let validator_set = ValidatorSet::new(height, vec![v.clone()], 100).unwrap();
        let sig = kp
            .sign(&vote_sign_bytes(chain_id, height, 0, ts, block_hash))
            .to_bytes();

        let commit = Commit {
            round: 0,
            signatures: vec![
                CommitSignature {
                    validator_address: v.address.clone(),
                    timestamp: ts,
                    signature: sig.clone(),
                },
                CommitSignature {
                    validator_address: v.address.clone(),
                    timestamp: ts,
                    signature: sig,
                },
            ],
        };

        let (result, output) = verify_l3(L3Input {
            block_hash,
            height,
            chain_id: chain_id.to_string(),
            validator_set,
            commit,
        });
        assert!(result.verified);
        assert_eq!(output.unwrap().signed_power, 100);
    }
}

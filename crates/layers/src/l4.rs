//! C6 — L4, trust chain to genesis (spec §4.6).

use crate::l3::quorum_threshold;
use verity_core::LayerVerifier;
use verity_types::{
    Commit, CommitSignature, Hash, LayerResult, PublicKey, Signature, ValidatorSet, VerifyError,
};

/// The persisted, immutable L4 trust root (spec §4.6: "written once at
/// initialization; immutable thereafter for the lifetime of the verifier
/// instance"). Treated as an injected parameter, never a singleton
/// (spec §9).
#[derive(Debug, Clone)]
pub struct TrustRoot {
    pub genesis_hash: Hash,
    pub genesis_validators: ValidatorSet,
}

/// One validator-set rotation plus the old set it was signed by (needed to
/// verify its quorum — the chain only carries roots, not full sets, so the
/// caller supplies the old set alongside each transition).
#[derive(Debug, Clone)]
pub struct TransitionStep {
    pub transition: verity_types::ValidatorTransition,
    pub old_validator_set: ValidatorSet,
}

#[derive(Debug, Clone)]
pub struct L4Input {
    pub trust_root: TrustRoot,
    pub observed_set: ValidatorSet,
    pub observed_height: u64,
    pub transitions: Vec<TransitionStep>,
    /// Permitted gap between the last transition's `to_height` and
    /// `observed_height` (spec §6.3 `max_height_skew`, default 0).
    pub max_height_skew: u64,
}

pub struct L4;

impl LayerVerifier for L4 {
    type Input = L4Input;
    type Output = ();

    fn verify(input: L4Input) -> (LayerResult, Option<()>) {
        verify_l4(input)
    }
}

pub fn verify_l4(input: L4Input) -> (LayerResult, Option<()>) {
    let mut current_root = input.trust_root.genesis_validators.merkle_root();

    if current_root != input.trust_root.genesis_hash {
        let err = VerifyError::TransitionChainBroken(
            "genesis validator set root does not match the persisted genesis hash".into(),
        );
        return (LayerResult::failed(err, vec![current_root]), None);
    }

    let mut last_to_height = 0u64;
    let mut evidence = vec![current_root];

    for step in &input.transitions {
        let t = &step.transition;

        if current_root != t.old_set_root {
            let err = VerifyError::TransitionChainBroken(format!(
                "transition {}→{} old_set_root does not match the chain's current root",
                t.from_height, t.to_height
            ));
            return (LayerResult::failed(err, evidence), None);
        }

        if step.old_validator_set.merkle_root() != t.old_set_root {
            let err = VerifyError::TransitionChainBroken(
                "supplied old validator set does not hash to transition.old_set_root".into(),
            );
            return (LayerResult::failed(err, evidence), None);
        }

        if !transition_has_quorum(t, &step.old_validator_set) {
            let err = VerifyError::TransitionChainBroken(format!(
                "transition {}→{} did not reach quorum over the old validator set",
                t.from_height, t.to_height
            ));
            return (LayerResult::failed(err, evidence), None);
        }

        current_root = t.new_set_root;
        last_to_height = t.to_height;
        evidence.push(current_root);
    }

    if current_root != input.observed_set.merkle_root() {
        let err = VerifyError::TransitionChainBroken(
            "final transition root does not match the observed validator set".into(),
        );
        return (LayerResult::failed(err, evidence), None);
    }

    let skew_ok = last_to_height <= input.observed_height
        && last_to_height + input.max_height_skew >= input.observed_height;
    if !input.transitions.is_empty() && !skew_ok {
        let err = VerifyError::TransitionChainBroken(format!(
            "last transition height {} exceeds permitted skew {} from observed height {}",
            last_to_height, input.max_height_skew, input.observed_height
        ));
        return (LayerResult::failed(err, evidence), None);
    }

    (LayerResult::verified(evidence), Some(()))
}

fn transition_has_quorum(t: &verity_types::ValidatorTransition, old_set: &ValidatorSet) -> bool {
    let commit = Commit {
        round: 0,
        signatures: t.signatures.clone(),
    };
    let message = t.sign_bytes();
    signed_power_over(&commit, old_set, message) >= quorum_threshold(old_set.total_power)
}

fn signed_power_over(commit: &Commit, validator_set: &ValidatorSet, message: Hash) -> i64 {
    use std::collections::HashSet;
    let mut counted = HashSet::new();
    let mut signed_power = 0i64;

    for sig in &commit.signatures {
        if sig.is_absent() {
            continue;
        }
        let Some(validator) = validator_set.find_by_address(&sig.validator_address) else {
            continue;
        };
        if !counted.insert(validator.address.clone()) {
            continue;
        }
        let signature = Signature::Ed25519(sig.signature.clone());
        let ok = matches!(validator.pubkey, PublicKey::Ed25519(_))
            && validator.pubkey.verify(message.as_bytes(), &signature);
        if ok {
            signed_power += validator.voting_power;
        } else {
            counted.remove(&validator.address);
        }
    }
    signed_power
}

/// Sign a transition message on behalf of one validator — a small test
/// helper mirroring the shape `verity-test-helpers` exposes to other crates.
#[cfg(test)]
pub fn sign_transition(
    kp: &verity_types::KeyPair,
    address: Vec<u8>,
    timestamp: i64,
    message: Hash,
) -> CommitSignature {
    CommitSignature {
        validator_address: address,
        timestamp,
        signature: kp.sign(message.as_bytes()).to_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_types::{KeyPair, KeyType, Validator, ValidatorTransition};

    fn validator_set_of(seeds: &[u8], power_each: i64) -> (ValidatorSet, Vec<KeyPair>) {
        let mut validators = Vec::new();
        let mut keys = Vec::new();
        for &s in seeds {
            let kp = KeyPair::from_seed(KeyType::Ed25519, &[s; 32]);
            validators.push(Validator::new(vec![s; 20], kp.public_key(), power_each));
            keys.push(kp);
        }
        let total = power_each * seeds.len() as i64;
        (
            ValidatorSet::new(0, validators, total).unwrap(),
            keys,
        )
    }

    #[test]
    fn verifies_a_two_step_rotation_chain() {
        let (genesis_set, genesis_keys) = validator_set_of(&[1, 2, 3, 4], 25);
        let genesis_hash = genesis_set.merkle_root();

        let (mid_set, mid_keys) = validator_set_of(&[5, 6, 7, 8], 25);
        let (observed_set, _observed_keys) = validator_set_of(&[9, 10, 11, 12], 25);

        let t1 = ValidatorTransition {
            from_height: 0,
            to_height: 10,
            old_set_root: genesis_set.merkle_root(),
            new_set_root: mid_set.merkle_root(),
            signatures: vec![],
        };
        let t1_msg = t1.sign_bytes();
        let t1_sigs: Vec<_> = genesis_keys
            .iter()
            .zip(genesis_set.validators.iter())
            .map(|(kp, v)| sign_transition(kp, v.address.clone(), 0, t1_msg))
            .collect();
        let t1 = ValidatorTransition {
            signatures: t1_sigs,
            ..t1
        };

        let t2 = ValidatorTransition {
            from_height: 10,
            to_height: 20,
            old_set_root: mid_set.merkle_root(),
            new_set_root: observed_set.merkle_root(),
            signatures: vec![],
        };
        let t2_msg = t2.sign_bytes();
        let t2_sigs: Vec<_> = mid_keys
            .iter()
            .zip(mid_set.validators.iter())
            .take(3) // 3 of 4 -> 75/100 power, meets quorum
            .map(|(kp, v)| sign_transition(kp, v.address.clone(), 0, t2_msg))
            .collect();
        let t2 = ValidatorTransition {
            signatures: t2_sigs,
            ..t2
        };

        let input = L4Input {
            trust_root: TrustRoot {
                genesis_hash,
                genesis_validators: genesis_set.clone(),
            },
            observed_set: observed_set.clone(),
            observed_height: 20,
            transitions: vec![
                TransitionStep {
                    transition: t1,
                    old_validator_set: genesis_set,
                },
                TransitionStep {
                    transition: t2,
                    old_validator_set: mid_set,
                },
            ],
            max_height_skew: 0,
        };

        let (result, _) = verify_l4(input);
        assert!(result.verified);
    }

    #[test]
    fn rejects_when_observed_set_does_not_match_chain_end() {
        let (genesis_set, _keys) = validator_set_of(&[1, 2, 3, 4], 25);
        let genesis_hash = genesis_set.merkle_root();
        let (wrong_observed, _) = validator_set_of(&[99, 98, 97, 96], 25);

        let input = L4Input {
            trust_root: TrustRoot {
                genesis_hash,
                genesis_validators: genesis_set,
            },
            observed_set: wrong_observed,
            observed_height: 0,
            transitions: vec![],
            max_height_skew: 0,
        };

        let (result, _) = verify_l4(input);
        assert!(!result.verified);
        assert!(matches!(
            result.error,
            Some(VerifyError::TransitionChainBroken(_))
        ));
    }
}

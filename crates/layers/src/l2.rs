//! C4 — L2, partition root to block application hash (spec §4.4).
//!
//! The only acceptable evidence is the full `StateComponents` composition.
//! There is no "direct match" shortcut — the historical `app_hash ==
//! partition_root` bug named in spec §9 is deliberately not implemented;
//! see the regression test below.

use verity_core::LayerVerifier;
use verity_types::{Hash, LayerResult, StateComponents, VerifyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L2Input {
    pub partition_root: Hash,
    pub block_app_hash: Hash,
    pub state_components: Option<StateComponents>,
}

/// Values L2 hands to L3 once it has verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L2Output {
    pub block_app_hash: Hash,
}

pub struct L2;

impl LayerVerifier for L2 {
    type Input = L2Input;
    type Output = L2Output;

    fn verify(input: L2Input) -> (LayerResult, Option<L2Output>) {
        verify_l2(input)
    }
}

pub fn verify_l2(input: L2Input) -> (LayerResult, Option<L2Output>) {
    let Some(components) = input.state_components else {
        let err = VerifyError::ApiLimitation(
            "state components unavailable; L2 cannot be verified".into(),
        );
        return (LayerResult::unavailable(err), None);
    };

    if components.partition_root != input.partition_root {
        let err = VerifyError::MalformedInput(
            "state_components.partition_root does not match L1's partition_root".into(),
        );
        return (LayerResult::failed(err, vec![]), None);
    }

    let candidate = components.compose();
    if candidate == input.block_app_hash {
        (
            LayerResult::verified(vec![candidate]),
            Some(L2Output {
                block_app_hash: input.block_app_hash,
            }),
        )
    } else {
        (
            LayerResult::failed(VerifyError::CompositionMismatch, vec![candidate]),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(partition_root: Hash) -> StateComponents {
        StateComponents {
            main_chain_root: Hash::from_bytes(b"main"),
            minor_roots: Hash::from_bytes(b"minor"),
            partition_root,
            receipt_root: Hash::from_bytes(b"receipt"),
        }
    }

    #[test]
    fn verifies_correct_composition() {
        let partition_root = Hash::from_bytes(b"partition");
        let sc = components(partition_root);
        let app_hash = sc.compose();

        let (result, output) = verify_l2(L2Input {
            partition_root,
            block_app_hash: app_hash,
            state_components: Some(sc),
        });
        assert!(result.verified);
        assert_eq!(output.unwrap().block_app_hash, app_hash);
    }

    #[test]
    fn missing_state_components_is_api_limitation_never_verified() {
        let partition_root = Hash::from_bytes(b"partition");
        let (result, output) = verify_l2(L2Input {
            partition_root,
            block_app_hash: Hash::from_bytes(b"whatever"),
            state_components: None,
        });
        assert!(!result.verified);
        assert!(result.api_limitation);
        assert!(output.is_none());
    }

    #[test]
    fn perturbing_any_component_flips_to_composition_mismatch() {
        let partition_root = Hash::from_bytes(b"partition");
        let sc = components(partition_root);
        let app_hash = sc.compose();

        let mut perturbed = sc;
        perturbed.receipt_root = Hash::from_bytes(b"receipt-perturbed");

        let (result, _) = verify_l2(L2Input {
            partition_root,
            block_app_hash: app_hash,
            state_components: Some(perturbed),
        });
        assert!(!result.verified);
        assert_eq!(result.error, Some(VerifyError::CompositionMismatch));
    }

    #[test]
    fn does_not_implement_direct_partition_root_shortcut() {
        // Historical bug per spec: app_hash == partition_root must NOT verify.
        let partition_root = Hash::from_bytes(b"partition");
        let (result, output) = verify_l2(L2Input {
            partition_root,
            block_app_hash: partition_root,
            state_components: None,
        });
        assert!(!result.verified);
        assert!(result.api_limitation);
        assert!(output.is_none());
    }
}

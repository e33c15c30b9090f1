//! The shared layer-verifier interface (spec §9): a small trait, not an
//! inheritance hierarchy. Each of the four proof layers implements this
//! trait on its own zero-sized marker type, with its own `Input` shape.

use verity_types::LayerResult;

/// A pure, referentially-transparent verifier for one proof layer.
/// Implementations perform no I/O — all inputs are already resolved.
///
/// `Output` carries the values a later layer needs (e.g. L1's derived
/// partition root feeding L2); it is `None` whenever `verify` did not reach
/// a conclusion precise enough to hand anything downstream.
pub trait LayerVerifier {
    type Input;
    type Output;

    fn verify(input: Self::Input) -> (LayerResult, Option<Self::Output>);
}

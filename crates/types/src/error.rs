//! The shared error taxonomy (spec §7), used by every layer verifier.

/// Error kinds produced by the verification pipeline. Layer verifiers record
/// their kind locally; the orchestrator surfaces it in the per-layer result
/// and never upgrades an `ApiLimitation` into a verified state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("merkle path evaluation disagreed with the declared anchor")]
    PathMismatch,

    #[error("L2 app-hash composition disagreed with the block's app_hash")]
    CompositionMismatch,

    #[error("signature verification failed for a validator")]
    SignatureInvalid,

    #[error("signed power {signed} did not meet the quorum threshold {threshold} of {total}")]
    QuorumNotMet {
        signed: i64,
        threshold: i64,
        total: i64,
    },

    #[error("validator-set transition chain is broken: {0}")]
    TransitionChainBroken(String),

    #[error("a required input was not available from the data source: {0}")]
    ApiLimitation(String),

    #[error("verification was cancelled")]
    Cancelled,

    #[error("validator {0:?} signed two distinct attestation messages")]
    ConflictingAttestation(Vec<u8>),
}

//! Optional BLS attestation aggregation (spec §4.9, §5, §9).
//!
//! This crate stands apart from the four proof layers: it is not part of
//! the trustless verification pipeline, just a convenience for combining
//! several independently-verified results into one quorum-backed
//! attestation. A deployment that doesn't need it can drop this crate
//! entirely.

mod collector;
mod message;

pub use collector::{AggregatedAttestation, AttestationCollector};
pub use message::{aggregate_hash, attestation_message, validator_snapshot_id, wire_bytes};

//! Externally-sourced block headers (spec §3).
//!
//! Unlike the teacher's `Block`, this type is never constructed or hashed by
//! this crate — it is delivered verbatim by the upstream data source and
//! consumed read-only by the layer verifiers.

use crate::Hash;

/// A block header as reported by the consensus RPC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub height: u64,
    pub chain_id: String,
    /// Post-commit state commitment (spec §4.4).
    pub app_hash: Hash,
    /// Hash over the header actually signed by validators (spec §4.5).
    pub block_hash: Hash,
    /// Unix timestamp, seconds.
    pub time: i64,
}

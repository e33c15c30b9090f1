//! The upstream data source abstraction (spec §6.1).
//!
//! The verification core never speaks RPC itself — it calls through this
//! trait, and a concrete adapter (wire format, transport, retries) lives
//! outside this crate. Every method takes a [`CancellationToken`]; firing it
//! mid-call MUST surface [`DataSourceError::Cancelled`], never a partial
//! result promoted to verified.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use verity_types::{Commit, Receipt, StateComponents, ValidatorSet};

/// The result of `query_account`: the partition's canonical account bytes,
/// delivered verbatim, plus its inclusion receipt and originating block
/// coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountQuery {
    pub record_bytes: Vec<u8>,
    pub receipt: Receipt,
    pub block_index: u64,
    pub block_time: i64,
}

/// A block header as reported by the consensus RPC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub chain_id: String,
    pub app_hash: verity_types::Hash,
    pub block_hash: verity_types::Hash,
    pub time: i64,
}

/// Failure modes a `DataSource` implementation can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataSourceError {
    /// The call was cancelled via its `CancellationToken`.
    #[error("data source call was cancelled")]
    Cancelled,

    /// The endpoint reachable, but it rejected or failed the request for a
    /// reason unrelated to unavailability of the capability itself.
    #[error("data source transport error: {0}")]
    Transport(String),
}

/// Abstract capability set required from an upstream data source
/// (spec §6.1). Wire-format details belong to the implementor; this trait
/// is the semantic contract the verification core consumes.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn query_account(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<AccountQuery, DataSourceError>;

    /// Returns `Ok(None)` when the endpoint cannot supply a block header at
    /// all (distinct from a transport failure) — this is what forces L2/L3
    /// to `api_limitation = true` rather than an error.
    async fn fetch_block(
        &self,
        height: u64,
        cancel: &CancellationToken,
    ) -> Result<Option<BlockHeader>, DataSourceError>;

    /// Returns `Ok(None)` when state components are unavailable — the
    /// condition spec §4.4 requires L2 to treat as `api_limitation = true`.
    async fn fetch_state_components(
        &self,
        height: u64,
        cancel: &CancellationToken,
    ) -> Result<Option<StateComponents>, DataSourceError>;

    async fn fetch_commit(
        &self,
        height: u64,
        cancel: &CancellationToken,
    ) -> Result<Commit, DataSourceError>;

    async fn fetch_validator_set(
        &self,
        height: u64,
        cancel: &CancellationToken,
    ) -> Result<ValidatorSet, DataSourceError>;
}

//! HTTP/JSON `DataSource` implementation.
//!
//! Each capability in spec §6.1 is one `GET` against either the state-RPC
//! (`api_endpoint`) or, where present, the consensus-RPC
//! (`consensus_endpoint`). Response bodies are decoded through `wire.rs`
//! before anything touches the core data model.

use crate::wire::{
    WireAccountQuery, WireBlockHeader, WireCommit, WireStateComponents, WireValidatorSet,
};
use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use verity_core::{AccountQuery, BlockHeader, DataSource, DataSourceError};
use verity_types::{Commit, StateComponents, ValidatorSet};

/// Where to reach the upstream node (spec §6.3).
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub api_endpoint: String,
    /// Absence forces L2/L3 unverifiable (spec §6.1) — every method that
    /// needs it returns `DataSourceError::Transport` if it's `None`.
    pub consensus_endpoint: Option<String>,
}

pub struct RpcDataSource {
    http: Client,
    config: RpcConfig,
}

impl RpcDataSource {
    pub fn new(config: RpcConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        base: &str,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T, DataSourceError> {
        let url = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
        let request = self.http.get(&url).send();
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(DataSourceError::Cancelled),
            result = request => result.map_err(|e| DataSourceError::Transport(e.to_string()))?,
        };

        if !response.status().is_success() {
            return Err(DataSourceError::Transport(format!(
                "HTTP {} for {url}",
                response.status()
            )));
        }

        let bytes = tokio::select! {
            _ = cancel.cancelled() => return Err(DataSourceError::Cancelled),
            result = response.bytes() => result.map_err(|e| DataSourceError::Transport(e.to_string()))?,
        };

        serde_json::from_slice(&bytes).map_err(|e| DataSourceError::Transport(e.to_string()))
    }

    /// Like `get_json`, but a `404` is reported as `Ok(None)` rather than an
    /// error — the distinction between "legitimately absent" and "transport
    /// failure" matters upstream (an absent block caps trust, a transport
    /// failure does not silently do the same).
    async fn get_json_optional<T: serde::de::DeserializeOwned>(
        &self,
        base: &str,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<T>, DataSourceError> {
        let url = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
        let request = self.http.get(&url).send();
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(DataSourceError::Cancelled),
            result = request => result.map_err(|e| DataSourceError::Transport(e.to_string()))?,
        };

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(DataSourceError::Transport(format!(
                "HTTP {} for {url}",
                response.status()
            )));
        }

        let bytes = tokio::select! {
            _ = cancel.cancelled() => return Err(DataSourceError::Cancelled),
            result = response.bytes() => result.map_err(|e| DataSourceError::Transport(e.to_string()))?,
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| DataSourceError::Transport(e.to_string()))
    }

    fn consensus_base(&self) -> Result<&str, DataSourceError> {
        self.config.consensus_endpoint.as_deref().ok_or_else(|| {
            DataSourceError::Transport("no consensus_endpoint configured".to_string())
        })
    }
}

#[async_trait]
impl DataSource for RpcDataSource {
    #[instrument(skip(self, cancel))]
    async fn query_account(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<AccountQuery, DataSourceError> {
        let path = format!("accounts/{}", urlencoding_lite(url));
        let wire: WireAccountQuery = self
            .get_json(&self.config.api_endpoint, &path, cancel)
            .await?;
        let decoded = wire
            .decode(url)
            .map_err(|e| DataSourceError::Transport(e.to_string()))?;
        Ok(AccountQuery {
            record_bytes: decoded.record.data,
            receipt: decoded.record.receipt,
            block_index: decoded.block_index,
            block_time: decoded.block_time,
        })
    }

    #[instrument(skip(self, cancel))]
    async fn fetch_block(
        &self,
        height: u64,
        cancel: &CancellationToken,
    ) -> Result<Option<BlockHeader>, DataSourceError> {
        let path = format!("blocks/{height}");
        let wire = self
            .get_json_optional::<WireBlockHeader>(&self.config.api_endpoint, &path, cancel)
            .await?;
        wire.map(BlockHeader::try_from)
            .transpose()
            .map_err(|e| DataSourceError::Transport(e.to_string()))
    }

    async fn fetch_state_components(
        &self,
        height: u64,
        cancel: &CancellationToken,
    ) -> Result<Option<StateComponents>, DataSourceError> {
        let Some(consensus) = self.config.consensus_endpoint.clone() else {
            return Ok(None);
        };
        let path = format!("state-components/{height}");
        let wire = self
            .get_json_optional::<WireStateComponents>(&consensus, &path, cancel)
            .await?;
        wire.map(StateComponents::try_from)
            .transpose()
            .map_err(|e| DataSourceError::Transport(e.to_string()))
    }

    async fn fetch_commit(
        &self,
        height: u64,
        cancel: &CancellationToken,
    ) -> Result<Commit, DataSourceError> {
        let consensus = self.consensus_base()?.to_string();
        let path = format!("commits/{height}");
        let wire: WireCommit = self.get_json(&consensus, &path, cancel).await?;
        Commit::try_from(wire).map_err(|e| DataSourceError::Transport(e.to_string()))
    }

    async fn fetch_validator_set(
        &self,
        height: u64,
        cancel: &CancellationToken,
    ) -> Result<ValidatorSet, DataSourceError> {
        let consensus = self.consensus_base()?.to_string();
        let path = format!("validator-sets/{height}");
        let wire: WireValidatorSet = self.get_json(&consensus, &path, cancel).await?;
        ValidatorSet::try_from(wire).map_err(|e| DataSourceError::Transport(e.to_string()))
    }
}

/// Minimal path-segment escaping — account URLs are opaque identifiers, not
/// arbitrary text, so this only needs to survive the handful of reserved
/// characters that show up in them (`/`, `:`, space).
fn urlencoding_lite(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' => "%2F".to_string(),
            ':' => "%3A".to_string(),
            ' ' => "%20".to_string(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_reserved_path_characters() {
        assert_eq!(urlencoding_lite("acc://foo bar"), "acc%3A%2F%2Ffoo%20bar");
    }
}

//! C8 — the orchestrator and trust-level grader (spec §4.7).
//!
//! Runs L1 → L2 → L3 → L4 in order over an injected `Arc<dyn DataSource>`
//! and the immutable L4 trust root. A failure in one layer does not skip
//! the next unless skipping is semantically forced (no block hash means L3
//! has nothing to check a signature against). Spawns no background tasks;
//! each call is a single async function awaiting at the suspension points
//! named in spec §5.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{instrument, warn};
use verity_core::{DataSource, DataSourceError};
use verity_layers::{l1, l2, l3, l4};
use verity_types::{AccountRecord, Commit, Layer, LayerResult, ValidatorSet, VerifyError};

/// Tunables the orchestrator needs beyond the trust root itself (spec §6.3).
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    /// Permitted gap between the last validator-set transition and the
    /// observed commit height (spec §6.3, default 0). Negative values are
    /// rejected by the config loader before they ever reach this type.
    pub max_height_skew: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { max_height_skew: 0 }
    }
}

pub struct Orchestrator {
    data_source: Arc<dyn DataSource>,
    trust_root: l4::TrustRoot,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        data_source: Arc<dyn DataSource>,
        trust_root: l4::TrustRoot,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            data_source,
            trust_root,
            config,
        }
    }

    /// Run the full four-layer pipeline for `url` and grade the result.
    #[instrument(skip(self, cancel), fields(account = %url))]
    pub async fn verify_account(
        &self,
        url: &str,
        cancel: CancellationToken,
    ) -> Result<verity_types::VerificationResult, VerifyError> {
        let mut layers: BTreeMap<Layer, LayerResult> = BTreeMap::new();

        let account_query = match self.data_source.query_account(url, &cancel).await {
            Ok(q) => q,
            Err(DataSourceError::Cancelled) => return Err(VerifyError::Cancelled),
            Err(DataSourceError::Transport(msg)) => {
                warn!(error = %msg, "query_account failed");
                layers.insert(
                    Layer::L1,
                    LayerResult::unavailable(VerifyError::ApiLimitation(msg)),
                );
                return Ok(verity_types::VerificationResult::new(url, layers));
            }
        };

        let record = AccountRecord::new(
            url,
            account_query.record_bytes.clone(),
            account_query.receipt.clone(),
        );
        let (l1_result, l1_output) = l1::verify_l1(&record);
        layers.insert(Layer::L1, l1_result);

        let Some(l1_output) = l1_output else {
            return Ok(verity_types::VerificationResult::new(url, layers));
        };

        let block_index = account_query.block_index;

        let block_header = match self.data_source.fetch_block(block_index, &cancel).await {
            Ok(b) => b,
            Err(DataSourceError::Cancelled) => return Err(VerifyError::Cancelled),
            Err(DataSourceError::Transport(msg)) => {
                warn!(error = %msg, "fetch_block failed");
                None
            }
        };

        let Some(block_header) = block_header else {
            layers.insert(
                Layer::L2,
                LayerResult::unavailable(VerifyError::ApiLimitation(
                    "block header unavailable".into(),
                )),
            );
            return Ok(verity_types::VerificationResult::new(url, layers));
        };

        let state_components = match self
            .data_source
            .fetch_state_components(block_index, &cancel)
            .await
        {
            Ok(sc) => sc,
            Err(DataSourceError::Cancelled) => return Err(VerifyError::Cancelled),
            Err(DataSourceError::Transport(msg)) => {
                warn!(error = %msg, "fetch_state_components failed");
                None
            }
        };

        let (l2_result, l2_output) = l2::verify_l2(l2::L2Input {
            partition_root: l1_output.partition_root,
            block_app_hash: block_header.app_hash,
            state_components,
        });
        layers.insert(Layer::L2, l2_result);

        let Some(l2_output) = l2_output else {
            return Ok(verity_types::VerificationResult::new(url, layers));
        };

        let commit = match self.data_source.fetch_commit(block_index, &cancel).await {
            Ok(c) => c,
            Err(DataSourceError::Cancelled) => return Err(VerifyError::Cancelled),
            Err(DataSourceError::Transport(msg)) => {
                warn!(error = %msg, "fetch_commit failed");
                Commit {
                    round: 0,
                    signatures: vec![],
                }
            }
        };

        let validator_set = match self
            .data_source
            .fetch_validator_set(block_index, &cancel)
            .await
        {
            Ok(vs) => vs,
            Err(DataSourceError::Cancelled) => return Err(VerifyError::Cancelled),
            Err(DataSourceError::Transport(msg)) => {
                warn!(error = %msg, "fetch_validator_set failed");
                layers.insert(
                    Layer::L3,
                    LayerResult::unavailable(VerifyError::ApiLimitation(msg)),
                );
                return Ok(verity_types::VerificationResult::new(url, layers));
            }
        };

        let (l3_result, l3_output) = l3::verify_l3(l3::L3Input {
            block_hash: block_header.block_hash,
            height: block_index,
            chain_id: block_header.chain_id.clone(),
            validator_set: validator_set.clone(),
            commit,
        });
        layers.insert(Layer::L3, l3_result);

        if l3_output.is_none() {
            return Ok(verity_types::VerificationResult::new(url, layers));
        }

        let l4_input = l4::L4Input {
            trust_root: self.trust_root.clone(),
            observed_set: validator_set,
            observed_height: block_index,
            transitions: vec![],
            max_height_skew: self.config.max_height_skew,
        };
        let (l4_result, _) = l4::verify_l4(l4_input);
        layers.insert(Layer::L4, l4_result);

        Ok(verity_types::VerificationResult::new(url, layers))
    }
}

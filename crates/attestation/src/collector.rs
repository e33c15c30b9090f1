//! The attestation collector (spec §4.9, §5).
//!
//! Shared mutable state is a single map keyed by `result_hash`, guarded by
//! one `tokio::sync::RwLock`. Writers are `add_attestation`/`try_aggregate`;
//! readers are `get_aggregated`/`get_count`. Once an entry is `finalized`
//! its signature set, bitfield, and validator list never change again.
//! Callers are notified of new aggregates through a `watch` channel, not a
//! callback, so they drive their own scheduling (spec §9).

use crate::message::{aggregate_hash, attestation_message, validator_snapshot_id};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::{watch, RwLock};
use verity_types::{Hash, PublicKey, Signature, ValidatorId, ValidatorSet, VerifyError};

/// A finished (or in-progress) aggregate for one `result_hash` (spec §4.9).
#[derive(Debug, Clone)]
pub struct AggregatedAttestation {
    pub result_hash: Hash,
    pub bundle_id: Vec<u8>,
    pub block_number: u64,
    pub message_hash: Hash,
    pub aggregate_sig: Vec<u8>,
    pub snapshot_id: Hash,
    pub validator_root: Hash,
    pub bitfield: verity_types::SignerBitfield,
    pub signed_power: i64,
    pub total_power: i64,
    pub threshold_met: bool,
    pub finalized: bool,
}

impl AggregatedAttestation {
    /// The canonical wire hash (spec §6.2), reproducible byte-for-byte.
    pub fn aggregate_hash(&self) -> Hash {
        aggregate_hash(
            self.result_hash,
            &self.bundle_id,
            self.message_hash,
            &self.aggregate_sig,
            self.snapshot_id,
            self.validator_root,
            &self.bitfield,
            self.signed_power,
        )
    }
}

struct Entry {
    bundle_id: Vec<u8>,
    block_number: u64,
    /// The message hash each validator (by index) signed — used to detect
    /// a conflicting submission (spec: "conflicting message hashes from the
    /// same validator ⇒ error").
    per_validator_message: BTreeMap<usize, Hash>,
    per_validator_sig: BTreeMap<usize, Vec<u8>>,
    bitfield: verity_types::SignerBitfield,
    finalized: bool,
    aggregated: Option<AggregatedAttestation>,
    notify: watch::Sender<()>,
}

impl Entry {
    fn new(bundle_id: Vec<u8>, block_number: u64, num_validators: usize) -> Self {
        let (notify, _) = watch::channel(());
        Self {
            bundle_id,
            block_number,
            per_validator_message: BTreeMap::new(),
            per_validator_sig: BTreeMap::new(),
            bitfield: verity_types::SignerBitfield::new(num_validators),
            finalized: false,
            aggregated: None,
            notify,
        }
    }
}

pub struct AttestationCollector {
    validator_set: ValidatorSet,
    validator_root: Hash,
    entries: RwLock<HashMap<Hash, Entry>>,
}

impl AttestationCollector {
    /// The validator-set snapshot is captured here and never mutated again
    /// for the lifetime of this collector (spec §5).
    pub fn new(validator_set: ValidatorSet) -> Self {
        let validator_root = validator_set.merkle_root();
        Self {
            validator_set,
            validator_root,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Record one validator's BLS attestation over `(result_hash, bundle_id,
    /// block_number)`. Unknown validators are ignored; unparseable
    /// signatures are skipped; a repeat of an identical message is a no-op;
    /// a conflicting message from the same validator is an error.
    pub async fn add_attestation(
        &self,
        validator_id: ValidatorId,
        result_hash: Hash,
        bundle_id: Vec<u8>,
        block_number: u64,
        signature: Signature,
    ) -> Result<(), VerifyError> {
        let index = validator_id.0 as usize;
        let Some(validator) = self.validator_set.validators.get(index) else {
            return Ok(()); // unknown validator: ignored
        };

        let message = attestation_message(result_hash, &bundle_id, block_number);

        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(result_hash)
            .or_insert_with(|| Entry::new(bundle_id.clone(), block_number, self.validator_set.validators.len()));

        if entry.finalized {
            return Ok(()); // immutable once finalized
        }

        if let Some(&existing) = entry.per_validator_message.get(&index) {
            if existing == message {
                return Ok(()); // identical repeat: first-accepted wins
            }
            tracing::warn!(validator = ?validator.address, %result_hash, "conflicting attestation message");
            return Err(VerifyError::ConflictingAttestation(validator.address.clone()));
        }

        let sig_valid = matches!(validator.pubkey, PublicKey::Bls12381(_))
            && validator.pubkey.verify(message.as_bytes(), &signature);
        if !sig_valid {
            return Ok(()); // unparseable/invalid signature: skipped, not an error
        }

        entry.per_validator_message.insert(index, message);
        entry.per_validator_sig.insert(index, signature.to_bytes());
        entry.bitfield.set(index);
        let _ = entry.notify.send(());

        Ok(())
    }

    /// Recompute the aggregate for `result_hash` from whatever has been
    /// collected so far, marking it `finalized` once quorum is met and every
    /// accepted attestation shares one message hash.
    pub async fn try_aggregate(&self, result_hash: Hash) -> Option<AggregatedAttestation> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&result_hash)?;

        if entry.finalized {
            return entry.aggregated.clone();
        }

        let distinct_messages: std::collections::HashSet<Hash> =
            entry.per_validator_message.values().copied().collect();

        let signed_power: i64 = entry
            .per_validator_message
            .keys()
            .map(|&idx| self.validator_set.validators[idx].voting_power)
            .sum();
        let total_power = self.validator_set.total_power;
        let threshold_met = signed_power >= ceil_threshold(total_power);
        let message_consistent = distinct_messages.len() <= 1;
        let finalized = threshold_met && message_consistent;

        let signatures: Vec<Signature> = entry
            .per_validator_sig
            .values()
            .map(|bytes| Signature::Bls12381(bytes.clone()))
            .collect();

        let aggregate_sig = if signatures.is_empty() {
            Vec::new()
        } else {
            Signature::aggregate_bls(&signatures)
                .map(|s| s.to_bytes())
                .unwrap_or_default()
        };

        let message_hash = distinct_messages
            .iter()
            .next()
            .copied()
            .unwrap_or(Hash::ZERO);
        let snapshot_id =
            validator_snapshot_id(entry.block_number, self.validator_root, total_power);

        let aggregated = AggregatedAttestation {
            result_hash,
            bundle_id: entry.bundle_id.clone(),
            block_number: entry.block_number,
            message_hash,
            aggregate_sig,
            snapshot_id,
            validator_root: self.validator_root,
            bitfield: entry.bitfield.clone(),
            signed_power,
            total_power,
            threshold_met,
            finalized,
        };

        entry.finalized = finalized;
        entry.aggregated = Some(aggregated.clone());
        if finalized {
            tracing::debug!(%result_hash, signed_power, total_power, "attestation finalized");
            let _ = entry.notify.send(());
        }

        Some(aggregated)
    }

    pub async fn get_aggregated(&self, result_hash: Hash) -> Option<AggregatedAttestation> {
        self.entries
            .read()
            .await
            .get(&result_hash)
            .and_then(|e| e.aggregated.clone())
    }

    pub async fn get_count(&self, result_hash: Hash) -> usize {
        self.entries
            .read()
            .await
            .get(&result_hash)
            .map(|e| e.bitfield.count())
            .unwrap_or(0)
    }

    /// A channel that fires whenever `result_hash`'s entry changes —
    /// callers drive their own scheduling rather than receiving a callback.
    pub async fn subscribe(&self, result_hash: Hash) -> Option<watch::Receiver<()>> {
        self.entries
            .read()
            .await
            .get(&result_hash)
            .map(|e| e.notify.subscribe())
    }
}

/// The attestation aggregator's quorum threshold is `⌈2·total/3⌉ + 1`,
/// distinct from L3's floor-based `⌊2·total/3⌋ + 1` (spec §4.9 vs §4.5).
fn ceil_threshold(total_power: i64) -> i64 {
    (2 * total_power).div_ceil(3) + 1
}

//! C3 — L1, account record to partition root (spec §4.3).

use crate::merkle::verify_receipt;
use verity_core::LayerVerifier;
use verity_types::{AccountRecord, Hash, LayerResult, VerifyError};

/// Values L1 hands to L2 once it has verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L1Output {
    pub partition_root: Hash,
    pub account_hash: Hash,
    pub block_index: u64,
}

/// Zero-sized marker implementing the shared `LayerVerifier` interface.
pub struct L1;

impl LayerVerifier for L1 {
    type Input = AccountRecord;
    type Output = L1Output;

    fn verify(record: AccountRecord) -> (LayerResult, Option<L1Output>) {
        verify_l1(&record)
    }
}

/// Verify that `record`'s data is included under its receipt's declared
/// anchor (the partition root), per spec §4.3.
pub fn verify_l1(record: &AccountRecord) -> (LayerResult, Option<L1Output>) {
    if record.receipt.path.is_empty() {
        let err = VerifyError::MalformedInput("L1 receipt path must not be empty".into());
        return (LayerResult::failed(err, vec![]), None);
    }

    let account_hash = Hash::from_bytes(&record.data);
    let partition_root = record.receipt.anchor;

    if verify_receipt(account_hash, &record.receipt) {
        let output = L1Output {
            partition_root,
            account_hash,
            block_index: record.receipt.origin_block,
        };
        (
            LayerResult::verified(vec![account_hash, partition_root]),
            Some(output),
        )
    } else {
        (
            LayerResult::failed(VerifyError::PathMismatch, vec![account_hash]),
            None,
        )
    }
}

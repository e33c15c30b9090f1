//! Account records (spec §3).

use crate::Receipt;

/// An account's opaque on-chain serialization plus its inclusion receipt.
///
/// `url` is the account's identity. `data` MUST be the partition's canonical
/// byte serialization delivered verbatim by the data source — this crate
/// never re-serializes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub url: String,
    pub data: Vec<u8>,
    pub receipt: Receipt,
}

impl AccountRecord {
    pub fn new(url: impl Into<String>, data: Vec<u8>, receipt: Receipt) -> Self {
        Self {
            url: url.into(),
            data,
            receipt,
        }
    }
}

//! JSON wire DTOs and their conversion into the core data model.
//!
//! Field names, hex/base64 conventions, and endpoint shapes are this
//! crate's business alone (spec §6.1) — nothing here leaks into
//! `verity-types` or `verity-core`.

use serde::Deserialize;
use verity_types::{
    AccountRecord, Commit, CommitSignature, Hash, PublicKey, Receipt, ReceiptEntry, Side,
    StateComponents, Validator, ValidatorSet, ValidatorSetError,
};

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid hex in field {0}")]
    InvalidHex(String),
    #[error("invalid hash length in field {0}")]
    InvalidHashLength(String),
    #[error("unknown public key type {0:?}")]
    UnknownKeyType(String),
    #[error("unknown receipt side {0:?}")]
    UnknownSide(String),
    #[error("validator set rejected: {0}")]
    InvalidValidatorSet(#[from] ValidatorSetError),
}

fn decode_hash(field: &'static str, s: &str) -> Result<Hash, WireError> {
    Hash::from_hex(s).map_err(|_| WireError::InvalidHashLength(field.to_string()))
}

fn decode_bytes(field: &'static str, s: &str) -> Result<Vec<u8>, WireError> {
    hex::decode(s).map_err(|_| WireError::InvalidHex(field.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct WireReceiptEntry {
    pub hash: String,
    pub side: String,
}

impl TryFrom<WireReceiptEntry> for ReceiptEntry {
    type Error = WireError;
    fn try_from(w: WireReceiptEntry) -> Result<Self, WireError> {
        let hash = decode_hash("receipt.path[].hash", &w.hash)?;
        let side = match w.side.as_str() {
            "left" | "LEFT" => Side::Left,
            "right" | "RIGHT" => Side::Right,
            other => return Err(WireError::UnknownSide(other.to_string())),
        };
        Ok(ReceiptEntry { hash, side })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireReceipt {
    pub path: Vec<WireReceiptEntry>,
    pub anchor: String,
    pub origin_block: u64,
}

impl TryFrom<WireReceipt> for Receipt {
    type Error = WireError;
    fn try_from(w: WireReceipt) -> Result<Self, WireError> {
        let path = w
            .path
            .into_iter()
            .map(ReceiptEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let anchor = decode_hash("receipt.anchor", &w.anchor)?;
        Ok(Receipt {
            path,
            anchor,
            origin_block: w.origin_block,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireAccountQuery {
    pub record_bytes: String,
    pub receipt: WireReceipt,
    pub block_index: u64,
    pub block_time: i64,
}

/// `AccountRecord` plus the envelope fields a `DataSource::query_account`
/// call returns alongside it (spec §6.1).
pub struct DecodedAccountQuery {
    pub record: AccountRecord,
    pub block_index: u64,
    pub block_time: i64,
}

impl WireAccountQuery {
    pub fn decode(self, url: &str) -> Result<DecodedAccountQuery, WireError> {
        let data = decode_bytes("record_bytes", &self.record_bytes)?;
        let receipt = Receipt::try_from(self.receipt)?;
        Ok(DecodedAccountQuery {
            record: AccountRecord::new(url.to_string(), data, receipt),
            block_index: self.block_index,
            block_time: self.block_time,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireBlockHeader {
    pub chain_id: String,
    pub app_hash: String,
    pub block_hash: String,
    pub time: i64,
}

impl TryFrom<WireBlockHeader> for verity_core::BlockHeader {
    type Error = WireError;
    fn try_from(w: WireBlockHeader) -> Result<Self, WireError> {
        Ok(verity_core::BlockHeader {
            chain_id: w.chain_id,
            app_hash: decode_hash("block.app_hash", &w.app_hash)?,
            block_hash: decode_hash("block.block_hash", &w.block_hash)?,
            time: w.time,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireStateComponents {
    pub main_chain_root: String,
    pub minor_roots: String,
    pub partition_root: String,
    pub receipt_root: String,
}

impl TryFrom<WireStateComponents> for StateComponents {
    type Error = WireError;
    fn try_from(w: WireStateComponents) -> Result<Self, WireError> {
        Ok(StateComponents {
            main_chain_root: decode_hash("state.main_chain_root", &w.main_chain_root)?,
            minor_roots: decode_hash("state.minor_roots", &w.minor_roots)?,
            partition_root: decode_hash("state.partition_root", &w.partition_root)?,
            receipt_root: decode_hash("state.receipt_root", &w.receipt_root)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireCommitSignature {
    pub address: String,
    pub timestamp: i64,
    /// Empty string means an absent vote.
    pub signature: String,
}

impl TryFrom<WireCommitSignature> for CommitSignature {
    type Error = WireError;
    fn try_from(w: WireCommitSignature) -> Result<Self, WireError> {
        Ok(CommitSignature {
            validator_address: decode_bytes("commit.signatures[].address", &w.address)?,
            timestamp: w.timestamp,
            signature: if w.signature.is_empty() {
                Vec::new()
            } else {
                decode_bytes("commit.signatures[].signature", &w.signature)?
            },
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireCommit {
    #[serde(default)]
    pub round: u32,
    pub signatures: Vec<WireCommitSignature>,
}

impl TryFrom<WireCommit> for Commit {
    type Error = WireError;
    fn try_from(w: WireCommit) -> Result<Self, WireError> {
        let signatures = w
            .signatures
            .into_iter()
            .map(CommitSignature::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Commit {
            round: w.round,
            signatures,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WirePublicKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub bytes: String,
}

impl TryFrom<WirePublicKey> for PublicKey {
    type Error = WireError;
    fn try_from(w: WirePublicKey) -> Result<Self, WireError> {
        let bytes = decode_bytes("validator.pubkey.bytes", &w.bytes)?;
        match w.key_type.as_str() {
            "ed25519" => {
                let arr: [u8; 32] = bytes
                    .try_into()
                    .map_err(|_| WireError::InvalidHashLength("validator.pubkey.bytes".into()))?;
                Ok(PublicKey::Ed25519(arr))
            }
            "bls12381" => Ok(PublicKey::Bls12381(bytes)),
            other => Err(WireError::UnknownKeyType(other.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireValidator {
    pub address: String,
    pub pubkey: WirePublicKey,
    pub voting_power: i64,
}

impl TryFrom<WireValidator> for Validator {
    type Error = WireError;
    fn try_from(w: WireValidator) -> Result<Self, WireError> {
        let address = decode_bytes("validator.address", &w.address)?;
        let pubkey = PublicKey::try_from(w.pubkey)?;
        Ok(Validator::new(address, pubkey, w.voting_power))
    }
}

#[derive(Debug, Deserialize)]
pub struct WireValidatorSet {
    pub height: u64,
    pub validators: Vec<WireValidator>,
    pub total_power: i64,
}

impl TryFrom<WireValidatorSet> for ValidatorSet {
    type Error = WireError;
    fn try_from(w: WireValidatorSet) -> Result<Self, WireError> {
        let validators = w
            .validators
            .into_iter()
            .map(Validator::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ValidatorSet::new(w.height, validators, w.total_power)?)
    }
}

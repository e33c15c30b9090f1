//! Canonical attestation messages and wire serialization (spec §4.9, §6.2).

use verity_types::{encode_bigint_be, Hash, SignerBitfield};

const RESULT_ATTESTATION_TAG: &[u8] = b"CERTEN_RESULT_ATTESTATION_V1";
const VALIDATOR_SNAPSHOT_TAG: &[u8] = b"CERTEN_VALIDATOR_SNAPSHOT_V1";
const AGGREGATED_ATTESTATION_TAG: &[u8] = b"CERTEN_AGGREGATED_ATTESTATION_V1";

/// The message an individual attester signs with BLS12-381 (spec §4.9).
pub fn attestation_message(result_hash: Hash, bundle_id: &[u8], block_number: u64) -> Hash {
    let block_be = encode_bigint_be(block_number);
    let mut buf = Vec::with_capacity(
        RESULT_ATTESTATION_TAG.len() + 32 + bundle_id.len() + block_be.len(),
    );
    buf.extend_from_slice(RESULT_ATTESTATION_TAG);
    buf.extend_from_slice(result_hash.as_bytes());
    buf.extend_from_slice(bundle_id);
    buf.extend_from_slice(&block_be);
    Hash::from_bytes(&buf)
}

/// Binds an aggregated attestation to the validator-set snapshot it was
/// produced against (spec §4.9).
pub fn validator_snapshot_id(block: u64, validator_root: Hash, total_weight: i64) -> Hash {
    let mut buf = Vec::with_capacity(VALIDATOR_SNAPSHOT_TAG.len() + 8 + 32 + 8);
    buf.extend_from_slice(VALIDATOR_SNAPSHOT_TAG);
    buf.extend_from_slice(&block.to_be_bytes());
    buf.extend_from_slice(validator_root.as_bytes());
    buf.extend_from_slice(&total_weight.to_be_bytes());
    Hash::from_bytes(&buf)
}

/// Canonical wire bytes for a finished aggregated attestation (spec §6.2).
/// `aggregate_hash = SHA256(wire_bytes(..))`.
#[allow(clippy::too_many_arguments)]
pub fn wire_bytes(
    result_hash: Hash,
    bundle_id: &[u8],
    message_hash: Hash,
    aggregate_sig: &[u8],
    snapshot_id: Hash,
    validator_root: Hash,
    bitfield: &SignerBitfield,
    signed_power: i64,
) -> Vec<u8> {
    let bitfield_bytes = bitfield_to_bytes(bitfield);
    let mut buf = Vec::with_capacity(
        AGGREGATED_ATTESTATION_TAG.len()
            + 32
            + bundle_id.len()
            + 32
            + aggregate_sig.len()
            + 32
            + 32
            + bitfield_bytes.len()
            + 8,
    );
    buf.extend_from_slice(AGGREGATED_ATTESTATION_TAG);
    buf.extend_from_slice(result_hash.as_bytes());
    buf.extend_from_slice(bundle_id);
    buf.extend_from_slice(message_hash.as_bytes());
    buf.extend_from_slice(aggregate_sig);
    buf.extend_from_slice(snapshot_id.as_bytes());
    buf.extend_from_slice(validator_root.as_bytes());
    buf.extend_from_slice(&bitfield_bytes);
    buf.extend_from_slice(&signed_power.to_be_bytes());
    buf
}

pub fn aggregate_hash(
    result_hash: Hash,
    bundle_id: &[u8],
    message_hash: Hash,
    aggregate_sig: &[u8],
    snapshot_id: Hash,
    validator_root: Hash,
    bitfield: &SignerBitfield,
    signed_power: i64,
) -> Hash {
    let bytes = wire_bytes(
        result_hash,
        bundle_id,
        message_hash,
        aggregate_sig,
        snapshot_id,
        validator_root,
        bitfield,
        signed_power,
    );
    Hash::from_bytes(&bytes)
}

fn bitfield_to_bytes(bitfield: &SignerBitfield) -> Vec<u8> {
    let mut bytes = vec![0u8; bitfield.num_validators().div_ceil(8)];
    for idx in bitfield.set_indices() {
        bytes[idx / 8] |= 1 << (idx % 8);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attestation_message_is_deterministic() {
        let r = Hash::from_bytes(b"result");
        let a = attestation_message(r, b"bundle", 42);
        let b = attestation_message(r, b"bundle", 42);
        assert_eq!(a, b);
    }

    #[test]
    fn attestation_message_distinguishes_block_number() {
        let r = Hash::from_bytes(b"result");
        let a = attestation_message(r, b"bundle", 42);
        let b = attestation_message(r, b"bundle", 43);
        assert_ne!(a, b);
    }

    #[test]
    fn wire_round_trip_reproduces_aggregate_hash() {
        let result_hash = Hash::from_bytes(b"result");
        let message_hash = Hash::from_bytes(b"message");
        let snapshot_id = Hash::from_bytes(b"snapshot");
        let validator_root = Hash::from_bytes(b"root");
        let mut bitfield = SignerBitfield::new(4);
        bitfield.set(0);
        bitfield.set(2);

        let expected = aggregate_hash(
            result_hash,
            b"bundle",
            message_hash,
            b"sig-bytes",
            snapshot_id,
            validator_root,
            &bitfield,
            75,
        );

        let bytes = wire_bytes(
            result_hash,
            b"bundle",
            message_hash,
            b"sig-bytes",
            snapshot_id,
            validator_root,
            &bitfield,
            75,
        );
        assert_eq!(Hash::from_bytes(&bytes), expected);
    }
}

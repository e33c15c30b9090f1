//! Canonical big-endian encoding helpers used to build domain-separated
//! signing/hashing messages (spec §4.1).

/// Encode a `u64` as 8 big-endian bytes.
pub fn encode_u64_be(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Encode a non-negative integer as minimal big-endian bytes: no leading
/// zero bytes, except a single `0x00` to represent the value zero itself.
pub fn encode_bigint_be(value: u64) -> Vec<u8> {
    if value == 0 {
        return vec![0u8];
    }
    let full = value.to_be_bytes();
    let first_nonzero = full.iter().position(|&b| b != 0).unwrap();
    full[first_nonzero..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u64_be_roundtrips() {
        let bytes = encode_u64_be(0x0102030405060708);
        assert_eq!(bytes, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
    }

    #[test]
    fn bigint_zero_is_single_byte() {
        assert_eq!(encode_bigint_be(0), vec![0u8]);
    }

    #[test]
    fn bigint_strips_leading_zero_bytes() {
        assert_eq!(encode_bigint_be(0xFF), vec![0xFF]);
        assert_eq!(encode_bigint_be(0x0100), vec![0x01, 0x00]);
        assert_eq!(encode_bigint_be(1), vec![0x01]);
    }
}

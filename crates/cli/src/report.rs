//! Human-readable trust report and exit-code mapping (spec §6.4).

use verity_types::{Layer, TrustLevel, VerificationResult};

/// `0` fully verified; `1` partially verified; `2` verification error;
/// `3` configuration error; `4` cancelled.
pub const EXIT_FULLY_VERIFIED: i32 = 0;
pub const EXIT_PARTIALLY_VERIFIED: i32 = 1;
pub const EXIT_VERIFICATION_ERROR: i32 = 2;
pub const EXIT_CONFIG_ERROR: i32 = 3;
pub const EXIT_CANCELLED: i32 = 4;

pub fn print_report(result: &VerificationResult) {
    println!("account: {}", result.account);
    println!("trust level: {:?}", result.trust_level);
    println!("fully verified: {}", result.fully_verified);
    for layer in [Layer::L1, Layer::L2, Layer::L3, Layer::L4] {
        match result.layers.get(&layer) {
            Some(layer_result) => {
                let status = if layer_result.verified {
                    "verified".to_string()
                } else if layer_result.api_limitation {
                    "unavailable".to_string()
                } else {
                    format!("failed ({:?})", layer_result.error)
                };
                println!("  {layer:?}: {status}");
            }
            None => println!("  {layer:?}: not attempted"),
        }
    }
}

pub fn exit_code(result: &VerificationResult) -> i32 {
    if result.trust_level == TrustLevel::ZeroTrust {
        EXIT_FULLY_VERIFIED
    } else {
        EXIT_PARTIALLY_VERIFIED
    }
}

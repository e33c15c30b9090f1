//! The Merkle receipt primitive, the four proof-layer verifiers, and the
//! receipt stitcher.

pub mod l1;
pub mod l2;
pub mod l3;
pub mod l4;
pub mod merkle;
pub mod stitch;

pub use l1::{verify_l1, L1Output, L1};
pub use l2::{verify_l2, L2Input, L2Output, L2};
pub use l3::{quorum_threshold, verify_l3, vote_sign_bytes, L3Input, L3Output, L3};
pub use l4::{verify_l4, L4Input, TransitionStep, TrustRoot, L4};
pub use merkle::{evaluate_path, verify_receipt};
pub use stitch::stitch;

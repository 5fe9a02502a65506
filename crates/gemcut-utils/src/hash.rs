//!
//! Keccak-256 hashing utilities.
//!
//! Function selectors and event topics on EVM-compatible runtimes are derived
//! from the *original* Keccak-256 (pre-NIST padding), not SHA3-256. Both are
//! exposed by the `sha3` crate; only `Keccak256` is used here.
//!
//! Reference: <https://docs.soliditylang.org/en/latest/abi-spec.html#function-selector>
//!
use sha3::{Digest, Keccak256};

/// Return the 32-byte keccak-256 digest of `bytes`.
#[must_use]
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    let digest = Keccak256::digest(bytes);

    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Return the first four bytes of the keccak-256 digest of `bytes`.
#[must_use]
pub fn keccak256_prefix4(bytes: &[u8]) -> [u8; 4] {
    let digest = keccak256(bytes);

    [digest[0], digest[1], digest[2], digest[3]]
}

///
/// TESTS
///

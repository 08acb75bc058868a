//! Cryptographic primitives for CREATE2 address derivation.
//!
//! This module provides:
//! - Keccak-256 hashing and the once-per-search bytecode digest
//! - The 20-byte `Address` and 256-bit `Salt` value types
//! - CREATE2 address derivation

mod address;
pub mod create2;
mod salt;

pub use address::{is_valid_address, Address};
pub use create2::{compute_address, derive_address};
pub use salt::Salt;

use tiny_keccak::{Hasher, Keccak};

use crate::error::SearchError;

/// Keccak-256 of arbitrary bytes (output 32 bytes).
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(input);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Digest of the contract init code. Invariant across every candidate salt,
/// so a search computes it exactly once.
#[inline]
pub fn hash_bytecode(bytecode: &[u8]) -> [u8; 32] {
    keccak256(bytecode)
}

/// Decodes `0x`-prefixed (or bare) bytecode hex. `"0x"` is the empty bytecode.
pub fn parse_bytecode(s: &str) -> Result<Vec<u8>, SearchError> {
    let h = strip_hex_prefix(s.trim());
    hex::decode(h).map_err(|e| SearchError::InvalidBytecode(format!("{}: {}", s, e)))
}

pub(crate) fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

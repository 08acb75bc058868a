//! 20-byte address representation and utilities.

use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

use super::strip_hex_prefix;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A 20-byte account or contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Creates an address from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the address as raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Builds an address from a slice, which must be exactly 20 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SearchError> {
        let arr: [u8; 20] = bytes.try_into().map_err(|_| {
            SearchError::InvalidAddress(format!("expected 20 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    /// Returns the address as a lowercase hex string (without 0x prefix).
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the canonical form: 0x prefix, 40 lowercase hex digits.
    pub fn to_hex_prefixed(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// Canonical lowercase form rendered into a stack buffer.
    ///
    /// The search loop calls this for every candidate, so it must not touch
    /// the heap.
    #[inline]
    pub fn to_canonical_ascii(&self) -> [u8; 42] {
        let mut out = [0u8; 42];
        out[0] = b'0';
        out[1] = b'x';
        for (i, byte) in self.0.iter().enumerate() {
            out[2 + i * 2] = HEX_DIGITS[(byte >> 4) as usize];
            out[3 + i * 2] = HEX_DIGITS[(byte & 0x0f) as usize];
        }
        out
    }

    /// Returns the address with checksum encoding (EIP-55).
    pub fn to_checksum(&self) -> String {
        let hex_addr = self.to_hex();
        let hash = super::keccak256(hex_addr.as_bytes());

        let mut checksum = String::with_capacity(42);
        checksum.push_str("0x");

        for (i, c) in hex_addr.chars().enumerate() {
            let hash_byte = hash[i / 2];
            let hash_nibble = if i % 2 == 0 {
                hash_byte >> 4
            } else {
                hash_byte & 0x0f
            };

            if c.is_ascii_digit() || hash_nibble < 8 {
                checksum.push(c);
            } else {
                checksum.push(c.to_ascii_uppercase());
            }
        }

        checksum
    }
}

impl FromStr for Address {
    type Err = SearchError;

    /// Parses 40 hex digits with an optional 0x prefix. Case is ignored;
    /// checksums are not enforced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let h = strip_hex_prefix(s.trim());
        if h.len() != 40 || !h.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SearchError::InvalidAddress(format!(
                "{:?} must be 20 bytes (40 hex chars)",
                s
            )));
        }
        let bytes = hex::decode(h).map_err(|e| SearchError::InvalidAddress(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}

/// Returns true if `s` parses as a 20-byte address and, when its hex digits
/// mix upper and lower case, carries a correct EIP-55 checksum.
///
/// All-lowercase and all-uppercase input carries no checksum and is accepted.
pub fn is_valid_address(s: &str) -> bool {
    let Ok(address) = s.parse::<Address>() else {
        return false;
    };
    let digits = strip_hex_prefix(s.trim());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    if has_upper && has_lower {
        address.to_checksum()[2..] == *digits
    } else {
        true
    }
}

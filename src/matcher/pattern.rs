//! Substring pattern over canonical `0x…` address strings.

use std::fmt;
use std::str::FromStr;

use crate::crypto::Address;
use crate::error::SearchError;

/// Length of the canonical address string, prefix included.
const CANONICAL_LEN: usize = 42;

/// A case-insensitive pattern that must occur somewhere in the canonical
/// lowercase address string.
///
/// The scan covers the full string including the `0x` prefix, so a pattern
/// such as `x0d` matches addresses whose first hex digits are `0d`.
#[derive(Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Lowercased once at construction.
    needle: String,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, SearchError> {
        if pattern.is_empty() {
            return Err(SearchError::InvalidPattern("Pattern cannot be empty".into()));
        }
        let needle = pattern.to_ascii_lowercase();
        if !needle.chars().all(|c| c.is_ascii_hexdigit() || c == 'x') {
            return Err(SearchError::InvalidPattern(format!(
                "{:?} must contain only hex characters (0-9, a-f) or the 0x prefix",
                pattern
            )));
        }
        // The canonical string holds a single 'x', at index 1 after a '0'.
        let max_len = match needle.find('x') {
            None => CANONICAL_LEN - 2,
            Some(0) => CANONICAL_LEN - 1,
            Some(1) if needle.starts_with('0') => CANONICAL_LEN,
            Some(_) => {
                return Err(SearchError::InvalidPattern(format!(
                    "{:?} can never match: 'x' may only appear as part of a leading 0x",
                    pattern
                )))
            }
        };
        if needle.matches('x').count() > 1 {
            return Err(SearchError::InvalidPattern(format!(
                "{:?} can never match: an address contains a single 'x'",
                pattern
            )));
        }
        if needle.len() > max_len {
            return Err(SearchError::InvalidPattern(format!(
                "{:?} is longer than the {} characters it could match",
                pattern, max_len
            )));
        }
        Ok(Self { needle })
    }

    /// The normalized (lowercase) pattern.
    pub fn as_str(&self) -> &str {
        &self.needle
    }

    pub fn len(&self) -> usize {
        self.needle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Zero-allocation match: renders the address on the stack and scans it.
    #[inline]
    pub fn matches(&self, address: &Address) -> bool {
        self.matches_canonical(&address.to_canonical_ascii())
    }

    /// Match against an already rendered canonical string.
    #[inline]
    pub fn matches_canonical(&self, canonical: &[u8]) -> bool {
        let needle = self.needle.as_bytes();
        needle.len() <= canonical.len() && canonical.windows(needle.len()).any(|w| w == needle)
    }

    /// Expected number of candidates before a hit, assuming uniformly random
    /// hex digits after the prefix.
    pub fn estimated_difficulty(&self) -> u64 {
        let hex_only = self.needle.trim_start_matches("0x").trim_start_matches('x');
        let anchored = hex_only.len() != self.needle.len();
        let n = hex_only.len();
        if n == 0 {
            return 1;
        }
        let space = 16u64.saturating_pow(n as u32);
        // Unanchored patterns may land at any of the (41 - n) offsets.
        let positions = if anchored { 1 } else { (41 - n.min(40)) as u64 };
        (space / positions).max(1)
    }

    pub fn difficulty_description(&self) -> String {
        let d = self.estimated_difficulty();
        match d {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=100_000 => "Easy (seconds)".into(),
            100_001..=10_000_000 => "Medium (minutes)".into(),
            10_000_001..=1_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}

impl FromStr for Pattern {
    type Err = SearchError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.needle)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(hex_str: &str) -> Address {
        hex_str.parse().unwrap()
    }

    #[test]
    fn test_contains() {
        let p = Pattern::new("cafe").unwrap();
        assert!(p.matches(&addr("0000000000000000cafe00000000000000000000")));
        assert!(p.matches(&addr("cafe000000000000000000000000000000000000")));
        assert!(p.matches(&addr("000000000000000000000000000000000000cafe")));
        assert!(!p.matches(&addr("0000000000000000caf0e0000000000000000000")));
    }

    #[test]
    fn test_case_insensitive() {
        let p = Pattern::new("CaFe").unwrap();
        assert_eq!(p.as_str(), "cafe");
        assert!(p.matches(&addr("0x0000000000000000CAFE00000000000000000000")));
    }

    #[test]
    fn test_prefix_boundary() {
        let p = Pattern::new("x0d").unwrap();
        assert!(p.matches(&addr("0d00000000000000000000000000000000000000")));
        assert!(!p.matches(&addr("d000000000000000000000000000000000000000")));

        let full = Pattern::new("0xdead").unwrap();
        assert!(full.matches(&addr("dead000000000000000000000000000000000000")));
        assert!(!full.matches(&addr("00dead0000000000000000000000000000000000")));
    }

    #[test]
    fn test_leading_zero_matches_prefix_digit() {
        // The literal "0" of the prefix is part of the scanned string.
        let p = Pattern::new("0x").unwrap();
        assert!(p.matches(&addr("ffffffffffffffffffffffffffffffffffffffff")));
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(Pattern::new(""), Err(SearchError::InvalidPattern(_))));
        assert!(matches!(Pattern::new("cafg"), Err(SearchError::InvalidPattern(_))));
        assert!(matches!(
            Pattern::new(&"a".repeat(43)),
            Err(SearchError::InvalidPattern(_))
        ));
        assert!(Pattern::new(&format!("0x{}", "a".repeat(40))).is_ok());
        assert!(Pattern::new(&format!("x{}", "a".repeat(40))).is_ok());
        assert!(Pattern::new(&"a".repeat(40)).is_ok());
        assert!(matches!(
            Pattern::new(&"a".repeat(41)),
            Err(SearchError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_rejects_misplaced_x() {
        for never in ["ax", "xx", "0x0x", "dx", "00x", "1x"] {
            assert!(
                matches!(Pattern::new(never), Err(SearchError::InvalidPattern(_))),
                "{} should be rejected",
                never
            );
        }
        for ok in ["x0d", "0xdead", "X", "0X", "0xab"] {
            assert!(Pattern::new(ok).is_ok(), "{} should be accepted", ok);
        }
    }

    #[test]
    fn test_difficulty() {
        assert_eq!(Pattern::new("0x").unwrap().estimated_difficulty(), 1);
        assert_eq!(Pattern::new("0xab").unwrap().estimated_difficulty(), 256);
        assert!(
            Pattern::new("abcd").unwrap().estimated_difficulty()
                < Pattern::new("0xabcd").unwrap().estimated_difficulty()
        );
        assert_eq!(
            Pattern::new("a").unwrap().difficulty_description(),
            "Very Easy (< 1 second)"
        );
        assert_eq!(
            Pattern::new(&"a".repeat(12)).unwrap().difficulty_description(),
            "Very Hard (days or more)"
        );
    }
}

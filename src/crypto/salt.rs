//! 256-bit salt values.

use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

use super::strip_hex_prefix;

/// A 256-bit unsigned salt, stored big-endian so that the derived ordering
/// is numeric ordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Salt([u8; 32]);

impl Salt {
    pub const ZERO: Salt = Salt([0u8; 32]);
    pub const MAX: Salt = Salt([0xffu8; 32]);

    #[inline]
    pub const fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The 32-byte left-padded form that goes into the CREATE2 preimage.
    #[inline]
    pub const fn as_be_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// `self + rhs`, or `None` past 2^256 - 1.
    pub fn checked_add(&self, rhs: u64) -> Option<Salt> {
        let mut out = self.0;
        let mut carry = rhs as u128;
        for byte in out.iter_mut().rev() {
            if carry == 0 {
                break;
            }
            let sum = *byte as u128 + (carry & 0xff);
            *byte = sum as u8;
            carry = (carry >> 8) + (sum >> 8);
        }
        if carry == 0 {
            Some(Salt(out))
        } else {
            None
        }
    }

    /// `self - base` when `self >= base` and the distance fits in a u64.
    pub fn offset_from(&self, base: &Salt) -> Option<u64> {
        if self < base {
            return None;
        }
        let mut diff = [0u8; 32];
        let mut borrow = 0i16;
        for i in (0..32).rev() {
            let mut d = self.0[i] as i16 - base.0[i] as i16 - borrow;
            borrow = 0;
            if d < 0 {
                d += 256;
                borrow = 1;
            }
            diff[i] = d as u8;
        }
        if diff[..24].iter().any(|&b| b != 0) {
            return None;
        }
        let mut low = [0u8; 8];
        low.copy_from_slice(&diff[24..]);
        Some(u64::from_be_bytes(low))
    }

    /// Minimal big-endian hex with 0x prefix, an even number of digits;
    /// zero renders as `0x00`.
    pub fn to_hex(&self) -> String {
        let start = self
            .0
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(self.0.len() - 1);
        format!("0x{}", hex::encode(&self.0[start..]))
    }

    /// Full 32-byte hex with 0x prefix.
    pub fn to_hex_padded(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Decimal rendering, without a bigint crate.
    pub fn to_decimal(&self) -> String {
        let Some(start) = self.0.iter().position(|&b| b != 0) else {
            return "0".to_string();
        };

        // Decimal digits, least significant first.
        let mut digits: Vec<u8> = vec![0];
        for &byte in &self.0[start..] {
            let mut carry = byte as u32;
            for d in digits.iter_mut() {
                let val = (*d as u32) * 256 + carry;
                *d = (val % 10) as u8;
                carry = val / 10;
            }
            while carry > 0 {
                digits.push((carry % 10) as u8);
                carry /= 10;
            }
        }

        digits.iter().rev().map(|d| (b'0' + d) as char).collect()
    }

    fn parse_hex(h: &str, original: &str) -> Result<Self, SearchError> {
        if h.is_empty() || !h.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SearchError::InvalidSalt(format!("{:?} is not hex", original)));
        }
        let h = h.trim_start_matches('0');
        if h.len() > 64 {
            return Err(SearchError::InvalidSalt(format!(
                "{:?} does not fit in 256 bits",
                original
            )));
        }
        let padded = format!("{:0>64}", h);
        let bytes = hex::decode(padded).map_err(|e| SearchError::InvalidSalt(e.to_string()))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    fn parse_decimal(s: &str) -> Result<Self, SearchError> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(SearchError::InvalidSalt(format!(
                "{:?} is neither 0x-hex nor decimal",
                s
            )));
        }
        let mut out = [0u8; 32];
        for digit in s.bytes().map(|b| (b - b'0') as u32) {
            // out = out * 10 + digit
            let mut carry = digit;
            for byte in out.iter_mut().rev() {
                let val = (*byte as u32) * 10 + carry;
                *byte = (val & 0xff) as u8;
                carry = val >> 8;
            }
            if carry != 0 {
                return Err(SearchError::InvalidSalt(format!(
                    "{:?} does not fit in 256 bits",
                    s
                )));
            }
        }
        Ok(Self(out))
    }
}

impl From<u64> for Salt {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl FromStr for Salt {
    type Err = SearchError;

    /// Accepts `0x`-prefixed hex (up to 64 significant digits) or a decimal
    /// integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let h = strip_hex_prefix(t);
        if h.len() != t.len() {
            Self::parse_hex(h, s)
        } else {
            Self::parse_decimal(t)
        }
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({})", self.to_hex())
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_hex() {
        assert_eq!(Salt::ZERO.to_hex(), "0x00");
        assert_eq!(Salt::from_u64(1).to_hex(), "0x01");
        assert_eq!(Salt::from_u64(255).to_hex(), "0xff");
        assert_eq!(Salt::from_u64(256).to_hex(), "0x0100");
        assert_eq!(
            Salt::from_u64(1).to_hex_padded(),
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_parse_hex_and_decimal() {
        assert_eq!("0x0100".parse::<Salt>().unwrap(), Salt::from_u64(256));
        assert_eq!("0x100".parse::<Salt>().unwrap(), Salt::from_u64(256));
        assert_eq!("256".parse::<Salt>().unwrap(), Salt::from_u64(256));
        assert_eq!("0".parse::<Salt>().unwrap(), Salt::ZERO);
        assert_eq!(
            format!("0x{}", "ff".repeat(32)).parse::<Salt>().unwrap(),
            Salt::MAX
        );
        // Leading zeros beyond 64 digits are harmless.
        assert_eq!(
            format!("0x00{}", "ff".repeat(32)).parse::<Salt>().unwrap(),
            Salt::MAX
        );
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        let too_big = format!("0x1{}", "00".repeat(32));
        assert!(matches!(too_big.parse::<Salt>(), Err(SearchError::InvalidSalt(_))));

        // 2^256 in decimal
        let two_256 =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(matches!(two_256.parse::<Salt>(), Err(SearchError::InvalidSalt(_))));

        assert!("0x".parse::<Salt>().is_err());
        assert!("-1".parse::<Salt>().is_err());
        assert!("12ab".parse::<Salt>().is_err());
    }

    #[test]
    fn test_decimal_round_trip_of_max() {
        assert_eq!(
            Salt::MAX.to_decimal(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
        assert_eq!(Salt::MAX.to_decimal().parse::<Salt>().unwrap(), Salt::MAX);
        assert_eq!(Salt::ZERO.to_decimal(), "0");
        assert_eq!(Salt::from_u64(1_000_000).to_decimal(), "1000000");
    }

    #[test]
    fn test_checked_add_carries() {
        assert_eq!(Salt::from_u64(255).checked_add(1), Some(Salt::from_u64(256)));
        assert_eq!(
            Salt::from_u64(u64::MAX).checked_add(1).unwrap().to_hex(),
            "0x010000000000000000"
        );
        assert_eq!(Salt::MAX.checked_add(0), Some(Salt::MAX));
        assert_eq!(Salt::MAX.checked_add(1), None);
    }

    #[test]
    fn test_offset_from() {
        let base = Salt::from_u64(u64::MAX);
        let later = base.checked_add(10).unwrap();
        assert_eq!(later.offset_from(&base), Some(10));
        assert_eq!(base.offset_from(&later), None);
        assert_eq!(Salt::MAX.offset_from(&Salt::ZERO), None);
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert!(Salt::from_u64(256) > Salt::from_u64(255));
        assert!(Salt::from_u64(u64::MAX).checked_add(1).unwrap() > Salt::from_u64(u64::MAX));
    }
}

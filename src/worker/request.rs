//! Search inputs, results, and the lazy candidate stream.

use crate::crypto::{derive_address, hash_bytecode, parse_bytecode, Address, Salt};
use crate::error::SearchError;
use crate::matcher::Pattern;

use super::SearchCandidate;

/// Everything a search needs, with the bytecode already hashed.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    deployer: Address,
    bytecode_hash: [u8; 32],
    pattern: Pattern,
    start_salt: Salt,
}

impl SearchRequest {
    /// Hashes `bytecode` once; every candidate reuses the digest.
    pub fn new(deployer: Address, bytecode: &[u8], pattern: Pattern) -> Self {
        Self::with_bytecode_hash(deployer, hash_bytecode(bytecode), pattern)
    }

    pub fn with_bytecode_hash(deployer: Address, bytecode_hash: [u8; 32], pattern: Pattern) -> Self {
        Self {
            deployer,
            bytecode_hash,
            pattern,
            start_salt: Salt::ZERO,
        }
    }

    /// Parses hex/string inputs. Fails with `InvalidAddress`,
    /// `InvalidBytecode` or `InvalidPattern`.
    pub fn parse(deployer: &str, bytecode: &str, pattern: &str) -> Result<Self, SearchError> {
        let deployer: Address = deployer.parse()?;
        let bytecode = parse_bytecode(bytecode)?;
        let pattern = Pattern::new(pattern)?;
        Ok(Self::new(deployer, &bytecode, pattern))
    }

    pub fn start_at(mut self, start_salt: Salt) -> Self {
        self.start_salt = start_salt;
        self
    }

    pub fn deployer(&self) -> &Address {
        &self.deployer
    }

    pub fn bytecode_hash(&self) -> &[u8; 32] {
        &self.bytecode_hash
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn start_salt(&self) -> &Salt {
        &self.start_salt
    }

    #[inline]
    pub fn derive(&self, salt: &Salt) -> Address {
        derive_address(&self.deployer, salt, &self.bytecode_hash)
    }

    /// Lazily evaluated candidates from the start salt upward.
    pub fn candidates(&self) -> Candidates {
        Candidates {
            deployer: self.deployer,
            bytecode_hash: self.bytecode_hash,
            next: Some(self.start_salt),
            iteration: 0,
        }
    }
}

/// Result of a successful search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub salt: Salt,
    pub address: Address,
    /// `salt - start_salt`.
    pub iterations: u64,
}

impl SearchResult {
    /// Salt as minimal 0x-hex.
    pub fn salt_hex(&self) -> String {
        self.salt.to_hex()
    }

    /// Salt as decimal string.
    pub fn salt_decimal(&self) -> String {
        self.salt.to_decimal()
    }

    /// Address as checksummed hex (0x...).
    pub fn address_checksum(&self) -> String {
        self.address.to_checksum()
    }
}

/// Step-at-a-time candidate stream; ends only when the salt space does.
#[derive(Debug, Clone)]
pub struct Candidates {
    deployer: Address,
    bytecode_hash: [u8; 32],
    next: Option<Salt>,
    iteration: u64,
}

impl Iterator for Candidates {
    type Item = SearchCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        let salt = self.next?;
        let address = derive_address(&self.deployer, &salt, &self.bytecode_hash);
        let candidate = SearchCandidate {
            iteration: self.iteration,
            salt,
            address,
        };
        self.next = salt.checked_add(1);
        self.iteration += 1;
        Some(candidate)
    }
}

//! CREATE2 address computation (EIP-1014).
//!
//!   address = keccak256(0xff ++ deployer ++ salt ++ keccak256(init_code))[12..32]

use crate::error::SearchError;

use super::{hash_bytecode, keccak256, parse_bytecode, Address, Salt};

/// Computes the CREATE2 deployment address.
/// Preimage: 0xff (1) || deployer (20) || salt (32) || bytecode_hash (32) = 85 bytes.
/// Address = keccak256(preimage)[12..32].
#[inline]
pub fn derive_address(deployer: &Address, salt: &Salt, bytecode_hash: &[u8; 32]) -> Address {
    let mut preimage = [0u8; 85];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(deployer.as_bytes());
    preimage[21..53].copy_from_slice(salt.as_be_bytes());
    preimage[53..85].copy_from_slice(bytecode_hash);

    let hash = keccak256(&preimage);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::from_bytes(addr)
}

/// String-level derivation: parses the deployer, salt (hex or decimal) and
/// bytecode hex, then derives the address.
pub fn compute_address(deployer: &str, salt: &str, bytecode: &str) -> Result<Address, SearchError> {
    let deployer: Address = deployer.parse()?;
    let salt: Salt = salt.parse()?;
    let bytecode = parse_bytecode(bytecode)?;
    Ok(derive_address(&deployer, &salt, &hash_bytecode(&bytecode)))
}

//! Deployment submission.
//!
//! A faithful submitter must land the contract at
//! `derive_address(deployer, salt, keccak256(bytecode))`.

use std::thread;
use std::time::Duration;

use rand::RngCore;
use tracing::info;

use crate::crypto::{derive_address, hash_bytecode, Address, Salt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub tx_hash: [u8; 32],
    pub address: Address,
}

impl Deployment {
    pub fn tx_hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.tx_hash))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("Deployment rejected: {0}")]
    Rejected(String),
}

pub trait DeploymentSubmitter {
    fn deploy(&self, deployer: &Address, salt: &Salt, bytecode: &[u8]) -> Result<Deployment, DeployError>;
}

/// Pretends to deploy: sleeps for `latency`, then returns a random
/// transaction hash and the derived address. Nothing is sent anywhere.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDeployer {
    latency: Duration,
}

impl SimulatedDeployer {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl DeploymentSubmitter for SimulatedDeployer {
    fn deploy(&self, deployer: &Address, salt: &Salt, bytecode: &[u8]) -> Result<Deployment, DeployError> {
        let address = derive_address(deployer, salt, &hash_bytecode(bytecode));
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let mut tx_hash = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut tx_hash);

        let deployment = Deployment { tx_hash, address };
        info!(
            tx = %deployment.tx_hash_hex(),
            address = %address,
            salt = %salt,
            "simulated deployment"
        );
        Ok(deployment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_address_matches_deriver() {
        let deployer: Address = "0x00000000000000000000000000000000deadbeef".parse().unwrap();
        let salt: Salt = "0xcafebabe".parse().unwrap();
        let bytecode = [0xde, 0xad, 0xbe, 0xef];

        let deployment = SimulatedDeployer::default()
            .deploy(&deployer, &salt, &bytecode)
            .unwrap();
        assert_eq!(
            deployment.address.to_checksum(),
            "0x60f3f640a8508fC6a86d45DF051962668E1e8AC7"
        );
        assert_eq!(deployment.tx_hash_hex().len(), 66);
    }

    #[test]
    fn test_tx_hashes_differ() {
        let deployer = Address::from_bytes([1u8; 20]);
        let deployer_impl = SimulatedDeployer::new(Duration::from_millis(1));
        let a = deployer_impl.deploy(&deployer, &Salt::ZERO, &[]).unwrap();
        let b = deployer_impl.deploy(&deployer, &Salt::ZERO, &[]).unwrap();
        assert_eq!(a.address, b.address);
        assert_ne!(a.tx_hash, b.tx_hash);
    }
}

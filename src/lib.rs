//! # salt_optimizer
//!
//! CREATE2 salt optimizer. Scans salts in increasing order until the
//! deterministic deployment address contains a desired hex pattern.
//!
//! address = keccak256(0xff || deployer || salt || keccak256(init_code))[12..32]
//!
//! ## Architecture
//!
//! - `crypto`: Keccak-256, address and salt types, CREATE2 derivation
//! - `matcher`: Substring pattern over canonical `0x…` addresses
//! - `worker`: Sequential search, parallel worker pool, progress, cancellation
//! - `recommend` / `deploy`: Pluggable collaborators outside the search core
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod deploy;
pub mod error;
pub mod format;
pub mod matcher;
pub mod recommend;
pub mod worker;

pub use config::Config;
pub use crypto::{compute_address, derive_address, hash_bytecode, Address, Salt};
pub use error::SearchError;
pub use matcher::Pattern;
pub use worker::{
    find_salt, search, CancellationToken, CandidateWindow, ProgressSink, SearchCandidate,
    SearchRequest, SearchResult, WorkerPool,
};

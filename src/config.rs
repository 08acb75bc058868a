//! Runtime configuration for the salt optimizer CLI.

use clap::Parser;

use crate::crypto::{parse_bytecode, Address, Salt};
use crate::error::SearchError;
use crate::format::SAMPLE_BYTECODE;
use crate::matcher::Pattern;
use crate::recommend::OptimizationGoal;
use crate::worker::SearchRequest;

/// CREATE2 Salt Optimizer
///
/// Scans salts upward from a start value until the CREATE2 address of the
/// given deployer and init code contains the pattern.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Pattern the address must contain (hex characters, case-insensitive;
    /// may include the 0x prefix)
    #[arg(short, long)]
    pub pattern: String,

    /// Deployer (factory) address, 20 bytes hex with or without 0x
    #[arg(short, long)]
    pub deployer: String,

    /// Contract init code as hex (defaults to a small sample contract)
    #[arg(short, long, default_value = SAMPLE_BYTECODE)]
    pub bytecode: String,

    /// First salt to try (0x-hex or decimal)
    #[arg(short, long, default_value = "0")]
    pub start_salt: String,

    /// Number of worker threads (default: number of CPU cores; 1 searches
    /// on the main thread)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Stop after finding N salts (0 = run until interrupted)
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,

    /// Print the last N candidates evaluated before each match (0 = off)
    #[arg(long, default_value = "0")]
    pub show_candidates: usize,

    /// Print simulated salt recommendations before searching
    #[arg(long, default_value = "false")]
    pub recommend: bool,

    /// Optimization goal for recommendations: gas, speed, or aesthetic
    #[arg(long)]
    pub goal: Option<OptimizationGoal>,

    /// Simulate deploying the first salt found
    #[arg(long, default_value = "false")]
    pub deploy: bool,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pattern()?;
        self.deployer_address()?;
        self.bytecode_bytes()?;
        self.start()?;

        if self.workers == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "workers must be at least 1".into(),
            ));
        }
        if self.report_interval == 0 {
            return Err(ConfigError::InvalidConfig(
                "report_interval must be at least 1 second".into(),
            ));
        }
        Ok(())
    }

    pub fn pattern(&self) -> Result<Pattern, ConfigError> {
        Ok(Pattern::new(&self.pattern)?)
    }

    pub fn deployer_address(&self) -> Result<Address, ConfigError> {
        Ok(self.deployer.parse()?)
    }

    pub fn bytecode_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(parse_bytecode(&self.bytecode)?)
    }

    pub fn start(&self) -> Result<Salt, ConfigError> {
        Ok(self.start_salt.parse()?)
    }

    /// Builds the search request; the bytecode is hashed here, once.
    pub fn to_request(&self) -> Result<SearchRequest, ConfigError> {
        Ok(SearchRequest::new(
            self.deployer_address()?,
            &self.bytecode_bytes()?,
            self.pattern()?,
        )
        .start_at(self.start()?))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Search(#[from] SearchError),
}

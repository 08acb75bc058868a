//! Salt recommendation providers.
//!
//! The search engine never depends on this module. Recommendations come
//! from any source; [`verify_recommendation`] checks them against the
//! deriver before they are trusted.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore};
use tracing::debug;

use crate::crypto::{derive_address, hash_bytecode, Address, Salt};
use crate::error::SearchError;
use crate::matcher::Pattern;

/// What a recommendation should favour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationGoal {
    Gas,
    Speed,
    Aesthetic,
}

impl FromStr for OptimizationGoal {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gas" => Ok(OptimizationGoal::Gas),
            "speed" | "fast" => Ok(OptimizationGoal::Speed),
            "aesthetic" | "pretty" => Ok(OptimizationGoal::Aesthetic),
            _ => Err(format!("Unknown optimization goal: {}", s)),
        }
    }
}

impl fmt::Display for OptimizationGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationGoal::Gas => write!(f, "gas"),
            OptimizationGoal::Speed => write!(f, "speed"),
            OptimizationGoal::Aesthetic => write!(f, "aesthetic"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationRequest {
    pub pattern: Pattern,
    pub deployer: Address,
    pub bytecode: Vec<u8>,
    /// Salts already tried; providers should not suggest them again.
    pub previous_salts: Vec<Salt>,
    pub goal: Option<OptimizationGoal>,
}

impl RecommendationRequest {
    pub fn new(pattern: Pattern, deployer: Address, bytecode: Vec<u8>) -> Self {
        Self {
            pattern,
            deployer,
            bytecode,
            previous_salts: Vec::new(),
            goal: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaltRecommendation {
    pub salt: Salt,
    pub predicted_address: Address,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub gas_estimate: Option<u64>,
    pub reasoning: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("Recommendation provider unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Invalid(#[from] SearchError),
}

/// A source of candidate salts for a pattern.
pub trait RecommendationProvider {
    fn recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<SaltRecommendation>, RecommendationError>;
}

/// True if the recommendation's predicted address is what the deriver
/// produces for its salt.
pub fn verify_recommendation(
    recommendation: &SaltRecommendation,
    deployer: &Address,
    bytecode_hash: &[u8; 32],
) -> bool {
    derive_address(deployer, &recommendation.salt, bytecode_hash) == recommendation.predicted_address
}

/// Fraction of the pattern covered by its longest prefix that occurs in the
/// canonical address.
pub fn pattern_coverage(pattern: &Pattern, address: &Address) -> f64 {
    let canonical = address.to_canonical_ascii();
    let needle = pattern.as_str().as_bytes();
    let covered = (1..=needle.len())
        .rev()
        .find(|&k| canonical.windows(k).any(|w| w == &needle[..k]))
        .unwrap_or(0);
    covered as f64 / needle.len() as f64
}

/// Randomized placeholder provider.
///
/// Salts are random, but every predicted address is honestly derived, so
/// its recommendations always verify. Confidence is [`pattern_coverage`] of
/// the best of `samples` random draws.
#[derive(Debug, Clone)]
pub struct SimulatedRecommender {
    count: usize,
    samples: usize,
}

impl SimulatedRecommender {
    pub fn new(count: usize, samples: usize) -> Self {
        Self {
            count,
            samples: samples.max(1),
        }
    }
}

impl Default for SimulatedRecommender {
    fn default() -> Self {
        Self::new(3, 256)
    }
}

impl RecommendationProvider for SimulatedRecommender {
    fn recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<SaltRecommendation>, RecommendationError> {
        let bytecode_hash = hash_bytecode(&request.bytecode);
        let mut rng = rand::thread_rng();
        let mut used: HashSet<Salt> = request.previous_salts.iter().copied().collect();
        let mut out = Vec::with_capacity(self.count);

        while out.len() < self.count {
            let mut best: Option<(Salt, Address, f64)> = None;
            for _ in 0..self.samples {
                let mut bytes = [0u8; 32];
                rng.fill_bytes(&mut bytes);
                let salt = Salt::from_be_bytes(bytes);
                if used.contains(&salt) {
                    continue;
                }
                let address = derive_address(&request.deployer, &salt, &bytecode_hash);
                let score = pattern_coverage(&request.pattern, &address);
                if best.map_or(true, |(_, _, s)| score > s) {
                    best = Some((salt, address, score));
                }
            }
            let Some((salt, predicted_address, confidence)) = best else {
                continue;
            };
            used.insert(salt);

            let (gas_estimate, reasoning) = match request.goal {
                Some(OptimizationGoal::Gas) => (
                    95_000 + rng.gen_range(0..5_000),
                    format!(
                        "Sampled for low deployment gas; covers {:.0}% of \"{}\".",
                        confidence * 100.0,
                        request.pattern
                    ),
                ),
                Some(OptimizationGoal::Speed) => (
                    100_000 + rng.gen_range(0..10_000),
                    format!(
                        "Best of {} quick samples; covers {:.0}% of \"{}\".",
                        self.samples,
                        confidence * 100.0,
                        request.pattern
                    ),
                ),
                Some(OptimizationGoal::Aesthetic) | None => (
                    105_000 + rng.gen_range(0..10_000),
                    format!(
                        "Address contains {:.0}% of the \"{}\" pattern.",
                        confidence * 100.0,
                        request.pattern
                    ),
                ),
            };

            out.push(SaltRecommendation {
                salt,
                predicted_address,
                confidence,
                gas_estimate: Some(gas_estimate),
                reasoning: Some(reasoning),
            });
        }

        out.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        debug!(count = out.len(), pattern = %request.pattern, "simulated recommendations");
        Ok(out)
    }
}

//! Error types for address derivation and salt search.

/// Errors produced by the deriver and the search engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Invalid salt: {0}")]
    InvalidSalt(String),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Invalid bytecode: {0}")]
    InvalidBytecode(String),
    /// Cooperative cancellation was observed before a match was settled.
    #[error("Search cancelled")]
    SearchCancelled,
    #[error("Worker failed: {0}")]
    Worker(String),
    #[error("Hash computation failed: {0}")]
    HashComputation(String),
}

impl SearchError {
    /// True for the cancellation outcome, which callers usually treat as a
    /// normal termination rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::SearchCancelled)
    }
}

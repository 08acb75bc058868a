//! Salt search engine.
//!
//! This module provides:
//! - The sequential reference search and its lazy candidate stream
//! - A multi-threaded worker pool over disjoint strided shards
//! - Progress sinks and cooperative cancellation

mod cancel;
mod cpu;
mod engine;
mod pool;
mod progress;
mod request;

pub use cancel::CancellationToken;
pub use cpu::{WorkerStats, YIELD_INTERVAL};
pub use engine::{find_salt, search, search_with_stats};
pub use pool::WorkerPool;
pub use progress::{CandidateWindow, ProgressError, ProgressSink, SearchCandidate, DEFAULT_WINDOW};
pub use request::{Candidates, SearchRequest, SearchResult};

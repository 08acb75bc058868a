//! Sequential salt search on the calling thread.
//!
//! This is the reference ordering: candidates are evaluated strictly in
//! increasing salt order, so the first hit is the smallest matching salt.
//! [`WorkerPool`](super::WorkerPool) must always agree with it.

use std::sync::atomic::AtomicU64;

use tracing::debug;

use crate::crypto::Salt;
use crate::error::SearchError;

use super::cpu::{ShardExit, ShardWorker, WorkerStats, NO_MATCH};
use super::{CancellationToken, ProgressSink, SearchRequest, SearchResult};

/// Finds the smallest salt >= the request's start salt whose canonical
/// address contains the pattern.
///
/// The progress sink sees every candidate before it is tested. Cancellation
/// is checked after each candidate; the loop yields to the scheduler every
/// [`YIELD_INTERVAL`](super::YIELD_INTERVAL) candidates.
pub fn search(
    request: &SearchRequest,
    progress: Option<&dyn ProgressSink>,
    cancel: Option<&CancellationToken>,
) -> Result<SearchResult, SearchError> {
    search_with_stats(request, progress, cancel, &WorkerStats::new())
}

/// [`search`], accumulating counters into caller-owned stats.
pub fn search_with_stats(
    request: &SearchRequest,
    progress: Option<&dyn ProgressSink>,
    cancel: Option<&CancellationToken>,
    stats: &WorkerStats,
) -> Result<SearchResult, SearchError> {
    let local = CancellationToken::new();
    let cancel = cancel.unwrap_or(&local);
    let best = AtomicU64::new(NO_MATCH);

    debug!(
        pattern = %request.pattern(),
        start = %request.start_salt(),
        "starting sequential search"
    );

    let worker = ShardWorker::new(0, 0, 1, request, cancel, &best, stats, progress);
    match worker.run() {
        ShardExit::Matched(result) => Ok(result),
        ShardExit::Cancelled { .. } => Err(SearchError::SearchCancelled),
        ShardExit::Passed | ShardExit::Exhausted => Err(exhausted(request.start_salt())),
    }
}

/// String-level entry point: parses every input, then runs [`search`].
///
/// `start_salt` accepts 0x-hex or decimal and defaults to zero. An empty
/// pattern fails with `InvalidPattern` before any candidate is evaluated.
pub fn find_salt(
    deployer: &str,
    bytecode: &str,
    pattern: &str,
    start_salt: Option<&str>,
    progress: Option<&dyn ProgressSink>,
    cancel: Option<&CancellationToken>,
) -> Result<SearchResult, SearchError> {
    let start = match start_salt {
        Some(s) => s.parse::<Salt>()?,
        None => Salt::ZERO,
    };
    let request = SearchRequest::parse(deployer, bytecode, pattern)?.start_at(start);
    search(&request, progress, cancel)
}

pub(crate) fn exhausted(start: &Salt) -> SearchError {
    SearchError::InvalidSalt(format!(
        "salt space exhausted searching upward from {} (offsets beyond 2^64 or salts beyond 2^256 - 1)",
        start
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use crate::crypto::Address;
    use crate::matcher::Pattern;
    use crate::worker::{CandidateWindow, ProgressError, SearchCandidate};

    const DEPLOYER: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    const BYTECODE: &str = "0x6080604052";

    fn brute_force(request: &SearchRequest) -> SearchCandidate {
        request
            .candidates()
            .find(|c| request.pattern().matches(&c.address))
            .unwrap()
    }

    #[test]
    fn test_returns_first_match() {
        let request = SearchRequest::parse(DEPLOYER, BYTECODE, "ab").unwrap();
        let expected = brute_force(&request);
        let result = search(&request, None, None).unwrap();

        assert_eq!(result.salt, expected.salt);
        assert_eq!(result.address, expected.address);
        assert_eq!(result.iterations, expected.iteration);
        assert!(result.address.to_hex_prefixed().contains("ab"));
    }

    #[test]
    fn test_iterations_relative_to_start() {
        let start = Salt::from_u64(1_000);
        let request = SearchRequest::parse(DEPLOYER, BYTECODE, "c").unwrap().start_at(start);
        let result = search(&request, None, None).unwrap();

        assert!(result.salt >= start);
        assert_eq!(result.salt.offset_from(&start), Some(result.iterations));
    }

    #[test]
    fn test_progress_sees_every_candidate_in_order() {
        let request = SearchRequest::parse(DEPLOYER, BYTECODE, "abc").unwrap();
        let count = AtomicU64::new(0);
        let out_of_order = AtomicU64::new(0);
        // Sink panics are swallowed by the engine, so record instead of asserting.
        let sink = |c: &SearchCandidate| {
            let expected = count.fetch_add(1, Ordering::Relaxed);
            if c.iteration != expected || c.salt != Salt::from_u64(expected) {
                out_of_order.fetch_add(1, Ordering::Relaxed);
            }
        };
        let result = search(&request, Some(&sink), None).unwrap();
        assert_eq!(count.load(Ordering::Relaxed), result.iterations + 1);
        assert_eq!(out_of_order.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_window_sink_ends_with_match() {
        let request = SearchRequest::parse(DEPLOYER, BYTECODE, "abc").unwrap();
        let window = CandidateWindow::new(5);
        let result = search(&request, Some(&window), None).unwrap();

        let recent = window.snapshot();
        let last = recent.last().unwrap();
        assert_eq!(last.salt, result.salt);
        assert!(recent.len() <= 5);
    }

    #[test]
    fn test_panicking_sink_does_not_abort_search() {
        let request = SearchRequest::parse(DEPLOYER, BYTECODE, "ab").unwrap();
        let sink = |c: &SearchCandidate| {
            if c.iteration % 2 == 0 {
                panic!("observer bug at {}", c.iteration);
            }
        };
        let with_faulty = search(&request, Some(&sink), None).unwrap();
        let reference = search(&request, None, None).unwrap();
        assert_eq!(with_faulty, reference);
    }

    #[test]
    fn test_failing_sink_does_not_abort_search() {
        struct Rejecting(AtomicU64);
        impl ProgressSink for Rejecting {
            fn on_candidate(&self, _: &SearchCandidate) -> Result<(), ProgressError> {
                self.0.fetch_add(1, Ordering::Relaxed);
                Err("observer unavailable".into())
            }
        }

        let request = SearchRequest::parse(DEPLOYER, BYTECODE, "ab").unwrap();
        let sink = Rejecting(AtomicU64::new(0));
        let result = search(&request, Some(&sink), None).unwrap();
        assert_eq!(result, search(&request, None, None).unwrap());
        assert_eq!(sink.0.load(Ordering::Relaxed), result.iterations + 1);
    }

    #[test]
    fn test_pre_cancelled_token() {
        let request = SearchRequest::parse(DEPLOYER, BYTECODE, &"f".repeat(40)).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let stats = WorkerStats::new();
        let err = search_with_stats(&request, None, Some(&cancel), &stats).unwrap_err();
        assert_eq!(err, SearchError::SearchCancelled);
        assert_eq!(stats.total_salts(), 1);
    }

    #[test]
    fn test_cancel_from_progress_sink_is_bounded() {
        let request = SearchRequest::parse(DEPLOYER, BYTECODE, &"f".repeat(40)).unwrap();
        let cancel = CancellationToken::new();
        let seen = AtomicU64::new(0);
        let sink = |c: &SearchCandidate| {
            seen.fetch_add(1, Ordering::Relaxed);
            if c.iteration == 500 {
                cancel.cancel();
            }
        };
        let err = search(&request, Some(&sink), Some(&cancel)).unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(seen.load(Ordering::Relaxed), 501);
    }

    #[test]
    fn test_find_salt_parses_inputs() {
        let result = find_salt(DEPLOYER, BYTECODE, "AB", Some("0x10"), None, None).unwrap();
        let request = SearchRequest::parse(DEPLOYER, BYTECODE, "ab")
            .unwrap()
            .start_at(Salt::from_u64(16));
        assert_eq!(result, search(&request, None, None).unwrap());

        let decimal = find_salt(DEPLOYER, BYTECODE, "ab", Some("16"), None, None).unwrap();
        assert_eq!(decimal, result);
    }

    #[test]
    fn test_empty_pattern_does_no_work() {
        let calls = AtomicU64::new(0);
        let sink = |_: &SearchCandidate| {
            calls.fetch_add(1, Ordering::Relaxed);
        };
        let err = find_salt(DEPLOYER, BYTECODE, "", None, Some(&sink), None).unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern(_)));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_find_salt_propagates_input_errors() {
        assert!(matches!(
            find_salt("0xdead", BYTECODE, "ab", None, None, None),
            Err(SearchError::InvalidAddress(_))
        ));
        assert!(matches!(
            find_salt(DEPLOYER, BYTECODE, "ab", Some("0xzz"), None, None),
            Err(SearchError::InvalidSalt(_))
        ));
    }

    #[test]
    fn test_exhausted_space_is_reported() {
        let request = SearchRequest::new(
            Address::from_bytes([9u8; 20]),
            &[],
            Pattern::new(&"f".repeat(40)).unwrap(),
        )
        .start_at(Salt::MAX);
        assert!(matches!(
            search(&request, None, None),
            Err(SearchError::InvalidSalt(_))
        ));
    }
}

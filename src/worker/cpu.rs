//! CPU worker scanning one shard of the salt space.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use tracing::{debug, warn};

use super::progress::{notify, SinkFailure};
use super::{CancellationToken, ProgressSink, SearchCandidate, SearchRequest, SearchResult};

/// Candidates between stats flushes and scheduler yields.
pub const YIELD_INTERVAL: u64 = 100;

/// Sentinel for "no match found yet" in the shared best slot.
pub(crate) const NO_MATCH: u64 = u64::MAX;

/// Counters shared by every worker of a search.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total salts evaluated
    pub salts_tried: AtomicU64,
    /// Matches found (a parallel search may see more than one)
    pub matches_found: AtomicU64,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_salts(&self) -> u64 {
        self.salts_tried.load(Ordering::Relaxed)
    }

    pub fn total_matches(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }
}

/// Why a shard stopped scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShardExit {
    /// First match within this shard.
    Matched(SearchResult),
    /// Next offset lies past a match already found elsewhere.
    Passed,
    /// Cancellation observed; every offset below `next_iteration` in this
    /// shard has been scanned.
    Cancelled { next_iteration: u64 },
    /// Ran off the end of the 256-bit (or u64 offset) space.
    Exhausted,
}

/// Scans offsets `shard, shard + stride, shard + 2 * stride, ...` from the
/// request's start salt.
pub(crate) struct ShardWorker<'a> {
    id: usize,
    shard: u64,
    stride: u64,
    request: &'a SearchRequest,
    cancel: &'a CancellationToken,
    best: &'a AtomicU64,
    stats: &'a WorkerStats,
    progress: Option<&'a dyn ProgressSink>,
}

impl<'a> ShardWorker<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: usize,
        shard: u64,
        stride: u64,
        request: &'a SearchRequest,
        cancel: &'a CancellationToken,
        best: &'a AtomicU64,
        stats: &'a WorkerStats,
        progress: Option<&'a dyn ProgressSink>,
    ) -> Self {
        Self {
            id,
            shard,
            stride: stride.max(1),
            request,
            cancel,
            best,
            stats,
            progress,
        }
    }

    /// Runs until this shard matches, passes the shared best, is cancelled,
    /// or runs out of salts.
    pub(crate) fn run(&self) -> ShardExit {
        let pattern = self.request.pattern();
        let mut iteration = self.shard;
        let Some(mut salt) = self.request.start_salt().checked_add(self.shard) else {
            return ShardExit::Exhausted;
        };
        let mut pending = 0u64;
        let mut sink_failures = 0u64;

        let exit = loop {
            if iteration > self.best.load(Ordering::Acquire) {
                break ShardExit::Passed;
            }

            let address = self.request.derive(&salt);
            pending += 1;

            if let Some(sink) = self.progress {
                let candidate = SearchCandidate {
                    iteration,
                    salt,
                    address,
                };
                if let Err(failure) = notify(sink, &candidate) {
                    self.report_sink_failure(failure, iteration, sink_failures);
                    sink_failures += 1;
                }
            }

            if pattern.matches(&address) {
                self.best.fetch_min(iteration, Ordering::AcqRel);
                self.stats.matches_found.fetch_add(1, Ordering::Relaxed);
                debug!(
                    worker = self.id,
                    iteration,
                    salt = %salt,
                    address = %address,
                    "shard matched"
                );
                break ShardExit::Matched(SearchResult {
                    salt,
                    address,
                    iterations: iteration,
                });
            }

            if self.cancel.is_cancelled() {
                break ShardExit::Cancelled {
                    next_iteration: iteration.saturating_add(self.stride),
                };
            }

            match (salt.checked_add(self.stride), iteration.checked_add(self.stride)) {
                (Some(s), Some(i)) => {
                    salt = s;
                    iteration = i;
                }
                _ => break ShardExit::Exhausted,
            }

            if pending == YIELD_INTERVAL {
                self.stats.salts_tried.fetch_add(pending, Ordering::Relaxed);
                pending = 0;
                thread::yield_now();
            }
        };

        self.stats.salts_tried.fetch_add(pending, Ordering::Relaxed);
        exit
    }

    fn report_sink_failure(&self, failure: SinkFailure, iteration: u64, previous: u64) {
        // One warning per shard; repeats would flood the log at search speed.
        if previous == 0 {
            match failure {
                SinkFailure::Error(e) => warn!(
                    worker = self.id,
                    iteration, "progress sink failed: {}; continuing search", e
                ),
                SinkFailure::Panic => warn!(
                    worker = self.id,
                    iteration, "progress sink panicked; continuing search"
                ),
            }
        } else {
            debug!(worker = self.id, iteration, "progress sink failed again");
        }
    }
}

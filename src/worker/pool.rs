//! Worker pool for parallel salt search.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, RecvTimeoutError};
use tracing::{debug, info};

use crate::crypto::Salt;
use crate::error::SearchError;
use crate::format::format_number;

use super::cpu::{ShardExit, ShardWorker, WorkerStats, NO_MATCH};
use super::engine::{exhausted, search_with_stats};
use super::{CancellationToken, ProgressSink, SearchRequest, SearchResult};

/// Runs a search across `num_workers` threads.
///
/// Worker `i` of `N` scans offsets `i, i + N, i + 2N, ...` from the start
/// salt. A match publishes its offset to a shared best slot; shards keep
/// scanning until they pass it, so the result is always the smallest
/// matching salt, identical to the sequential search.
pub struct WorkerPool {
    /// Number of worker threads
    num_workers: usize,
    /// How often the coordinator logs throughput while waiting
    report_interval: Duration,
    /// Stop flag used when a search is given no token of its own
    stop_token: CancellationToken,
    /// Counters accumulated across every search run by this pool
    stats: WorkerStats,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Creates a pool; zero workers is treated as one.
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers: num_workers.max(1),
            report_interval: Duration::from_secs(5),
            stop_token: CancellationToken::new(),
            stats: WorkerStats::new(),
            start_time: Instant::now(),
        }
    }

    pub fn report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Searches for the smallest matching salt.
    ///
    /// `cancel` defaults to the pool's own token (see [`Self::stop`]). If any
    /// shard is cancelled before the offsets below the best match have all
    /// been scanned, the search fails with `SearchCancelled` rather than
    /// returning a possibly later match.
    pub fn search(
        &self,
        request: &SearchRequest,
        progress: Option<&dyn ProgressSink>,
        cancel: Option<&CancellationToken>,
    ) -> Result<SearchResult, SearchError> {
        let cancel = cancel.unwrap_or(&self.stop_token);
        if self.num_workers == 1 {
            return search_with_stats(request, progress, Some(cancel), &self.stats);
        }

        let workers = self.num_workers;
        let best = AtomicU64::new(NO_MATCH);
        let (result_tx, result_rx) = bounded::<(usize, ShardExit)>(workers);

        debug!(
            workers,
            pattern = %request.pattern(),
            start = %request.start_salt(),
            "starting parallel search"
        );

        let exits = thread::scope(|scope| -> Result<Vec<ShardExit>, SearchError> {
            for id in 0..workers {
                let result_tx = result_tx.clone();
                let best = &best;
                let stats = &self.stats;

                let spawned = thread::Builder::new()
                    .name(format!("salt-worker-{}", id))
                    .spawn_scoped(scope, move || {
                        let worker = ShardWorker::new(
                            id,
                            id as u64,
                            workers as u64,
                            request,
                            cancel,
                            best,
                            stats,
                            progress,
                        );
                        let _ = result_tx.send((id, worker.run()));
                    });

                if let Err(e) = spawned {
                    // Drain shards that already started: every offset > 0 is
                    // now past the best.
                    best.store(0, Ordering::Release);
                    return Err(SearchError::Worker(format!(
                        "failed to spawn worker {}: {}",
                        id, e
                    )));
                }
            }

            // Drop the extra sender so the channel closes when all workers finish
            drop(result_tx);

            let mut exits = Vec::with_capacity(workers);
            while exits.len() < workers {
                match result_rx.recv_timeout(self.report_interval) {
                    Ok((id, exit)) => {
                        debug!(worker = id, ?exit, "shard finished");
                        exits.push(exit);
                    }
                    Err(RecvTimeoutError::Timeout) => self.log_progress(),
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            Ok(exits)
        })?;

        if exits.len() < workers {
            return Err(SearchError::Worker(format!(
                "{} of {} workers exited without reporting",
                workers - exits.len(),
                workers
            )));
        }

        resolve(&exits, request.start_salt())
    }

    fn log_progress(&self) {
        info!(
            elapsed_secs = self.elapsed().as_secs(),
            "tried {} salts ({}/s)",
            format_number(self.total_salts()),
            format_number(self.salts_per_second() as u64)
        );
    }

    /// Signals running searches that use the pool's own token to stop.
    ///
    /// The stop is sticky: later searches without a token of their own fail
    /// with `SearchCancelled` at once until [`Self::resume`] is called.
    pub fn stop(&self) {
        self.stop_token.cancel();
    }

    /// Clears a previous [`Self::stop`] so the pool can search again.
    pub fn resume(&self) {
        self.stop_token.reset();
    }

    /// A clone of the pool's token, for external use (e.g., signal handlers).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.stop_token.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_token.is_cancelled()
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn total_salts(&self) -> u64 {
        self.stats.total_salts()
    }

    pub fn total_matches(&self) -> u64 {
        self.stats.total_matches()
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn salts_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_salts() as f64 / elapsed
        } else {
            0.0
        }
    }
}

/// Combines shard outcomes into the sequential-equivalent answer.
fn resolve(exits: &[ShardExit], start: &Salt) -> Result<SearchResult, SearchError> {
    let best = exits
        .iter()
        .filter_map(|exit| match exit {
            ShardExit::Matched(result) => Some(*result),
            _ => None,
        })
        .min_by_key(|result| result.iterations);

    // Lowest offset some cancelled shard never reached.
    let unscanned = exits
        .iter()
        .filter_map(|exit| match exit {
            ShardExit::Cancelled { next_iteration } => Some(*next_iteration),
            _ => None,
        })
        .min();

    match (best, unscanned) {
        (Some(result), None) => Ok(result),
        (Some(result), Some(floor)) if floor > result.iterations => Ok(result),
        (_, Some(_)) => Err(SearchError::SearchCancelled),
        (None, None) => Err(exhausted(start)),
    }
}

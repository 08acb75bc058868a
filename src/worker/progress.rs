//! Progress notification for running searches.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

use crate::crypto::{Address, Salt};

/// Number of trailing candidates kept by [`CandidateWindow::default`].
pub const DEFAULT_WINDOW: usize = 20;

/// One evaluated salt, emitted before the match test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchCandidate {
    /// Offset from the start salt.
    pub iteration: u64,
    pub salt: Salt,
    pub address: Address,
}

pub type ProgressError = Box<dyn std::error::Error + Send + Sync>;

/// Receives candidates as they are evaluated.
///
/// Sinks are shared by every worker of a parallel search, so calls may
/// arrive concurrently and out of iteration order. A sink must not block.
/// Errors and panics raised here are logged and swallowed; they never end
/// the search.
///
/// Only the `tracing` output is throttled. A panicking sink still runs the
/// process panic hook, which by default prints every panic to stderr. Sinks
/// that fail routinely should return `Err` instead, or the caller should
/// install its own hook with [`std::panic::set_hook`].
pub trait ProgressSink: Send + Sync {
    fn on_candidate(&self, candidate: &SearchCandidate) -> Result<(), ProgressError>;
}

impl<F> ProgressSink for F
where
    F: Fn(&SearchCandidate) + Send + Sync,
{
    fn on_candidate(&self, candidate: &SearchCandidate) -> Result<(), ProgressError> {
        self(candidate);
        Ok(())
    }
}

/// Outcome of one isolated sink call.
#[derive(Debug)]
pub(crate) enum SinkFailure {
    Error(ProgressError),
    Panic,
}

/// Calls the sink, catching both returned errors and panics.
pub(crate) fn notify(
    sink: &dyn ProgressSink,
    candidate: &SearchCandidate,
) -> Result<(), SinkFailure> {
    match panic::catch_unwind(AssertUnwindSafe(|| sink.on_candidate(candidate))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(SinkFailure::Error(e)),
        Err(_) => Err(SinkFailure::Panic),
    }
}

/// A sink that retains only the most recent candidates.
#[derive(Debug)]
pub struct CandidateWindow {
    capacity: usize,
    recent: Mutex<VecDeque<SearchCandidate>>,
}

impl CandidateWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained candidates, oldest first.
    pub fn snapshot(&self) -> Vec<SearchCandidate> {
        let recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
        recent.iter().copied().collect()
    }

    pub fn clear(&self) {
        self.recent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl Default for CandidateWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl ProgressSink for CandidateWindow {
    fn on_candidate(&self, candidate: &SearchCandidate) -> Result<(), ProgressError> {
        if self.capacity == 0 {
            return Ok(());
        }
        let mut recent = self
            .recent
            .lock()
            .map_err(|_| "candidate window lock poisoned")?;
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(*candidate);
        Ok(())
    }
}

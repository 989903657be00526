//! Progress and throughput accounting for the first pass
//!
//! The counter increment, elapsed-time read and rate computation for one
//! completed request happen under a single lock, so every completion gets
//! its own distinct index and the final count equals the number of
//! completions exactly.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Snapshot taken when a request completes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressTick {
    /// 1-based position of this completion
    pub index: usize,

    /// Total number of URLs in the pass
    pub total: usize,

    /// Average completions per second since the pass started
    pub rate: f64,
}

impl ProgressTick {
    /// Formats progress as `k/total`
    pub fn fraction(&self) -> String {
        format!("{}/{}", self.index, self.total)
    }
}

#[derive(Debug)]
struct ProgressState {
    processed: usize,
    started: Instant,
}

/// Thread-safe processed counter and start time for one pass
#[derive(Debug)]
pub struct ProgressTracker {
    total: usize,
    state: Mutex<ProgressState>,
}

impl ProgressTracker {
    /// Starts tracking a pass over `total` URLs; the clock starts now
    pub fn start(total: usize) -> Self {
        Self {
            total,
            state: Mutex::new(ProgressState {
                processed: 0,
                started: Instant::now(),
            }),
        }
    }

    /// Records one completed request and returns its progress snapshot
    pub fn record_completion(&self) -> ProgressTick {
        let mut state = self.lock_state();
        state.processed += 1;
        let index = state.processed;
        let elapsed = state.started.elapsed().as_secs_f64();

        ProgressTick {
            index,
            total: self.total,
            rate: average_rate(index, elapsed),
        }
    }

    /// Number of completions recorded so far
    pub fn processed(&self) -> usize {
        self.lock_state().processed
    }

    /// Time since the pass started
    pub fn elapsed(&self) -> Duration {
        self.lock_state().started.elapsed()
    }

    fn lock_state(&self) -> MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Completions per second, or zero before any time has elapsed
pub fn average_rate(processed: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        processed as f64 / elapsed_secs
    } else {
        0.0
    }
}

//! Final tally of a preload run
//!
//! The summary is a pure read of the state left behind by the first pass and
//! the retry pass. Nothing is mutated once it has been built.

use crate::output::traits::StatusSink;
use chrono::{DateTime, Utc};

/// Summary statistics for a preload run
#[derive(Debug, Clone)]
pub struct PreloadSummary {
    /// When the run started (sitemap discovery included)
    pub started_at: DateTime<Utc>,

    /// When the retry pass finished
    pub finished_at: DateTime<Utc>,

    /// Number of unique page URLs discovered
    pub total: usize,

    /// Outcomes recorded by the first pass
    pub processed: usize,

    /// URLs that failed the first pass and were retried
    pub retried: usize,

    /// URLs that failed both passes
    pub still_failed: Vec<String>,
}

impl PreloadSummary {
    /// Number of pages that were loaded successfully on either pass
    pub fn success_count(&self) -> usize {
        self.total.saturating_sub(self.still_failed.len())
    }

    /// Number of retried pages that succeeded on their second attempt
    pub fn recovered(&self) -> usize {
        self.retried.saturating_sub(self.still_failed.len())
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.success_count() as f64 / self.total as f64) * 100.0
    }

    /// The final tally line
    pub fn tally_line(&self) -> String {
        format!(
            "Successfully loaded {} pages out of {} total.",
            self.success_count(),
            self.total
        )
    }
}

/// Prints the summary through the given sink
pub fn print_summary(summary: &PreloadSummary, sink: &dyn StatusSink) {
    sink.emit("");
    sink.emit(&summary.tally_line());

    if summary.retried > 0 {
        sink.emit(&format!(
            "Recovered on retry: {} of {}",
            summary.recovered(),
            summary.retried
        ));
    }

    for url in &summary.still_failed {
        sink.emit(&format!("  still failing: {}", url));
    }

    sink.emit(&format!(
        "Elapsed: {}s ({:.1}% success)",
        summary.duration_seconds(),
        summary.success_rate()
    ));
}

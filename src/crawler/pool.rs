//! Fixed-size worker pool for the first pass
//!
//! Every URL is queued up front. `N` workers drain the queue, each fetching
//! one URL at a time and reporting through the shared progress tracker. Once
//! the queue's join point is reached the pool sends one shutdown marker per
//! worker and waits for all of them to exit.

use crate::crawler::failures::FailureSet;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::progress::ProgressTracker;
use crate::crawler::queue::{QueueItem, TaskDoneGuard, WorkQueue};
use crate::output::StatusSink;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// What the first pass leaves behind
#[derive(Debug, Clone)]
pub struct FirstPassReport {
    /// Number of URLs fed to the pool
    pub total: usize,

    /// Number of outcomes recorded; equals `total` once the pool has drained
    pub processed: usize,

    /// URLs whose fetch failed, each listed once
    pub failures: Vec<String>,

    /// Wall-clock duration of the pass
    pub elapsed: Duration,
}

/// Pool of concurrent fetch workers sharing one queue
pub struct WorkerPool {
    client: Client,
    workers: usize,
    sink: Arc<dyn StatusSink>,
}

impl WorkerPool {
    /// Creates a pool of `workers` workers (at least one)
    pub fn new(client: Client, workers: usize, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            client,
            workers: workers.max(1),
            sink,
        }
    }

    /// Fetches every URL exactly once and returns the first-pass report
    ///
    /// `urls` is expected to be deduplicated already.
    pub async fn run(&self, urls: Vec<String>) -> FirstPassReport {
        let total = urls.len();
        let queue = Arc::new(WorkQueue::new());
        for url in urls {
            queue.put(url);
        }

        let progress = Arc::new(ProgressTracker::start(total));
        let failures = Arc::new(FailureSet::new());

        tracing::info!("Starting {} workers for {} pages", self.workers, total);

        let handles: Vec<_> = (1..=self.workers)
            .map(|id| {
                let worker = Worker {
                    name: format!("Worker-{}", id),
                    client: self.client.clone(),
                    queue: queue.clone(),
                    progress: progress.clone(),
                    failures: failures.clone(),
                    sink: self.sink.clone(),
                };
                let span = tracing::info_span!("worker", id);
                tokio::spawn(worker.run().instrument(span))
            })
            .collect();

        queue.join().await;
        for _ in 0..self.workers {
            queue.put_shutdown();
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Worker task ended abnormally: {}", e);
            }
        }

        let report = FirstPassReport {
            total,
            processed: progress.processed(),
            failures: failures.unique(),
            elapsed: progress.elapsed(),
        };

        tracing::info!(
            "First pass complete: {}/{} processed, {} failed, {:?}",
            report.processed,
            report.total,
            report.failures.len(),
            report.elapsed
        );

        report
    }
}

/// One worker's share of the pool state
struct Worker {
    name: String,
    client: Client,
    queue: Arc<WorkQueue>,
    progress: Arc<ProgressTracker>,
    failures: Arc<FailureSet>,
    sink: Arc<dyn StatusSink>,
}

impl Worker {
    /// Processes URLs until a shutdown marker arrives; returns how many it handled
    async fn run(self) -> usize {
        let mut handled = 0;

        loop {
            let url = match self.queue.get().await {
                QueueItem::Url(url) => url,
                QueueItem::Shutdown => break,
            };
            let _done = TaskDoneGuard::new(&self.queue);

            let outcome = fetch_page(&self.client, &url).await;
            let tick = self.progress.record_completion();

            self.sink.emit(&format!(
                "[{}] {} {} -> {} ({:.2} req/s)",
                self.name,
                tick.fraction(),
                outcome.url,
                outcome.status,
                tick.rate
            ));

            if outcome.ok {
                tracing::debug!("Fetched {} in {:?}", outcome.url, outcome.elapsed);
            } else {
                tracing::warn!("Fetch failed for {}: {}", outcome.url, outcome.status);
                self.failures.record(&outcome.url);
            }

            handled += 1;
        }

        tracing::debug!("{} exiting after {} pages", self.name, handled);
        handled
    }
}

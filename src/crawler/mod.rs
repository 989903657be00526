//! Crawler module for the fetch-and-retry engine
//!
//! This module contains the core preload logic, including:
//! - HTTP fetching with per-request outcomes
//! - The shared work queue and its shutdown protocol
//! - Progress/throughput accounting and failure collection
//! - The first-pass worker pool and the serial retry pass
//! - Overall phase coordination

mod coordinator;
mod failures;
mod fetcher;
mod pool;
mod progress;
mod queue;
mod retry;

pub use coordinator::{run_preload, Preloader};
pub use failures::FailureSet;
pub use fetcher::{
    build_http_client, default_user_agent, fetch_page, is_loaded, FetchOutcome, FetchStatus,
};
pub use pool::{FirstPassReport, WorkerPool};
pub use progress::{average_rate, ProgressTick, ProgressTracker};
pub use queue::{QueueItem, TaskDoneGuard, WorkQueue};
pub use retry::{retry_failures, RetryReport};

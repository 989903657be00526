//! Shared work queue for the fetch workers
//!
//! A multi-consumer FIFO with a join point and poison-pill shutdown:
//! - `put` enqueues a URL and counts it as unfinished
//! - `get` waits for the next item, whichever worker is free takes it
//! - `task_done` marks one URL as finished
//! - `join` waits until every URL put so far has been marked done
//! - `put_shutdown` enqueues one termination marker (one per worker)

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{watch, Semaphore};

/// An item delivered to a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueItem {
    /// A page URL to fetch
    Url(String),

    /// Tells the receiving worker to exit its loop
    Shutdown,
}

/// FIFO of URLs shared by every worker in the pool
#[derive(Debug)]
pub struct WorkQueue {
    items: Mutex<VecDeque<QueueItem>>,

    /// One permit per queued item
    available: Semaphore,

    /// URLs put but not yet marked done
    unfinished: watch::Sender<usize>,
}

impl WorkQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        let (unfinished, _) = watch::channel(0);
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Semaphore::new(0),
            unfinished,
        }
    }

    /// Enqueues a URL and counts it as unfinished
    pub fn put(&self, url: String) {
        self.unfinished.send_modify(|count| *count += 1);
        self.push(QueueItem::Url(url));
    }

    /// Enqueues one termination marker
    ///
    /// Markers are not counted as unfinished work and need no `task_done`.
    pub fn put_shutdown(&self) {
        self.push(QueueItem::Shutdown);
    }

    /// Waits for the next item
    pub async fn get(&self) -> QueueItem {
        match self.available.acquire().await {
            Ok(permit) => permit.forget(),
            // The semaphore is never closed; treat it as a shutdown if it ever is.
            Err(_) => return QueueItem::Shutdown,
        }

        let item = self.lock_items().pop_front();
        item.unwrap_or(QueueItem::Shutdown)
    }

    /// Marks one previously dequeued URL as finished
    pub fn task_done(&self) {
        self.unfinished
            .send_modify(|count| *count = count.saturating_sub(1));
    }

    /// Waits until every URL put so far has been marked done
    pub async fn join(&self) {
        let mut receiver = self.unfinished.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = receiver.wait_for(|count| *count == 0).await;
    }

    /// Number of URLs not yet marked done
    #[cfg(test)]
    fn unfinished(&self) -> usize {
        *self.unfinished.borrow()
    }

    fn push(&self, item: QueueItem) {
        self.lock_items().push_back(item);
        self.available.add_permits(1);
    }

    fn lock_items(&self) -> MutexGuard<'_, VecDeque<QueueItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Calls `task_done` when dropped
///
/// Held by a worker for the duration of one URL so the queue's join point is
/// released on every exit path, including an unwinding panic.
pub struct TaskDoneGuard<'a> {
    queue: &'a WorkQueue,
}

impl<'a> TaskDoneGuard<'a> {
    pub fn new(queue: &'a WorkQueue) -> Self {
        Self { queue }
    }
}

impl Drop for TaskDoneGuard<'_> {
    fn drop(&mut self) {
        self.queue.task_done();
    }
}

// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP GET requests.
//
// Key functionality:
// - A fixed pool of workers pulls links off a bounded channel
// - Each link produces exactly ONE StatusRecord, success or not
// - Failures (bad URL, DNS, timeout, cancellation) become the sentinel 400
// - The output channel closes only once every worker has finished
//
// Pipeline shape:
//
//   links rx ──┬─► worker 0 ──┐
//              ├─► worker 1 ──┼─► records tx ──► records rx
//              └─► worker N ──┘
//                     ▲
//        supervisor joins all workers, then drops the last records tx
//
// Rust concepts:
// - Arc<Mutex<Receiver>>: share one receiver between many workers
// - JoinSet: track spawned tasks so we can wait for all of them
// - Channels (mpsc): bounded queues between pipeline stages
// =============================================================================

use crate::error::FetchError;
use crate::transport::{build_url, Transport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Status reported when a link could not be requested or never answered
///
/// A real "400 Bad Request" response looks exactly the same. The `error`
/// field on the record is the only way to tell the two apart.
pub const FAILURE_STATUS: u16 = 400;

// Represents the result of checking a single link
//
// #[derive(Serialize, Deserialize)] lets us print it as JSON with --json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// The normalized URL that was checked
    pub url: String,
    /// HTTP status code, or FAILURE_STATUS
    pub status: u16,
    /// Why the sentinel was produced, if it was
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusRecord {
    /// A record for a link that answered
    pub fn new(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
            error: None,
        }
    }

    /// A sentinel record for a link that could not be checked
    pub fn failed(url: impl Into<String>, error: &FetchError) -> Self {
        Self {
            url: url.into(),
            status: FAILURE_STATUS,
            error: Some(error.to_string()),
        }
    }

    /// Returns true for 2xx and 3xx statuses
    pub fn is_ok(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

// Prints as "<status> - <url>", the line format of the report
impl fmt::Display for StatusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.status, self.url)
    }
}

/// Checks a stream of links with a bounded pool of workers
#[derive(Clone)]
pub struct Checker {
    transport: Arc<dyn Transport>,
    concurrency: usize,
    capacity: usize,
    cancel: CancellationToken,
}

impl Checker {
    /// Creates a checker
    ///
    /// `concurrency` is the number of workers (at least one is always used),
    /// `capacity` the buffer size of the output channel.
    pub fn new(
        transport: Arc<dyn Transport>,
        concurrency: usize,
        capacity: usize,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            transport,
            concurrency: concurrency.max(1),
            capacity: capacity.max(1),
            cancel,
        }
    }

    /// Starts the workers and returns the record channel
    ///
    /// Must be called from inside a tokio runtime.
    pub fn spawn(&self, links: mpsc::Receiver<String>) -> mpsc::Receiver<StatusRecord> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let links = Arc::new(Mutex::new(links));
        let mut workers = JoinSet::new();

        for worker_id in 0..self.concurrency {
            let links = Arc::clone(&links);
            let tx = tx.clone();
            let transport = Arc::clone(&self.transport);
            let cancel = self.cancel.clone();

            workers.spawn(async move {
                loop {
                    // Hold the lock only while waiting for the next link
                    let next = links.lock().await.recv().await;
                    let Some(link) = next else { break };

                    let record = check_link(transport.as_ref(), link, &cancel).await;
                    if tx.send(record).await.is_err() {
                        debug!(worker_id, "record receiver dropped, stopping worker");
                        break;
                    }
                }
            });
        }

        // Counted join: the last sender goes away only after every worker is done
        tokio::spawn(async move {
            while let Some(joined) = workers.join_next().await {
                if let Err(e) = joined {
                    error!(error = %e, "checker worker failed");
                }
            }
            drop(tx);
        });

        rx
    }
}

// Checks a single link
//
// This function never fails: every outcome is turned into a record.
async fn check_link(
    transport: &dyn Transport,
    link: String,
    cancel: &CancellationToken,
) -> StatusRecord {
    let url = match build_url(&link) {
        Ok(url) => url,
        Err(e) => {
            debug!(url = %link, error = %e, "link is not requestable");
            return StatusRecord::failed(link, &e);
        }
    };

    match transport.status(&url, cancel).await {
        Ok(status) => {
            debug!(url = %link, status, "link checked");
            StatusRecord::new(link, status)
        }
        Err(e) => {
            warn!(url = %link, error = %e, "link check failed");
            StatusRecord::failed(link, &e)
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a worker pool instead of one task per link?
//    - A page can contain thousands of links
//    - One task (and socket) per link can exhaust file descriptors
//    - N workers means at most N requests in flight for this seed
//
// 2. Why does the supervisor hold on to `tx`?
//    - A channel closes when its LAST sender is dropped
//    - Each worker owns a clone; the supervisor owns the original
//    - Dropping it only after join_next() returns None means the output can
//      never close while a worker might still send
//
// 3. Why Arc<Mutex<Receiver>>?
//    - mpsc = multi-producer, SINGLE consumer
//    - Wrapping the receiver lets several workers take turns reading from it
// -----------------------------------------------------------------------------

// src/crawl/merge.rs
// =============================================================================
// Fan-in: many record channels (one per seed) become one.
//
//   seed 1 records ──► forwarder ──┐
//   seed 2 records ──► forwarder ──┼──► merged records
//   seed N records ──► forwarder ──┘
//
// Each forwarder passes records on as soon as they arrive; there is no
// reordering and no buffering beyond the bounded output channel. The merged
// channel closes only after EVERY input has closed: a supervisor task joins
// all forwarders before dropping the last sender.
// =============================================================================

use crate::checker::StatusRecord;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Merges `inputs` into a single channel of capacity `capacity`
///
/// Must be called from inside a tokio runtime.
pub fn merge(
    inputs: Vec<mpsc::Receiver<StatusRecord>>,
    capacity: usize,
) -> mpsc::Receiver<StatusRecord> {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let total = inputs.len();
    let mut forwarders = JoinSet::new();

    for (index, mut input) in inputs.into_iter().enumerate() {
        let tx = tx.clone();
        forwarders.spawn(async move {
            let mut forwarded = 0usize;
            while let Some(record) = input.recv().await {
                if tx.send(record).await.is_err() {
                    debug!(index, "merged receiver dropped");
                    break;
                }
                forwarded += 1;
            }
            debug!(index, forwarded, "input exhausted");
        });
    }

    tokio::spawn(async move {
        let mut closed = 0usize;
        while let Some(joined) = forwarders.join_next().await {
            closed += 1;
            if let Err(e) = joined {
                error!(error = %e, "forwarder failed");
            }
        }
        debug!(closed, total, "all inputs closed");
        drop(tx);
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(seed: usize, i: usize) -> StatusRecord {
        StatusRecord::new(format!("https://seed{}.com/{}", seed, i), 200)
    }

    #[tokio::test]
    async fn test_merges_everything() {
        let mut senders = Vec::new();
        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (tx, rx) = mpsc::channel(2);
            senders.push(tx);
            receivers.push(rx);
        }

        let mut merged = merge(receivers, 4);

        let counts = [5, 0, 12];
        for (seed, (tx, count)) in senders.into_iter().zip(counts).enumerate() {
            tokio::spawn(async move {
                for i in 0..count {
                    tx.send(record(seed, i)).await.unwrap();
                }
            });
        }

        let mut total = 0;
        while merged.recv().await.is_some() {
            total += 1;
        }
        assert_eq!(total, counts.iter().sum::<usize>());
    }

    #[tokio::test]
    async fn test_stays_open_until_slowest_input_closes() {
        let (fast_a, rx_a) = mpsc::channel(4);
        let (fast_b, rx_b) = mpsc::channel(4);
        let (slow, rx_slow) = mpsc::channel(4);

        let mut merged = merge(vec![rx_a, rx_b, rx_slow], 4);

        fast_a.send(record(0, 0)).await.unwrap();
        fast_b.send(record(1, 0)).await.unwrap();
        slow.send(record(2, 0)).await.unwrap();
        drop(fast_a);
        drop(fast_b);

        for _ in 0..3 {
            assert!(merged.recv().await.is_some());
        }

        // The slow input is still open, so the merged channel must be too
        let pending = tokio::time::timeout(Duration::from_millis(200), merged.recv()).await;
        assert!(pending.is_err(), "merged channel closed early");

        slow.send(record(2, 1)).await.unwrap();
        assert_eq!(merged.recv().await, Some(record(2, 1)));

        drop(slow);
        assert!(merged.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_no_inputs_closes_immediately() {
        let mut merged = merge(Vec::new(), 4);
        assert!(merged.recv().await.is_none());
    }
}

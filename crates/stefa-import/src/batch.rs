//! Sequential batch fold over the normalized record list.
//!
//! Partitions records into fixed-size chunks and folds an async per-batch
//! operation into an immutable [`BatchTotals`]. The operation is a generic
//! closure, so the aggregation logic is testable without a database. Batches
//! run strictly sequentially, each awaited before the next begins, with an
//! optional fixed inter-batch sleep (a static delay, not a backoff).

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;

/// Running totals for an import run.
///
/// Invariant: `loaded + updated + errors` equals the number of input records
/// once the full list is drained (count conservation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchTotals {
    /// Rows inserted for the first time.
    pub loaded: u64,
    /// Rows that already existed and were updated in place.
    pub updated: u64,
    /// Rows belonging to failed batches. A batch-level error counts the
    /// whole chunk; there is no per-row isolation within a batch.
    pub errors: u64,
}

impl BatchTotals {
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            loaded: self.loaded + other.loaded,
            updated: self.updated + other.updated,
            errors: self.errors + other.errors,
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.loaded + self.updated + self.errors
    }
}

/// Drain `records` through `op` in chunks of `batch_size`.
///
/// `op` receives one chunk and returns `(inserted, updated)` counts on
/// success. A failed batch is logged and counted as `chunk length` errors;
/// remaining batches are still attempted. No transaction spans batches;
/// recovery from a partial run is re-running the whole import, relying on
/// upsert idempotence by business code.
pub async fn drain_batches<'a, T, E, F>(
    records: &'a [T],
    batch_size: usize,
    delay: Duration,
    mut op: F,
) -> BatchTotals
where
    E: std::fmt::Display,
    F: FnMut(&'a [T]) -> Pin<Box<dyn Future<Output = Result<(u64, u64), E>> + Send + 'a>>,
{
    let batch_size = batch_size.max(1);
    let mut totals = BatchTotals::default();
    let mut chunks = records.chunks(batch_size).enumerate().peekable();

    while let Some((batch_index, chunk)) = chunks.next() {
        let outcome = match op(chunk).await {
            Ok((loaded, updated)) => BatchTotals {
                loaded,
                updated,
                errors: 0,
            },
            Err(error) => {
                tracing::error!(
                    batch = batch_index,
                    rows = chunk.len(),
                    error = %error,
                    "batch upsert failed; counting whole batch as errors"
                );
                BatchTotals {
                    loaded: 0,
                    updated: 0,
                    errors: chunk.len() as u64,
                }
            }
        };
        totals = totals.merge(outcome);

        if !delay.is_zero() && chunks.peek().is_some() {
            tokio::time::sleep(delay).await;
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn records(n: usize) -> Vec<u32> {
        (0..n as u32).collect()
    }

    #[tokio::test]
    async fn folds_totals_across_batches() {
        let data = records(45);
        let totals = drain_batches(&data, 20, Duration::ZERO, |chunk| {
            let len = chunk.len() as u64;
            Box::pin(async move { Ok::<_, String>((len, 0)) })
        })
        .await;
        assert_eq!(totals.loaded, 45);
        assert_eq!(totals.updated, 0);
        assert_eq!(totals.errors, 0);
    }

    #[tokio::test]
    async fn failed_batch_counts_whole_chunk_as_errors() {
        // A single bad row fails its entire 20-record batch; the other
        // batches still land.
        let data = records(60);
        let totals = drain_batches(&data, 20, Duration::ZERO, |chunk| {
            let poisoned = chunk.contains(&27);
            let len = chunk.len() as u64;
            Box::pin(async move {
                if poisoned {
                    Err("null value in column \"title\"".to_string())
                } else {
                    Ok((len, 0))
                }
            })
        })
        .await;
        assert_eq!(totals.errors, 20);
        assert_eq!(totals.loaded, 40);
    }

    #[tokio::test]
    async fn count_conservation_holds_with_mixed_outcomes() {
        // P4: loaded + updated + errors == input rows.
        let data = records(53);
        let calls = AtomicUsize::new(0);
        let totals = drain_batches(&data, 10, Duration::ZERO, |chunk| {
            let index = calls.fetch_add(1, Ordering::SeqCst);
            let len = chunk.len() as u64;
            Box::pin(async move {
                match index % 3 {
                    0 => Ok((len, 0)),
                    1 => Ok((len / 2, len - len / 2)),
                    _ => Err("backend rejected batch".to_string()),
                }
            })
        })
        .await;
        assert_eq!(totals.total(), 53);
    }

    #[tokio::test]
    async fn batches_are_processed_sequentially_in_order() {
        let data = records(30);
        let seen = std::sync::Mutex::new(Vec::new());
        drain_batches(&data, 10, Duration::ZERO, |chunk| {
            seen.lock().unwrap().push(chunk[0]);
            Box::pin(async move { Ok::<_, String>((chunk.len() as u64, 0)) })
        })
        .await;
        assert_eq!(*seen.lock().unwrap(), vec![0, 10, 20]);
    }

    #[tokio::test]
    async fn zero_batch_size_is_clamped_to_one() {
        let data = records(3);
        let calls = AtomicUsize::new(0);
        let totals = drain_batches(&data, 0, Duration::ZERO, |chunk| {
            calls.fetch_add(1, Ordering::SeqCst);
            let len = chunk.len() as u64;
            Box::pin(async move { Ok::<_, String>((len, 0)) })
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(totals.loaded, 3);
    }

    #[tokio::test]
    async fn empty_input_yields_zero_totals() {
        let data: Vec<u32> = vec![];
        let totals = drain_batches(&data, 20, Duration::ZERO, |chunk| {
            let len = chunk.len() as u64;
            Box::pin(async move { Ok::<_, String>((len, 0)) })
        })
        .await;
        assert_eq!(totals, BatchTotals::default());
    }
}

//! Bounded, cancellable fan-out for batches of independent requests.

use crate::errors::{ApiError, ApiResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Result of one item of a batch, tagged with its input position.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutcome<K, T> {
    pub index: usize,
    pub key: K,
    pub result: ApiResult<T>,
}

/// When a batch gives up on its remaining items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopOn {
    /// Every item runs to completion.
    #[default]
    Never,
    /// The first failed item cancels the rest of the batch.
    FirstFailure,
}

/// Run `fetch` for every key with at most `concurrency` requests in flight.
///
/// Every key yields exactly one outcome and outcomes come back in input order.
/// Once `cancel` fires, queued and in-flight items resolve to
/// [`ApiError::Cancelled`]. With [`StopOn::FirstFailure`] the first error
/// other than a cancellation does the same to the rest of the batch without
/// touching `cancel` itself.
pub async fn fetch_all<K, T, F, Fut>(
    keys: Vec<K>,
    concurrency: usize,
    stop: StopOn,
    cancel: &CancellationToken,
    fetch: F,
) -> Vec<ItemOutcome<K, T>>
where
    K: Clone + Send + 'static,
    T: Send + 'static,
    F: Fn(K) -> Fut,
    Fut: Future<Output = ApiResult<T>> + Send + 'static,
{
    let limit = Arc::new(Semaphore::new(concurrency.max(1)));
    let batch_cancel = cancel.child_token();
    let mut tasks = JoinSet::new();
    let mut slots: Vec<Option<ItemOutcome<K, T>>> = keys.iter().map(|_| None).collect();

    debug!(items = keys.len(), concurrency, "starting batch");
    for (index, key) in keys.iter().cloned().enumerate() {
        let request = fetch(key.clone());
        let limit = Arc::clone(&limit);
        let cancel = batch_cancel.clone();
        tasks.spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ApiError::Cancelled),
                result = with_permit(limit, request) => result,
            };
            ItemOutcome { index, key, result }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => {
                let failed = matches!(&outcome.result, Err(err) if !err.is_cancelled());
                if failed && stop == StopOn::FirstFailure && !batch_cancel.is_cancelled() {
                    debug!(index = outcome.index, "item failed, stopping batch");
                    batch_cancel.cancel();
                }
                let index = outcome.index;
                slots[index] = Some(outcome);
            }
            Err(err) => error!(error = %err, "batch worker did not finish"),
        }
    }

    slots
        .into_iter()
        .zip(keys)
        .enumerate()
        .map(|(index, (slot, key))| {
            slot.unwrap_or_else(|| ItemOutcome {
                index,
                key,
                result: Err(ApiError::Transport {
                    resource: format!("batch item {}", index + 1),
                    message: "worker task aborted".to_string(),
                }),
            })
        })
        .collect()
}

async fn with_permit<T, Fut>(limit: Arc<Semaphore>, request: Fut) -> ApiResult<T>
where
    Fut: Future<Output = ApiResult<T>>,
{
    let _permit = limit.acquire_owned().await.map_err(|_| ApiError::Cancelled)?;
    request.await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Gauge {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Gauge {
        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }

        fn leave(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_outcomes_keep_input_order_under_bound() {
        let gauge = Arc::new(Gauge::default());
        let cancel = CancellationToken::new();
        let keys: Vec<u64> = vec![30, 5, 20, 1, 10, 15];

        let outcomes = fetch_all(keys.clone(), 2, StopOn::Never, &cancel, |key| {
            let gauge = Arc::clone(&gauge);
            async move {
                gauge.enter();
                tokio::time::sleep(Duration::from_millis(key)).await;
                gauge.leave();
                Ok(key * 2)
            }
        })
        .await;

        let values: Vec<u64> = outcomes
            .iter()
            .map(|outcome| *outcome.result.as_ref().unwrap())
            .collect();
        assert_eq!(values, vec![60, 10, 40, 2, 20, 30]);
        assert_eq!(
            outcomes.iter().map(|o| o.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4, 5]
        );
        assert!(gauge.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_failures_are_reported_per_item() {
        let cancel = CancellationToken::new();

        let outcomes = fetch_all(vec![1u32, 2, 3], 8, StopOn::Never, &cancel, |key| async move {
            if key == 2 {
                Err(ApiError::NotFound {
                    resource: format!("entry {}", key),
                })
            } else {
                Ok(key)
            }
        })
        .await;

        assert_eq!(outcomes[0].result, Ok(1));
        assert!(outcomes[1].result.as_ref().unwrap_err().is_not_found());
        assert_eq!(outcomes[2].result, Ok(3));
    }

    #[tokio::test]
    async fn test_cancelled_token_resolves_everything_as_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcomes = fetch_all(vec!["a", "b"], 1, StopOn::Never, &cancel, |_| async { Ok(()) }).await;

        assert!(outcomes.iter().all(|o| o.result == Err(ApiError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_in_flight_requests() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let outcomes = fetch_all(vec![1u32, 2, 3], 3, StopOn::Never, &cancel, |key| async move {
            if key == 2 {
                std::future::pending::<()>().await;
            }
            Ok(key)
        })
        .await;

        assert_eq!(outcomes[0].result, Ok(1));
        assert_eq!(outcomes[1].result, Err(ApiError::Cancelled));
        assert_eq!(outcomes[2].result, Ok(3));
    }

    #[tokio::test]
    async fn test_first_failure_stops_the_rest_of_the_batch() {
        let cancel = CancellationToken::new();

        let outcomes = tokio::time::timeout(
            Duration::from_millis(500),
            fetch_all(vec![1u32, 2, 3], 3, StopOn::FirstFailure, &cancel, |key| async move {
                match key {
                    2 => Err(ApiError::Status {
                        resource: format!("entry {}", key),
                        status: 500,
                    }),
                    3 => std::future::pending().await,
                    _ => Ok(key),
                }
            }),
        )
        .await
        .expect("batch kept waiting after a failure");

        assert_eq!(outcomes[0].result, Ok(1));
        assert!(matches!(
            outcomes[1].result,
            Err(ApiError::Status { status: 500, .. })
        ));
        assert_eq!(outcomes[2].result, Err(ApiError::Cancelled));
        assert!(!cancel.is_cancelled());
    }
}

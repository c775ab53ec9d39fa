//! Bounded-concurrency dispatch of favicon fetches.
//!
//! Targets are pulled lazily, each one is fetched and hashed on its own tokio
//! task, and outcomes are yielded in completion order so a slow host never
//! holds up reporting for fast ones.

use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;

use crate::error_handling::FetchError;
use crate::favicon::{favicon_hash, FaviconFetcher, FetchOutcome};
use crate::target::Target;

/// Hash (or classified failure) for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: Target,
    pub result: Result<i32, FetchError>,
}

impl TargetOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fetches then hashes one target.
async fn process_target<F: FaviconFetcher>(fetcher: &F, target: Target) -> TargetOutcome {
    match fetcher.fetch(&target).await {
        FetchOutcome::Success { target, bytes } => {
            let hash = favicon_hash(&bytes);
            log::debug!("Hashed {} -> {}", target, hash);
            TargetOutcome {
                target,
                result: Ok(hash),
            }
        }
        FetchOutcome::Failure { target, error } => TargetOutcome {
            target,
            result: Err(error),
        },
    }
}

/// Runs fetch and hash over every target with at most `concurrency` in flight.
///
/// The returned stream yields exactly one outcome per target, in completion
/// order, and ends once all of them have resolved. When `cancel` fires no
/// further targets are started, in-flight tasks are aborted, and the stream
/// ends immediately; outcomes already yielded are unaffected.
pub fn dispatch<F: FaviconFetcher>(
    targets: Vec<Target>,
    fetcher: Arc<F>,
    concurrency: usize,
    cancel: CancellationToken,
) -> impl Stream<Item = TargetOutcome> + Send {
    let concurrency = concurrency.max(1);
    let stop_submitting = cancel.clone();

    stream::iter(targets)
        .take_while(move |_| futures::future::ready(!stop_submitting.is_cancelled()))
        .map(move |target| {
            let fetcher = Arc::clone(&fetcher);
            async move {
                let task = AbortOnDropHandle::new(tokio::spawn({
                    let target = target.clone();
                    async move { process_target(fetcher.as_ref(), target).await }
                }));
                match task.await {
                    Ok(outcome) => outcome,
                    Err(join_error) => {
                        log::warn!("Worker for {} failed: {}", target, join_error);
                        TargetOutcome {
                            target,
                            result: Err(FetchError::Other(format!(
                                "worker task failed: {join_error}"
                            ))),
                        }
                    }
                }
            }
        })
        .buffer_unordered(concurrency)
        .take_until(cancel.cancelled_owned())
}

//! Progress logging and end-of-run statistics.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};
use strum::IntoEnumIterator;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::LOGGING_INTERVAL;
use crate::error_handling::{ErrorType, ProcessingStats};

/// Logs how many targets have resolved and the overall rate.
pub fn log_progress(start_time: Instant, completed: &AtomicUsize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let completed = completed.load(Ordering::SeqCst);
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Processed {}/{} targets in {:.2} seconds (~{:.2}/sec)",
        completed, total, elapsed_secs, rate
    );
}

/// Spawns a task that logs progress every `LOGGING_INTERVAL` seconds until `stop` fires.
pub fn spawn_progress_logger(
    start_time: Instant,
    completed: Arc<AtomicUsize>,
    total: usize,
    stop: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL));
        // The first tick fires immediately.
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => log_progress(start_time, &completed, total),
                _ = stop.cancelled() => break,
            }
        }
    })
}

/// Stops the progress logger and waits for it. Returns `false` if the task panicked.
pub async fn stop_progress_logger(stop: &CancellationToken, task: JoinHandle<()>) -> bool {
    stop.cancel();
    match task.await {
        Ok(()) => true,
        Err(join_error) => {
            warn!("Progress logger task failed: {}", join_error);
            false
        }
    }
}

/// Logs non-zero failure counts by category.
pub fn print_error_statistics(stats: &ProcessingStats) {
    let total_errors = stats.total_errors();
    if total_errors == 0 {
        return;
    }
    info!("Error Counts ({} total):", total_errors);
    for error_type in ErrorType::iter() {
        let count = stats.get_error_count(error_type);
        if count > 0 {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }
}

/// One-line summary at the end of a run.
pub fn print_summary(total: usize, fetched: usize, failed: usize, distinct: usize, secs: f64) {
    info!(
        "✅ Processed {} target{} ({} fetched, {} failed, {} distinct hash{}) in {:.1}s",
        total,
        if total == 1 { "" } else { "s" },
        fetched,
        failed,
        distinct,
        if distinct == 1 { "" } else { "es" },
        secs
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_error_statistics_no_errors() {
        let stats = ProcessingStats::new();
        print_error_statistics(&stats);
    }

    #[test]
    fn test_print_error_statistics_with_errors() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::HttpRequestTimeoutError);
        stats.increment_error(ErrorType::HttpRequestNotFound);
        print_error_statistics(&stats);
        assert_eq!(stats.total_errors(), 2);
    }

    #[tokio::test]
    async fn test_progress_logger_stops_on_cancel() {
        let stop = CancellationToken::new();
        let handle = spawn_progress_logger(
            Instant::now(),
            Arc::new(AtomicUsize::new(0)),
            10,
            stop.clone(),
        );
        stop.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("logger should stop promptly")
            .expect("logger task should not panic");
    }

    #[tokio::test]
    async fn test_stop_progress_logger_clean_exit() {
        let stop = CancellationToken::new();
        let handle = spawn_progress_logger(
            Instant::now(),
            Arc::new(AtomicUsize::new(0)),
            10,
            stop.clone(),
        );
        assert!(stop_progress_logger(&stop, handle).await);
        assert!(stop.is_cancelled());
    }

    #[tokio::test]
    async fn test_stop_progress_logger_reports_panicked_task() {
        let stop = CancellationToken::new();
        let handle = tokio::spawn(async { panic!("progress logger bug") });
        assert!(!stop_progress_logger(&stop, handle).await);
    }
}

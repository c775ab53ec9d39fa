//! Run orchestration: input, dispatch, aggregation, service scans, result.

mod input;
mod progress;

pub use input::{read_targets, read_targets_from};
pub use progress::{log_progress, print_error_statistics};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::aggregate::Aggregator;
use crate::config::{Config, DEFAULT_CONCURRENCY, MAX_CONCURRENT_SERVICE_SCANS};
use crate::dispatch::{dispatch, TargetOutcome};
use crate::error_handling::{ErrorType, ProcessingStats, ScanError};
use crate::favicon::{FaviconFetcher, HttpFetcher};
use crate::fingerprint::FingerprintDb;
use crate::initialization::init_client;
use crate::model::{RunSummary, ScanResult, ServiceScanRecord, TargetReport, TargetStatus};
use crate::output;
use crate::service_scan::{NmapScanner, ServiceScanner};
use crate::target::Target;

/// Everything a scan needs besides its targets.
pub struct ScanContext<F, S> {
    pub fetcher: Arc<F>,
    /// Runs against every fetched target when present.
    pub scanner: Option<Arc<S>>,
    pub fingerprints: Arc<FingerprintDb>,
    pub concurrency: usize,
    pub dorks_enabled: bool,
    /// Fired on interrupt. Stops new work; completed outcomes are kept.
    pub cancel: CancellationToken,
}

impl<F: FaviconFetcher> ScanContext<F, NmapScanner> {
    /// Context with default concurrency, no dorks, and no service scan.
    pub fn new(fetcher: Arc<F>, fingerprints: Arc<FingerprintDb>) -> Self {
        Self {
            fetcher,
            scanner: None,
            fingerprints,
            concurrency: DEFAULT_CONCURRENCY,
            dorks_enabled: false,
            cancel: CancellationToken::new(),
        }
    }
}

impl<F: FaviconFetcher, S: ServiceScanner> ScanContext<F, S> {
    /// Replaces the service scanner.
    pub fn with_scanner<S2: ServiceScanner>(self, scanner: Arc<S2>) -> ScanContext<F, S2> {
        ScanContext {
            fetcher: self.fetcher,
            scanner: Some(scanner),
            fingerprints: self.fingerprints,
            concurrency: self.concurrency,
            dorks_enabled: self.dorks_enabled,
            cancel: self.cancel,
        }
    }
}

/// Runs the full pipeline for a configuration, printing per-target lines to stdout.
///
/// Reads the targets, builds the HTTP client, and hands off to [`scan_targets`].
///
/// # Errors
///
/// Fails only on setup problems: unreadable input or HTTP client construction.
/// Per-target failures are part of the returned result.
pub async fn run_scan(
    config: &Config,
    fingerprints: Arc<FingerprintDb>,
    cancel: CancellationToken,
) -> Result<ScanResult> {
    let targets = read_targets(config).await?;

    let client = init_client(config).context("Failed to initialize HTTP client")?;
    let fetcher = Arc::new(HttpFetcher::new(
        client,
        Duration::from_secs(config.timeout_seconds),
        config.max_favicon_bytes,
    ));

    let mut ctx = ScanContext::new(fetcher, fingerprints);
    ctx.concurrency = config.max_concurrency;
    ctx.dorks_enabled = config.shodan;
    ctx.cancel = cancel;
    if config.service_scan_enabled() {
        info!("Service scan enabled for fetched targets");
        ctx.scanner = Some(Arc::new(NmapScanner::default()));
    }

    let mut console = output::console();
    let result = scan_targets(&ctx, targets, |outcome| {
        if let Err(e) = output::write_outcome_line(&mut console, outcome) {
            warn!("Failed to write to stdout: {e}");
        }
    })
    .await;
    Ok(result)
}

/// Fetches, hashes, and groups every target, then runs service scans if enabled.
///
/// `on_outcome` sees each outcome as soon as it resolves, in completion order.
/// If `ctx.cancel` fires, the result covers only the targets that completed
/// and `interrupted` is set.
pub async fn scan_targets<F, S>(
    ctx: &ScanContext<F, S>,
    targets: Vec<Target>,
    mut on_outcome: impl FnMut(&TargetOutcome),
) -> ScanResult
where
    F: FaviconFetcher,
    S: ServiceScanner,
{
    let start_time = Instant::now();
    let total = targets.len();
    info!(
        "Fetching {} favicon{} with concurrency {}",
        total,
        if total == 1 { "" } else { "s" },
        ctx.concurrency
    );

    let stats = ProcessingStats::new();
    let aggregator = Aggregator::new();
    let completed = Arc::new(AtomicUsize::new(0));
    let mut reports = Vec::with_capacity(total);

    let stop_logging = CancellationToken::new();
    let logging_task = progress::spawn_progress_logger(
        start_time,
        Arc::clone(&completed),
        total,
        stop_logging.clone(),
    );

    let mut outcomes = std::pin::pin!(dispatch(
        targets,
        Arc::clone(&ctx.fetcher),
        ctx.concurrency,
        ctx.cancel.clone(),
    ));
    while let Some(outcome) = outcomes.next().await {
        on_outcome(&outcome);
        completed.fetch_add(1, Ordering::SeqCst);

        let status = match &outcome.result {
            Ok(hash) => {
                stats.increment_fetched();
                aggregator.insert(outcome.target.clone(), *hash);
                TargetStatus::Fetched { hash: *hash }
            }
            Err(error) => {
                debug!("Failed to fetch {}: {}", outcome.target, error);
                stats.increment_error(error.error_type());
                TargetStatus::Failed {
                    kind: error.kind(),
                    detail: error.to_string(),
                }
            }
        };
        reports.push(TargetReport {
            target: outcome.target,
            status,
            service_scan: None,
        });
    }

    progress::stop_progress_logger(&stop_logging, logging_task).await;
    log_progress(start_time, &completed, total);

    let interrupted = reports.len() < total;
    if interrupted {
        warn!(
            "Interrupted after {} of {} targets; reporting partial results",
            reports.len(),
            total
        );
    } else if let Some(scanner) = ctx.scanner.as_ref() {
        run_service_scans(&mut reports, scanner, &ctx.cancel, &stats).await;
    }
    // An interrupt during the service scans still counts.
    let interrupted = interrupted || ctx.cancel.is_cancelled();

    let groups = aggregator.into_groups();
    let fetched = stats.fetched();
    let summary = RunSummary {
        total_targets: total,
        fetched,
        failed: reports.len() - fetched,
        distinct_hashes: groups.len(),
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    };

    print_error_statistics(&stats);
    progress::print_summary(
        summary.total_targets,
        summary.fetched,
        summary.failed,
        summary.distinct_hashes,
        summary.elapsed_seconds,
    );

    ScanResult::new(
        groups,
        reports,
        summary,
        interrupted,
        Arc::clone(&ctx.fingerprints),
        ctx.dorks_enabled,
    )
}

/// Scans every fetched target's host and records the outcome in its report.
async fn run_service_scans<S: ServiceScanner>(
    reports: &mut [TargetReport],
    scanner: &Arc<S>,
    cancel: &CancellationToken,
    stats: &ProcessingStats,
) {
    let jobs: Vec<(usize, Option<String>)> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_fetched())
        .map(|(i, r)| (i, r.target.bare_domain()))
        .collect();
    if jobs.is_empty() {
        return;
    }
    info!("Running service scans against {} host(s)", jobs.len());

    // The flag marks records that count as scan failures.
    let results: Vec<(usize, ServiceScanRecord, bool)> = stream::iter(jobs)
        .map(|(index, domain)| {
            let scanner = Arc::clone(scanner);
            let cancel = cancel.clone();
            async move {
                let Some(domain) = domain else {
                    let record = ServiceScanRecord::Error("target has no scannable host".to_string());
                    return (index, record, true);
                };
                let result = tokio::select! {
                    result = scanner.scan(&domain) => result,
                    _ = cancel.cancelled() => Err(ScanError::Cancelled),
                };
                match result {
                    Ok(output) => (index, ServiceScanRecord::Completed(output), false),
                    Err(ScanError::Cancelled) => {
                        debug!("Service scan of {} cancelled", domain);
                        (index, ServiceScanRecord::Error(ScanError::Cancelled.to_string()), false)
                    }
                    Err(e) => {
                        warn!("Service scan of {} failed: {}", domain, e);
                        (index, ServiceScanRecord::Error(e.to_string()), true)
                    }
                }
            }
        })
        .buffer_unordered(MAX_CONCURRENT_SERVICE_SCANS)
        .collect()
        .await;

    for (index, record, failed) in results {
        if failed {
            stats.increment_error(ErrorType::ServiceScanError);
        }
        reports[index].service_scan = Some(record);
    }
}

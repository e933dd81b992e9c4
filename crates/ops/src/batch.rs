//! Batch download: resolve and fetch every reference on a bounded pool

use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use vsixget_catalog::CatalogQuery;
use vsixget_errors::{ConfigError, Error};
use vsixget_events::{AppEvent, BatchEvent, EventEmitter};
use vsixget_net::ArtifactDownloader;
use vsixget_resolver::Resolver;
use vsixget_types::{BatchReport, DownloadOutcome, ExtensionRef};

use crate::semaphore::{acquire_semaphore_permit, create_semaphore};
use crate::OpsCtx;

/// Resolve and download every reference into `dest_dir`
///
/// References are dispatched in the given order, at most `ctx.jobs` at a
/// time. A failing reference never stops the others; its failure becomes an
/// outcome in the report. After cancellation no new reference is started
/// and every unstarted or abandoned reference is reported as cancelled.
///
/// # Errors
///
/// Only process-level problems are errors: the destination directory
/// cannot be created, or the worker pool breaks down.
pub async fn download<C>(
    ctx: &OpsCtx<C>,
    refs: &[ExtensionRef],
    dest_dir: &Path,
    use_cache: bool,
) -> Result<BatchReport, Error>
where
    C: CatalogQuery + 'static,
{
    let start = Instant::now();

    // Idempotent; concurrent creators all succeed
    tokio::fs::create_dir_all(dest_dir)
        .await
        .map_err(|e| ConfigError::DirectoryNotCreatable {
            path: dest_dir.display().to_string(),
            message: e.to_string(),
        })?;

    ctx.emit_operation_started("download");
    ctx.emit(AppEvent::Batch(BatchEvent::Started {
        total: refs.len(),
        jobs: ctx.jobs,
        destination: dest_dir.to_path_buf(),
    }));

    let semaphore = create_semaphore(ctx.jobs);
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<DownloadOutcome>();
    let mut workers: Vec<(String, JoinHandle<()>)> = Vec::with_capacity(refs.len());
    let mut cancelled = Vec::new();

    for (index, reference) in refs.iter().enumerate() {
        let permit = tokio::select! {
            biased;
            () = ctx.cancel.cancelled() => None,
            permit = acquire_semaphore_permit(semaphore.clone(), "download worker") => {
                Some(permit?)
            }
        };
        let Some(permit) = permit else {
            cancelled.extend(refs[index..].iter().map(|r| {
                DownloadOutcome::failed(r.label(), Error::Cancelled)
            }));
            ctx.emit(AppEvent::Batch(BatchEvent::Cancelled {
                remaining: refs.len() - index,
            }));
            break;
        };

        let job = Job {
            resolver: ctx.resolver.clone(),
            downloader: ctx.downloader.clone(),
            cancel: ctx.cancel.clone(),
            reference: reference.clone(),
            dest_dir: dest_dir.to_path_buf(),
            use_cache,
        };
        let outcome_tx = outcome_tx.clone();
        let handle = tokio::spawn(async move {
            let _permit = permit;
            let outcome = job.run().await;
            // Collector outlives every worker
            let _ = outcome_tx.send(outcome);
        });
        workers.push((reference.label(), handle));
    }
    drop(outcome_tx);

    let total = refs.len();
    let mut outcomes = Vec::with_capacity(total);
    while let Some(outcome) = outcome_rx.recv().await {
        record(ctx, &mut outcomes, outcome, total);
    }

    // A worker that died without reporting still gets an outcome
    for (label, handle) in workers {
        if let Err(e) = handle.await {
            tracing::error!(%label, error = %e, "download worker failed");
            ctx.emit_error(format!("download worker for {label} failed: {e}"));
            let outcome =
                DownloadOutcome::failed(label, Error::internal(format!("worker failed: {e}")));
            record(ctx, &mut outcomes, outcome, total);
        }
    }
    outcomes.extend(cancelled);

    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let report = BatchReport::new(outcomes, duration_ms);

    ctx.emit(AppEvent::Batch(BatchEvent::Completed {
        succeeded: report.succeeded_count(),
        failed: report.failed_labels().len(),
        cached: report.cached_count(),
        duration_ms,
    }));
    ctx.emit_operation_completed("download", report.is_success());

    Ok(report)
}

fn record<C>(
    ctx: &OpsCtx<C>,
    outcomes: &mut Vec<DownloadOutcome>,
    outcome: DownloadOutcome,
    total: usize,
) {
    ctx.emit(AppEvent::Batch(BatchEvent::OutcomeRecorded {
        label: outcome.artifact_label.clone(),
        success: outcome.success,
        completed: outcomes.len() + 1,
        total,
    }));
    outcomes.push(outcome);
}

/// Everything one worker needs, owned so it can move into a task
struct Job<C> {
    resolver: Resolver<C>,
    downloader: ArtifactDownloader,
    cancel: CancellationToken,
    reference: ExtensionRef,
    dest_dir: PathBuf,
    use_cache: bool,
}

impl<C: CatalogQuery> Job<C> {
    async fn run(self) -> DownloadOutcome {
        let label = self.reference.label();
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => DownloadOutcome::failed(label, Error::Cancelled),
            outcome = self.process() => outcome,
        }
    }

    async fn process(&self) -> DownloadOutcome {
        match self.resolver.resolve(&self.reference).await {
            Ok(artifact) => {
                self.downloader
                    .fetch(&artifact, &self.dest_dir, self.use_cache)
                    .await
            }
            Err(e) => DownloadOutcome::failed(self.reference.label(), e.into()),
        }
    }
}

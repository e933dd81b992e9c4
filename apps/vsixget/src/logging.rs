//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields so the
//! same run can be followed on the console or in a JSON log file.

use tracing::{debug, error, info, warn};
use vsixget_events::{AppEvent, BatchEvent, DownloadEvent, GeneralEvent, ResolverEvent};

/// Log an `AppEvent` through tracing at the level its domain assigns
pub fn log_event_with_tracing(event: &AppEvent) {
    let source = event.event_source();
    let source = source.as_str();

    match event {
        AppEvent::General(general) => match general {
            GeneralEvent::Warning { message } => {
                warn!(source, "{message}");
            }
            GeneralEvent::Error { message } => {
                error!(source, "{message}");
            }
            GeneralEvent::OperationStarted { operation } => {
                info!(source, %operation, "Operation started");
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(source, %operation, success, "Operation completed");
            }
        },

        AppEvent::Resolver(resolver) => match resolver {
            ResolverEvent::QueryStarted { reference } => {
                debug!(source, %reference, "Querying catalog");
            }
            ResolverEvent::QueryRetrying {
                reference,
                attempt,
                delay_ms,
                reason,
            } => {
                warn!(source, %reference, attempt, delay_ms, %reason, "Retrying catalog query");
            }
            ResolverEvent::VariantSkipped {
                reference,
                version,
                platform,
            } => {
                debug!(
                    source,
                    %reference,
                    %version,
                    %platform,
                    "Skipped variant with unknown platform"
                );
            }
            ResolverEvent::Resolved {
                reference,
                artifact,
            } => {
                info!(source, %reference, %artifact, "Resolved");
            }
            ResolverEvent::Failed { reference, failure } => {
                error!(
                    source,
                    %reference,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Resolution failed"
                );
            }
        },

        AppEvent::Download(download) => match download {
            DownloadEvent::CacheHit { label, path } => {
                info!(source, %label, path = %path.display(), "Using cached file");
            }
            DownloadEvent::Started {
                label,
                url,
                resume_from,
            } => {
                info!(source, %label, %url, offset = resume_from, "Download started");
            }
            DownloadEvent::Restarted { label, status } => {
                warn!(source, %label, status, "Server did not honor resume, restarting");
            }
            DownloadEvent::Retrying {
                label,
                attempt,
                delay_ms,
                reason,
            } => {
                warn!(source, %label, attempt, delay_ms, %reason, "Retrying download");
            }
            DownloadEvent::Decoding { label, encoding } => {
                debug!(source, %label, %encoding, "Decoding body");
            }
            DownloadEvent::Completed { label, path, bytes } => {
                info!(source, %label, path = %path.display(), bytes, "Download completed");
            }
            DownloadEvent::Failed { label, failure } => {
                error!(
                    source,
                    %label,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Download failed"
                );
            }
        },

        AppEvent::Batch(batch) => match batch {
            BatchEvent::Started {
                total,
                jobs,
                destination,
            } => {
                info!(source, total, jobs, destination = %destination.display(), "Batch started");
            }
            BatchEvent::OutcomeRecorded {
                label,
                success,
                completed,
                total,
            } => {
                debug!(source, %label, success, completed, total, "Outcome recorded");
            }
            BatchEvent::Cancelled { remaining } => {
                warn!(source, remaining, "Batch cancelled");
            }
            BatchEvent::Completed {
                succeeded,
                failed,
                cached,
                duration_ms,
            } => {
                info!(source, succeeded, failed, cached, duration_ms, "Batch completed");
            }
        },
    }
}

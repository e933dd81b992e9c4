//! Main transfer orchestration and `ArtifactDownloader` implementation

use super::config::TransferConfig;
use super::decode::decode_body;
use super::resume::get_resume_offset;
use super::retry::calculate_backoff_delay;
use super::staging::{remove_if_exists, ResponseMeta, StagingPaths};
use super::stream::{stream_to_staging, WriteMode};
use super::validation::{download_url, validate_response, ResponseAction};
use crate::client::NetClient;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use vsixget_errors::{TransferError, UserFacingError};
use vsixget_events::{AppEvent, DownloadEvent, EventEmitter, EventSender};
use vsixget_types::{DownloadOutcome, ResolvedArtifact};

/// A resumable artifact downloader
///
/// Cloning is cheap; clones share the HTTP pool and the per-artifact locks,
/// so two workers that resolve to the same artifact never write the same
/// staging file at once.
#[derive(Clone)]
pub struct ArtifactDownloader {
    client: NetClient,
    config: TransferConfig,
    gallery_url: String,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    tx: Option<EventSender>,
}

impl EventEmitter for ArtifactDownloader {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl ArtifactDownloader {
    /// Create a new downloader on top of an existing client
    #[must_use]
    pub fn new(client: NetClient, gallery_url: impl Into<String>, config: TransferConfig) -> Self {
        Self {
            client,
            config,
            gallery_url: gallery_url.into(),
            locks: Arc::new(DashMap::new()),
            tx: None,
        }
    }

    /// Attach an event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Gallery root the download URLs are built from
    #[must_use]
    pub fn gallery_url(&self) -> &str {
        &self.gallery_url
    }

    /// Fetch one artifact into `dest_dir`
    ///
    /// Never fails as a whole: every problem is folded into the returned
    /// outcome. With `use_cache`, an existing final file is reused without
    /// any network traffic and a leftover staging file is resumed.
    pub async fn fetch(
        &self,
        artifact: &ResolvedArtifact,
        dest_dir: &Path,
        use_cache: bool,
    ) -> DownloadOutcome {
        let label = artifact.label();
        match self.fetch_inner(artifact, &label, dest_dir, use_cache).await {
            Ok((path, from_cache)) => DownloadOutcome::succeeded(label, path, from_cache),
            Err(e) => {
                self.emit_download_failed(label.clone(), &e);
                DownloadOutcome::failed(label, e.into())
            }
        }
    }

    async fn fetch_inner(
        &self,
        artifact: &ResolvedArtifact,
        label: &str,
        dest_dir: &Path,
        use_cache: bool,
    ) -> Result<(PathBuf, bool), TransferError> {
        let paths = StagingPaths::new(dest_dir, artifact);

        let lock = self
            .locks
            .entry(label.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        if use_cache && tokio::fs::try_exists(&paths.final_path).await.unwrap_or(false) {
            self.emit(AppEvent::Download(DownloadEvent::CacheHit {
                label: label.to_string(),
                path: paths.final_path.clone(),
            }));
            return Ok((paths.final_path, true));
        }

        let url = download_url(&self.gallery_url, artifact)?.to_string();

        if !use_cache {
            remove_if_exists(&paths.part).await?;
        }

        let result = match self.transfer_with_retry(&url, &paths, label).await {
            Ok(()) => self.finalize(&paths, label).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(bytes) => {
                self.emit_download_completed(label, paths.final_path.clone(), bytes);
                Ok((paths.final_path, false))
            }
            Err(e) => {
                // Staging file is kept for the next attempt
                for leftover in [&paths.meta, &paths.tmp] {
                    if let Err(cleanup) = remove_if_exists(leftover).await {
                        tracing::debug!(
                            path = %leftover.display(),
                            error = %cleanup,
                            "failed to remove transfer leftover"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Run transfer attempts until one succeeds or the error is not retryable
    async fn transfer_with_retry(
        &self,
        url: &str,
        paths: &StagingPaths,
        label: &str,
    ) -> Result<(), TransferError> {
        let retry_config = &self.config.retry_config;
        let mut attempt = 0;

        loop {
            match self.try_transfer(url, paths, label).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() && attempt < retry_config.max_retries => {
                    attempt += 1;
                    let delay = calculate_backoff_delay(retry_config, attempt);
                    self.emit(AppEvent::Download(DownloadEvent::Retrying {
                        label: label.to_string(),
                        attempt,
                        delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        reason: e.to_string(),
                    }));
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Attempt a single transfer, resuming from the staging file
    async fn try_transfer(
        &self,
        url: &str,
        paths: &StagingPaths,
        label: &str,
    ) -> Result<(), TransferError> {
        let mut restarted = false;

        loop {
            let resume_offset = get_resume_offset(&paths.part).await?;
            self.emit_download_started(label, url, resume_offset);

            let range = format!("bytes={resume_offset}-");
            let mut headers = Vec::new();
            if resume_offset > 0 {
                headers.push(("Range", range.as_str()));
            }

            let response = self
                .client
                .get_with_headers(url, &headers)
                .await
                .map_err(|e| map_transport_error(url, &e))?;
            let status = response.status();

            let mode = match validate_response(status, resume_offset, url)? {
                ResponseAction::Write(mode) => mode,
                ResponseAction::DiscardAndRestart if !restarted => {
                    tracing::debug!(%url, resume_offset, "range not satisfiable, restarting");
                    self.emit(AppEvent::Download(DownloadEvent::Restarted {
                        label: label.to_string(),
                        status: status.as_u16(),
                    }));
                    remove_if_exists(&paths.part).await?;
                    restarted = true;
                    continue;
                }
                ResponseAction::DiscardAndRestart => {
                    remove_if_exists(&paths.part).await?;
                    return Err(TransferError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
            };

            if mode == WriteMode::Truncate && resume_offset > 0 {
                tracing::debug!(%url, resume_offset, "server ignored range request");
                self.emit(AppEvent::Download(DownloadEvent::Restarted {
                    label: label.to_string(),
                    status: status.as_u16(),
                }));
            }

            ResponseMeta::from_response(&response)
                .write(&paths.meta)
                .await?;

            let written =
                stream_to_staging(response, &paths.part, mode, self.config.chunk_timeout, url)
                    .await?;
            tracing::debug!(%url, written, resume_offset, "transfer finished");
            return Ok(());
        }
    }

    /// Decode the staged body and move it into place
    async fn finalize(&self, paths: &StagingPaths, label: &str) -> Result<u64, TransferError> {
        let meta = ResponseMeta::read(&paths.meta).await?;
        let raw = tokio::fs::read(&paths.part)
            .await
            .map_err(|e| TransferError::filesystem(&paths.part, &e))?;

        if let Some(encoding) = meta.content_encoding.clone() {
            self.emit(AppEvent::Download(DownloadEvent::Decoding {
                label: label.to_string(),
                encoding,
            }));
        }

        let encoding = meta.content_encoding;
        let body = tokio::task::spawn_blocking(move || decode_body(encoding.as_deref(), raw))
            .await
            .map_err(|e| TransferError::Decode {
                encoding: "unknown".to_string(),
                message: e.to_string(),
            })??;

        tokio::fs::write(&paths.tmp, &body)
            .await
            .map_err(|e| TransferError::filesystem(&paths.tmp, &e))?;
        tokio::fs::rename(&paths.tmp, &paths.final_path)
            .await
            .map_err(|e| TransferError::filesystem(&paths.final_path, &e))?;

        remove_if_exists(&paths.part).await?;
        remove_if_exists(&paths.meta).await?;

        Ok(body.len() as u64)
    }
}

fn map_transport_error(url: &str, err: &reqwest::Error) -> TransferError {
    if err.is_timeout() {
        TransferError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransferError::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

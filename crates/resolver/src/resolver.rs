//! Catalog-backed resolver with retry

use std::sync::Arc;

use vsixget_catalog::CatalogQuery;
use vsixget_errors::{QueryError, ResolveError, UserFacingError};
use vsixget_events::{AppEvent, EventEmitter, EventSender, ResolverEvent};
use vsixget_net::{calculate_backoff_delay, RetryConfig};
use vsixget_types::{CatalogEntry, ExtensionRef, ResolvedArtifact};

use crate::select::select_variant;

/// Resolver over any catalog source
///
/// The catalog is always consulted, even for fully pinned references, so a
/// version/platform combination that does not exist is reported before any
/// transfer is attempted.
pub struct Resolver<C> {
    catalog: Arc<C>,
    retry_config: RetryConfig,
    tx: Option<EventSender>,
}

impl<C> Clone for Resolver<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            retry_config: self.retry_config.clone(),
            tx: self.tx.clone(),
        }
    }
}

impl<C> EventEmitter for Resolver<C> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl<C: CatalogQuery> Resolver<C> {
    #[must_use]
    pub fn new(catalog: C, retry_config: RetryConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            retry_config,
            tx: None,
        }
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Resolve one reference to an exact artifact
    ///
    /// # Errors
    ///
    /// `CatalogUnavailable` when the catalog query fails (after retrying
    /// transient failures), `NoMatchingVariant` when no variant fits.
    pub async fn resolve(
        &self,
        reference: &ExtensionRef,
    ) -> Result<ResolvedArtifact, ResolveError> {
        let label = reference.label();
        let result = match self.query_with_retry(reference, &label).await {
            Ok(entry) => select_variant(reference, &entry),
            Err(source) => Err(ResolveError::CatalogUnavailable {
                extension: reference.extension_id(),
                source,
            }),
        };

        match &result {
            Ok(artifact) => {
                tracing::debug!(reference = %label, artifact = %artifact.label(), "resolved");
                self.emit(AppEvent::Resolver(ResolverEvent::Resolved {
                    reference: label,
                    artifact: artifact.label(),
                }));
            }
            Err(e) => self.emit_resolve_failed(label, e),
        }
        result
    }

    async fn query_with_retry(
        &self,
        reference: &ExtensionRef,
        label: &str,
    ) -> Result<CatalogEntry, QueryError> {
        let mut attempt = 0;
        loop {
            self.emit(AppEvent::Resolver(ResolverEvent::QueryStarted {
                reference: label.to_string(),
            }));
            match self
                .catalog
                .query(&reference.publisher, &reference.package)
                .await
            {
                Ok(entry) => return Ok(entry),
                Err(e) if e.is_retryable() && attempt < self.retry_config.max_retries => {
                    attempt += 1;
                    let delay = calculate_backoff_delay(&self.retry_config, attempt);
                    self.emit(AppEvent::Resolver(ResolverEvent::QueryRetrying {
                        reference: label.to_string(),
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
}

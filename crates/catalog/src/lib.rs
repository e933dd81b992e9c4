#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Marketplace catalog queries for vsixget
//!
//! One POST to the gallery's `extensionquery` endpoint per extension. The
//! response is reduced to a [`CatalogEntry`] listing every version/platform
//! variant in catalog order (most recent first). No retries happen here;
//! the resolver owns retry policy.

pub mod models;

use std::future::Future;

use vsixget_errors::QueryError;
use vsixget_events::{AppEvent, EventEmitter, EventSender, ResolverEvent};
use vsixget_net::NetClient;
use vsixget_types::{normalize_platform, CatalogEntry, VersionVariant};

pub use models::{ExtensionQuery, QueryResponse, FILTER_TYPE_EXTENSION_NAME, QUERY_FLAGS};

/// `Accept` header pinning the gallery API version
pub const ACCEPT_HEADER: &str = "application/json;api-version=3.0-preview.1";

/// Source of catalog metadata
pub trait CatalogQuery: Send + Sync {
    /// Fetch every variant of `publisher.package`
    fn query(
        &self,
        publisher: &str,
        package: &str,
    ) -> impl Future<Output = Result<CatalogEntry, QueryError>> + Send;
}

/// Client for the public Visual Studio Marketplace gallery
#[derive(Clone)]
pub struct MarketplaceCatalog {
    client: NetClient,
    gallery_url: String,
    tx: Option<EventSender>,
}

impl EventEmitter for MarketplaceCatalog {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl MarketplaceCatalog {
    #[must_use]
    pub fn new(client: NetClient, gallery_url: impl Into<String>) -> Self {
        Self {
            client,
            gallery_url: gallery_url.into(),
            tx: None,
        }
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Full URL of the query endpoint
    #[must_use]
    pub fn query_url(&self) -> String {
        format!("{}/extensionquery", self.gallery_url.trim_end_matches('/'))
    }

    async fn query_inner(
        &self,
        publisher: &str,
        package: &str,
    ) -> Result<CatalogEntry, QueryError> {
        let extension = format!("{publisher}.{package}");
        let url = self.query_url();
        let body = ExtensionQuery::for_extension(&extension);

        let response = self
            .client
            .post_json(&url, &body, &[("Accept", ACCEPT_HEADER)])
            .await
            .map_err(|e| transport_error(&extension, &e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%extension, status = status.as_u16(), "catalog query rejected");
            return Err(QueryError::NotFound {
                extension,
                reason: format!("catalog answered HTTP {}", status.as_u16()),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| transport_error(&extension, &e))?;
        let parsed: QueryResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(%extension, error = %e, "catalog response is not the expected shape");
            QueryError::NotFound {
                extension: extension.clone(),
                reason: format!("unexpected response: {e}"),
            }
        })?;

        let Some(found) = parsed.into_first_extension() else {
            tracing::warn!(%extension, "catalog returned no matching extension");
            return Err(QueryError::NotFound {
                extension,
                reason: "no matching extension in catalog".to_string(),
            });
        };

        let mut versions = Vec::with_capacity(found.versions.len());
        for variant in found.versions {
            match normalize_platform(variant.target_platform.as_deref()) {
                Ok(platform) => versions.push(VersionVariant::new(variant.version, platform)),
                Err(_) => {
                    let platform = variant.target_platform.unwrap_or_default();
                    tracing::debug!(
                        %extension,
                        version = %variant.version,
                        %platform,
                        "dropping variant with unknown platform"
                    );
                    self.emit(AppEvent::Resolver(ResolverEvent::VariantSkipped {
                        reference: extension.clone(),
                        version: variant.version,
                        platform,
                    }));
                }
            }
        }

        tracing::debug!(%extension, variants = versions.len(), "catalog query complete");
        Ok(CatalogEntry {
            publisher: publisher.to_string(),
            package: package.to_string(),
            versions,
        })
    }
}

impl CatalogQuery for MarketplaceCatalog {
    fn query(
        &self,
        publisher: &str,
        package: &str,
    ) -> impl Future<Output = Result<CatalogEntry, QueryError>> + Send {
        self.query_inner(publisher, package)
    }
}

fn transport_error(extension: &str, err: &reqwest::Error) -> QueryError {
    if err.is_timeout() {
        QueryError::Timeout {
            extension: extension.to_string(),
        }
    } else {
        QueryError::Transport {
            extension: extension.to_string(),
            message: err.to_string(),
        }
    }
}

//! Operations context for dependency injection

use tokio_util::sync::CancellationToken;
use vsixget_catalog::{CatalogQuery, MarketplaceCatalog};
use vsixget_config::Config;
use vsixget_errors::Error;
use vsixget_events::{EventEmitter, EventSender};
use vsixget_net::{ArtifactDownloader, NetClient, NetConfig, RetryConfig, TransferConfig};
use vsixget_resolver::Resolver;

/// Operations context providing access to all pipeline components
pub struct OpsCtx<C = MarketplaceCatalog> {
    /// Version/platform resolver
    pub resolver: Resolver<C>,
    /// Transfer engine
    pub downloader: ArtifactDownloader,
    /// Worker pool size
    pub jobs: usize,
    /// Cancelled on interrupt; stops new work from starting
    pub cancel: CancellationToken,
    /// Event sender for progress reporting
    pub tx: Option<EventSender>,
}

impl<C> EventEmitter for OpsCtx<C> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl OpsCtx<MarketplaceCatalog> {
    /// Wire the marketplace-backed pipeline from configuration
    ///
    /// Catalog and transfers share one connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn from_config(
        config: &Config,
        tx: EventSender,
        cancel: CancellationToken,
    ) -> Result<Self, Error> {
        let net = NetClient::new(&NetConfig::from_config(config))?;
        let catalog = MarketplaceCatalog::new(net.clone(), config.catalog.gallery_url.clone())
            .with_event_sender(tx.clone());
        let resolver = Resolver::new(catalog, RetryConfig::from_network(&config.network));
        let downloader = ArtifactDownloader::new(
            net,
            config.catalog.gallery_url.clone(),
            TransferConfig::from_network(&config.network),
        );

        OpsContextBuilder::new()
            .with_resolver(resolver)
            .with_downloader(downloader)
            .with_jobs(config.download.jobs)
            .with_cancellation(cancel)
            .with_event_sender(tx)
            .build()
    }
}

/// Builder for operations context
pub struct OpsContextBuilder<C = MarketplaceCatalog> {
    resolver: Option<Resolver<C>>,
    downloader: Option<ArtifactDownloader>,
    jobs: usize,
    cancel: Option<CancellationToken>,
    tx: Option<EventSender>,
}

impl<C: CatalogQuery> OpsContextBuilder<C> {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolver: None,
            downloader: None,
            jobs: vsixget_config::constants::DEFAULT_JOBS,
            cancel: None,
            tx: None,
        }
    }

    /// Set resolver
    #[must_use]
    pub fn with_resolver(mut self, resolver: Resolver<C>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Set transfer engine
    #[must_use]
    pub fn with_downloader(mut self, downloader: ArtifactDownloader) -> Self {
        self.downloader = Some(downloader);
        self
    }

    /// Set worker pool size
    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Set cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Set event sender; it is also handed to the resolver and downloader
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx<C>, Error> {
        let mut resolver = self
            .resolver
            .ok_or_else(|| Error::internal("missing component: resolver"))?;
        let mut downloader = self
            .downloader
            .ok_or_else(|| Error::internal("missing component: downloader"))?;

        if let Some(tx) = &self.tx {
            resolver = resolver.with_event_sender(tx.clone());
            downloader = downloader.with_event_sender(tx.clone());
        }

        Ok(OpsCtx {
            resolver,
            downloader,
            jobs: self.jobs.max(1),
            cancel: self.cancel.unwrap_or_default(),
            tx: self.tx,
        })
    }
}

impl<C: CatalogQuery> Default for OpsContextBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

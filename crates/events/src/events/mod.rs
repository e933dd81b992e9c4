use serde::{Deserialize, Serialize};

use crate::EventSource;
use vsixget_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod batch;
pub mod download;
pub mod general;
pub mod resolver;

pub use batch::*;
pub use download::*;
pub use general::*;
pub use resolver::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Catalog queries and variant selection
    Resolver(ResolverEvent),

    /// Artifact transfers
    Download(DownloadEvent),

    /// Batch lifecycle
    Batch(BatchEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Resolver(_) => EventSource::RESOLVER,
            Self::Download(_) => EventSource::DOWNLOAD,
            Self::Batch(_) => EventSource::BATCH,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::Error { .. })
            | Self::Resolver(ResolverEvent::Failed { .. })
            | Self::Download(DownloadEvent::Failed { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Resolver(ResolverEvent::QueryRetrying { .. })
            | Self::Download(DownloadEvent::Retrying { .. } | DownloadEvent::Restarted { .. })
            | Self::Batch(BatchEvent::Cancelled { .. }) => Level::WARN,

            Self::Resolver(
                ResolverEvent::QueryStarted { .. } | ResolverEvent::VariantSkipped { .. },
            )
            | Self::Download(DownloadEvent::Decoding { .. })
            | Self::Batch(BatchEvent::OutcomeRecorded { .. }) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "vsixget::events::general",
            Self::Resolver(_) => "vsixget::events::resolver",
            Self::Download(_) => "vsixget::events::download",
            Self::Batch(_) => "vsixget::events::batch",
        }
    }

    /// Failure details carried by per-reference failure events
    #[must_use]
    pub fn failure(&self) -> Option<(&str, &FailureContext)> {
        match self {
            Self::Resolver(ResolverEvent::Failed { reference, failure }) => {
                Some((reference.as_str(), failure))
            }
            Self::Download(DownloadEvent::Failed { label, failure }) => {
                Some((label.as_str(), failure))
            }
            _ => None,
        }
    }
}

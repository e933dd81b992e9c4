//! Catalog query error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryError {
    /// The catalog answered but has no usable record for the extension.
    #[error("extension {extension} not found in catalog: {reason}")]
    NotFound { extension: String, reason: String },

    /// The catalog could not be reached or the exchange broke mid-way.
    #[error("catalog request for {extension} failed: {message}")]
    Transport { extension: String, message: String },

    #[error("catalog request for {extension} timed out")]
    Timeout { extension: String },
}

impl UserFacingError for QueryError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Check the publisher and package spelling."),
            Self::Transport { .. } | Self::Timeout { .. } => {
                Some("Check network connectivity or raise --timeout.")
            }
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::NotFound { .. } => "query.not_found",
            Self::Transport { .. } => "query.transport",
            Self::Timeout { .. } => "query.timeout",
        })
    }
}

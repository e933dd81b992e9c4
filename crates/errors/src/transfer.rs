//! Artifact transfer error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferError {
    #[error("network error downloading {url}: {message}")]
    Network { url: String, message: String },

    #[error("download of {url} timed out")]
    Timeout { url: String },

    #[error("HTTP error {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("cannot decode {encoding} body: {message}")]
    Decode { encoding: String, message: String },

    #[error("filesystem error at {path}: {message}")]
    Filesystem { path: String, message: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl TransferError {
    /// Create a filesystem error from an I/O error and the path involved
    pub fn filesystem(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::Filesystem {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl UserFacingError for TransferError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => {
                Some("Re-run with --cached true to resume from the partial download.")
            }
            Self::HttpStatus { .. } => Some("Check that the version and platform exist."),
            Self::Decode { .. } => Some("Delete the .part file and download again."),
            Self::Filesystem { .. } => Some("Ensure the download directory is writable."),
            Self::InvalidUrl(_) => Some("Check the configured gallery_url."),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::Network { .. } => "transfer.network",
            Self::Timeout { .. } => "transfer.timeout",
            Self::HttpStatus { .. } => "transfer.http_status",
            Self::Decode { .. } => "transfer.decode",
            Self::Filesystem { .. } => "transfer.filesystem",
            Self::InvalidUrl(_) => "transfer.invalid_url",
        })
    }
}

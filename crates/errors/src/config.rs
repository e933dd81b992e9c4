//! Configuration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("parse error: {message}")]
    ParseError { message: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("cannot create download directory {path}: {message}")]
    DirectoryNotCreatable { path: String, message: String },

    #[error("HTTP client unavailable: {message}")]
    ClientUnavailable { message: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Pass an existing file to --config or drop the flag."),
            Self::InvalidValue { .. } | Self::ParseError { .. } => {
                Some("Fix the configuration value and retry the command.")
            }
            Self::DirectoryNotCreatable { .. } => {
                Some("Choose a writable --download-dir.")
            }
            Self::ClientUnavailable { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::NotFound { .. } => "config.not_found",
            Self::ParseError { .. } => "config.parse",
            Self::InvalidValue { .. } => "config.invalid_value",
            Self::DirectoryNotCreatable { .. } => "config.directory",
            Self::ClientUnavailable { .. } => "config.client",
        })
    }
}

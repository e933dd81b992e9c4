#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for vsixget
//!
//! This crate provides fine-grained error types organized by pipeline stage:
//! input parsing, catalog queries, resolution, transfer and configuration.
//! All error types implement Clone so a per-reference failure can be carried
//! into the batch report.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod parse;
pub mod query;
pub mod resolve;
pub mod transfer;

// Re-export all error types at the root
pub use config::ConfigError;
pub use parse::ParseError;
pub use query::QueryError;
pub use resolve::{ResolveError, VariantSummary};
pub use transfer::TransferError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

/// Result type alias for vsixget operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for analytics / structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Parse(err) => err.user_message(),
            Error::Query(err) => err.user_message(),
            Error::Resolve(err) => err.user_message(),
            Error::Transfer(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Parse(err) => err.user_hint(),
            Error::Query(err) => err.user_hint(),
            Error::Resolve(err) => err.user_hint(),
            Error::Transfer(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            Error::Cancelled => Some("Re-run the same command to resume interrupted downloads."),
            Error::Internal(_) => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Query(err) => err.is_retryable(),
            Error::Resolve(err) => err.is_retryable(),
            Error::Transfer(err) => err.is_retryable(),
            Error::Cancelled => true,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Parse(err) => err.user_code(),
            Error::Query(err) => err.user_code(),
            Error::Resolve(err) => err.user_code(),
            Error::Transfer(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Internal(_) => Some("error.internal"),
            Error::Cancelled => Some("error.cancelled"),
        }
    }
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for vsixget
//!
//! This crate owns every HTTP exchange: the pooled [`NetClient`] used by the
//! catalog client, and the resumable artifact transfer engine
//! ([`ArtifactDownloader`]).

mod client;
mod download;

pub use client::{NetClient, NetConfig};
pub use download::{
    calculate_backoff_delay, decode_body, download_url, ArtifactDownloader, ResponseMeta,
    RetryConfig, StagingPaths, TransferConfig,
};

use url::Url;
use vsixget_errors::TransferError;

/// Parse and validate a URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed or invalid according to RFC 3986.
pub fn parse_url(url: &str) -> Result<Url, TransferError> {
    Url::parse(url).map_err(|e| TransferError::InvalidUrl(format!("{url}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        assert!(parse_url("https://example.com").is_ok());
        assert!(parse_url("not a url").is_err());
    }
}

//! Resumable artifact transfers
//!
//! Bytes are streamed into a staging file next to the final path. Response
//! metadata is captured in a sidecar so the body can be decoded after the
//! transfer, possibly in a later run. Only a fully decoded artifact is ever
//! renamed into place.

mod config;
mod core;
mod decode;
mod resume;
mod retry;
mod staging;
mod stream;
mod validation;

pub use config::{RetryConfig, TransferConfig};
pub use core::ArtifactDownloader;
pub use decode::decode_body;
pub use retry::calculate_backoff_delay;
pub use staging::{ResponseMeta, StagingPaths};
pub use validation::download_url;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Artifact transfer lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownloadEvent {
    /// Final file already present; no network traffic
    CacheHit {
        label: String,
        path: PathBuf,
    },

    Started {
        label: String,
        url: String,
        /// Bytes already staged from an earlier attempt
        resume_from: u64,
    },

    /// The server ignored or rejected the range request and the staging file was reset
    Restarted {
        label: String,
        status: u16,
    },

    Retrying {
        label: String,
        attempt: u32,
        delay_ms: u64,
        reason: String,
    },

    Decoding {
        label: String,
        encoding: String,
    },

    Completed {
        label: String,
        path: PathBuf,
        bytes: u64,
    },

    Failed {
        label: String,
        failure: FailureContext,
    },
}

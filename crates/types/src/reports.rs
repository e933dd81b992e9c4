//! Report type definitions for batch runs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vsixget_errors::Error;

/// Result of processing one reference
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadOutcome {
    /// Resolved label when resolution succeeded, otherwise the reference label
    pub artifact_label: String,
    pub success: bool,
    pub output_path: Option<PathBuf>,
    pub error: Option<Error>,
    /// True when an existing file satisfied the request without network I/O
    #[serde(default)]
    pub from_cache: bool,
}

impl DownloadOutcome {
    #[must_use]
    pub fn succeeded(label: impl Into<String>, output_path: PathBuf, from_cache: bool) -> Self {
        Self {
            artifact_label: label.into(),
            success: true,
            output_path: Some(output_path),
            error: None,
            from_cache,
        }
    }

    #[must_use]
    pub fn failed(label: impl Into<String>, error: Error) -> Self {
        Self {
            artifact_label: label.into(),
            success: false,
            output_path: None,
            error: Some(error),
            from_cache: false,
        }
    }
}

/// Aggregate of every outcome in a batch, ordered by label
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<DownloadOutcome>,
    /// Total execution time
    pub duration_ms: u64,
}

impl BatchReport {
    /// Build a report; outcomes are sorted so presentation is deterministic
    /// regardless of completion order
    #[must_use]
    pub fn new(mut outcomes: Vec<DownloadOutcome>, duration_ms: u64) -> Self {
        outcomes.sort_by(|a, b| a.artifact_label.cmp(&b.artifact_label));
        Self {
            outcomes,
            duration_ms,
        }
    }

    #[must_use]
    pub fn failed_labels(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.success)
            .map(|o| o.artifact_label.as_str())
            .collect()
    }

    #[must_use]
    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.from_cache).count()
    }

    /// True when every reference resolved and downloaded (or was cached)
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }
}

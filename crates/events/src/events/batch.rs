use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whole-run progress for a batch of references
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    Started {
        total: usize,
        jobs: usize,
        destination: PathBuf,
    },

    OutcomeRecorded {
        label: String,
        success: bool,
        completed: usize,
        total: usize,
    },

    /// Shutdown requested; the given references were never started
    Cancelled {
        remaining: usize,
    },

    Completed {
        succeeded: usize,
        failed: usize,
        cached: usize,
        duration_ms: u64,
    },
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for vsixget
//!
//! This crate sits between the CLI and the specialised crates. It wires the
//! resolver and the transfer engine together and runs whole batches of
//! references through them on a bounded worker pool.

mod batch;
mod context;
mod resolve;
mod semaphore;
mod types;

pub use batch::download;
pub use context::{OpsContextBuilder, OpsCtx};
pub use resolve::resolve;
pub use semaphore::{acquire_semaphore_permit, create_semaphore};
pub use types::{ResolutionEntry, ResolutionReport};

use serde::Serialize;
use vsixget_errors::Error;
use vsixget_types::BatchReport;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Outcome of a download batch
    BatchReport(BatchReport),
    /// Outcome of a resolve-only run
    Resolution(ResolutionReport),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the result cannot be serialized.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Whether every reference in the run succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            OperationResult::BatchReport(report) => report.is_success(),
            OperationResult::Resolution(report) => report.is_success(),
        }
    }
}

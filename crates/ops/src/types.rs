//! Report types produced by operations

use serde::Serialize;
use vsixget_errors::Error;
use vsixget_types::ResolvedArtifact;

/// One reference as seen by `resolve`
#[derive(Clone, Debug, Serialize)]
pub struct ResolutionEntry {
    /// Label of the reference as given
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ResolvedArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Error>,
}

/// Result of a resolve-only run, in input order
#[derive(Clone, Debug, Default, Serialize)]
pub struct ResolutionReport {
    pub entries: Vec<ResolutionEntry>,
}

impl ResolutionReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.entries.iter().all(|entry| entry.error.is_none())
    }

    #[must_use]
    pub fn failed_references(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.error.is_some())
            .map(|entry| entry.reference.as_str())
            .collect()
    }
}

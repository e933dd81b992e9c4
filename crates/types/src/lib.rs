#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for vsixget
//!
//! This crate provides the data model shared by every stage of the pipeline:
//! extension references and their inline grammar, target platforms, catalog
//! variants, resolved artifacts and per-artifact download outcomes.

pub mod artifact;
pub mod catalog;
pub mod platform;
pub mod reference;
pub mod reports;

// Re-export commonly used types
pub use artifact::{ResolvedArtifact, ARTIFACT_EXTENSION};
pub use catalog::{CatalogEntry, VersionVariant};
pub use platform::{normalize_platform, PlatformTag};
pub use reference::ExtensionRef;
pub use reports::{BatchReport, DownloadOutcome};

use serde::{Deserialize, Serialize};

/// Color output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

impl Default for ColorChoice {
    fn default() -> Self {
        Self::Auto
    }
}

/// Build the canonical `publisher.package[@version][=platform]` label
///
/// Used for output file names and in every diagnostic, so the same artifact
/// is always spelled the same way.
#[must_use]
pub fn format_label(
    publisher: &str,
    package: &str,
    version: Option<&str>,
    platform: Option<PlatformTag>,
) -> String {
    let mut label = format!("{publisher}.{package}");
    if let Some(version) = version {
        label.push('@');
        label.push_str(version);
    }
    if let Some(platform) = platform {
        label.push('=');
        label.push_str(platform.as_str());
    }
    label
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Reference input loading for vsixget
//!
//! Turns the raw command-line inputs into a sorted, deduplicated list of
//! [`ExtensionRef`]s. Each input is one of:
//! - an inline reference (`publisher.package[@version][=platform]`)
//! - a JSON manifest: one object or an array of objects/strings, as written
//!   by VS Code into `extensions.json`
//! - a text listing with one reference per line, such as the output of
//!   `code --list-extensions --show-versions`

mod json;
mod listing;

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use vsixget_errors::{Error, ParseError};
use vsixget_types::ExtensionRef;

pub use json::{parse_manifest, ManifestEntry};
pub use listing::parse_listing;

/// A list entry that could not be parsed and was left out of the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// File the entry came from
    pub source: String,
    /// 1-based line number for text listings, array index for JSON manifests
    pub position: usize,
    pub error: ParseError,
}

/// Result of loading every input
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    /// Deduplicated, sorted by publisher, package, version, platform
    pub references: Vec<ExtensionRef>,
    pub skipped: Vec<SkippedEntry>,
}

impl ReferenceSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// Load and merge all inputs
///
/// # Errors
///
/// Returns a `ParseError` for a malformed inline reference, a manifest
/// object without a usable `identifier.id`, a manifest that is not valid
/// JSON, or a path-like input that cannot be read. Malformed entries inside
/// listings are not errors; they are reported in [`ReferenceSet::skipped`].
pub async fn load_references<S: AsRef<str>>(inputs: &[S]) -> Result<ReferenceSet, Error> {
    let mut references = BTreeSet::new();
    let mut skipped = Vec::new();

    for input in inputs {
        let input = input.as_ref().trim();
        if input.is_empty() {
            continue;
        }
        let loaded = load_input(input).await?;
        references.extend(loaded.references);
        skipped.extend(loaded.skipped);
    }

    Ok(ReferenceSet {
        references: references.into_iter().collect(),
        skipped,
    })
}

async fn load_input(input: &str) -> Result<ReferenceSet, Error> {
    let path = Path::new(input);
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ParseError::UnreadableInput {
                    path: input.to_string(),
                    message: e.to_string(),
                })?;
            tracing::debug!(path = %input, bytes = content.len(), "loading reference file");
            parse_content(input, &content)
        }
        Ok(_) => Err(ParseError::UnreadableInput {
            path: input.to_string(),
            message: "not a regular file".to_string(),
        }
        .into()),
        // Identifiers never contain path separators
        Err(e) if looks_like_path(input) => Err(ParseError::UnreadableInput {
            path: input.to_string(),
            message: e.to_string(),
        }
        .into()),
        Err(_) => {
            let reference: ExtensionRef = input.parse()?;
            Ok(ReferenceSet {
                references: vec![reference],
                skipped: Vec::new(),
            })
        }
    }
}

/// Parse file content, sniffing JSON by its first significant character
///
/// # Errors
///
/// See [`parse_manifest`]; text listings never fail.
pub fn parse_content(source: &str, content: &str) -> Result<ReferenceSet, Error> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        parse_manifest(source, trimmed).map_err(Into::into)
    } else {
        Ok(parse_listing(source, content))
    }
}

fn looks_like_path(input: &str) -> bool {
    input.contains('/') || input.contains('\\')
}

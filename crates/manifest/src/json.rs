//! JSON manifests
//!
//! Accepts a single object or an array. Objects follow the layout VS Code
//! keeps in `~/.vscode/extensions/extensions.json`:
//!
//! ```json
//! {"identifier": {"id": "ms-python.python"}, "version": "2024.1.0",
//!  "metadata": {"targetPlatform": "linux-x64"}}
//! ```
//!
//! Plain strings inside an array use the inline reference grammar.

use serde::Deserialize;
use serde_json::Value;
use vsixget_errors::ParseError;
use vsixget_types::{normalize_platform, ExtensionRef};

use crate::{ReferenceSet, SkippedEntry};

/// One object entry of a manifest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestEntry {
    #[serde(default)]
    pub identifier: Option<Identifier>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub metadata: Option<EntryMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Identifier {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryMetadata {
    #[serde(default, rename = "targetPlatform")]
    pub target_platform: Option<String>,
}

impl ManifestEntry {
    /// Convert into a reference; `source` names the manifest in diagnostics
    ///
    /// # Errors
    ///
    /// `InvalidManifestEntry` when `identifier.id` is missing or is not of
    /// the form `publisher.package`; `UnknownPlatform` for an unrecognised
    /// `metadata.targetPlatform`.
    pub fn into_reference(self, source: &str) -> Result<ExtensionRef, ParseError> {
        let invalid = |entry: String| ParseError::InvalidManifestEntry {
            source_name: source.to_string(),
            entry,
        };

        let id = self
            .identifier
            .and_then(|identifier| identifier.id)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| invalid("missing identifier.id".to_string()))?;

        let (publisher, package) = id
            .rsplit_once('.')
            .ok_or_else(|| invalid(format!("identifier '{id}' is not publisher.package")))?;

        let platform = normalize_platform(
            self.metadata
                .as_ref()
                .and_then(|m| m.target_platform.as_deref()),
        )?;

        ExtensionRef::new(publisher, package, self.version, platform)
            .map_err(|_| invalid(format!("identifier '{id}' is not publisher.package")))
    }
}

/// Parse a JSON manifest
///
/// # Errors
///
/// Any object-level problem aborts the whole manifest. String entries that
/// fail the inline grammar are skipped and reported instead.
pub fn parse_manifest(source: &str, content: &str) -> Result<ReferenceSet, ParseError> {
    let value: Value = serde_json::from_str(content).map_err(|e| ParseError::InvalidManifestEntry {
        source_name: source.to_string(),
        entry: format!("not valid JSON: {e}"),
    })?;

    let mut set = ReferenceSet::default();
    match value {
        Value::Array(items) => {
            for (index, item) in items.into_iter().enumerate() {
                match item {
                    Value::String(line) => match line.parse::<ExtensionRef>() {
                        Ok(reference) => set.references.push(reference),
                        Err(error) => {
                            tracing::debug!(
                                source,
                                index,
                                %error,
                                "skipping manifest string entry"
                            );
                            set.skipped.push(SkippedEntry {
                                source: source.to_string(),
                                position: index,
                                error,
                            });
                        }
                    },
                    other => set.references.push(parse_object(source, other)?),
                }
            }
        }
        other => set.references.push(parse_object(source, other)?),
    }
    Ok(set)
}

fn parse_object(source: &str, value: Value) -> Result<ExtensionRef, ParseError> {
    if !value.is_object() {
        return Err(ParseError::InvalidManifestEntry {
            source_name: source.to_string(),
            entry: value.to_string(),
        });
    }
    let rendered = value.to_string();
    let entry: ManifestEntry =
        serde_json::from_value(value).map_err(|e| ParseError::InvalidManifestEntry {
            source_name: source.to_string(),
            entry: format!("{rendered}: {e}"),
        })?;
    entry.into_reference(source)
}

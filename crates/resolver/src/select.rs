//! Variant selection

use vsixget_errors::ResolveError;
use vsixget_types::{CatalogEntry, ExtensionRef, ResolvedArtifact};

/// Pick the first catalog variant compatible with `reference`
///
/// Catalog order is the recency order: without a pinned version the first
/// survivor is the newest build for the requested platform. A variant
/// without a platform is universal and matches any requested platform, and
/// a reference without a platform accepts any variant.
///
/// # Errors
///
/// Returns `ResolveError::NoMatchingVariant` listing every catalog variant
/// when nothing survives.
pub fn select_variant(
    reference: &ExtensionRef,
    entry: &CatalogEntry,
) -> Result<ResolvedArtifact, ResolveError> {
    let found = entry.versions.iter().find(|variant| {
        if reference
            .version
            .as_ref()
            .is_some_and(|wanted| *wanted != variant.version)
        {
            return false;
        }
        match (reference.platform, variant.platform) {
            (Some(wanted), Some(offered)) => wanted == offered,
            _ => true,
        }
    });

    match found {
        Some(variant) => Ok(ResolvedArtifact {
            publisher: reference.publisher.clone(),
            package: reference.package.clone(),
            version: variant.version.clone(),
            platform: variant.platform,
        }),
        None => Err(ResolveError::NoMatchingVariant {
            extension: reference.extension_id(),
            requested_version: reference.version.clone(),
            requested_platform: reference.platform.map(|p| p.as_str().to_string()),
            available: entry.summaries(),
        }),
    }
}

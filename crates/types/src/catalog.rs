//! Catalog records for one extension

use crate::platform::PlatformTag;
use serde::{Deserialize, Serialize};
use vsixget_errors::VariantSummary;

/// One published build of an extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionVariant {
    pub version: String,
    /// `None` for platform-agnostic builds
    pub platform: Option<PlatformTag>,
}

impl VersionVariant {
    #[must_use]
    pub fn new(version: impl Into<String>, platform: Option<PlatformTag>) -> Self {
        Self {
            version: version.into(),
            platform,
        }
    }

    #[must_use]
    pub fn summary(&self) -> VariantSummary {
        VariantSummary {
            version: self.version.clone(),
            platform: self.platform.map(|p| p.as_str().to_string()),
        }
    }
}

/// Everything the catalog knows about one `publisher.package`
///
/// `versions` is in catalog order, most recent first. That order is the
/// only source of truth for "latest"; version strings are never compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub publisher: String,
    pub package: String,
    pub versions: Vec<VersionVariant>,
}

impl CatalogEntry {
    #[must_use]
    pub fn summaries(&self) -> Vec<VariantSummary> {
        self.versions.iter().map(VersionVariant::summary).collect()
    }
}

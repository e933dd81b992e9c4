//! Fully resolved artifacts

use crate::platform::PlatformTag;
use serde::{Deserialize, Serialize};

/// File extension of stored artifacts
pub const ARTIFACT_EXTENSION: &str = "vsix";

/// A reference with every ambiguity removed, ready to download
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    pub publisher: String,
    pub package: String,
    pub version: String,
    pub platform: Option<PlatformTag>,
}

impl ResolvedArtifact {
    /// Canonical `publisher.package@version[=platform]` label
    #[must_use]
    pub fn label(&self) -> String {
        crate::format_label(
            &self.publisher,
            &self.package,
            Some(&self.version),
            self.platform,
        )
    }

    /// Output file name: the label plus `.vsix`, no nesting
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{ARTIFACT_EXTENSION}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_uses_label() {
        let artifact = ResolvedArtifact {
            publisher: "acme".into(),
            package: "widget".into(),
            version: "2.0.0".into(),
            platform: Some(PlatformTag::LinuxX64),
        };
        assert_eq!(artifact.label(), "acme.widget@2.0.0=linux-x64");
        assert_eq!(artifact.file_name(), "acme.widget@2.0.0=linux-x64.vsix");

        let agnostic = ResolvedArtifact {
            platform: None,
            ..artifact
        };
        assert_eq!(agnostic.file_name(), "acme.widget@2.0.0.vsix");
    }
}

//! Extension references and the inline reference grammar
//!
//! An inline reference has the form `<publisher>.<package>[@<version>][=<platform>]`
//! and is parsed right to left: a trailing `=` introduces the platform, a
//! trailing `@` in what remains introduces the version, and the last `.`
//! separates publisher from package.

use crate::platform::{normalize_platform, PlatformTag};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vsixget_errors::ParseError;

/// A possibly under-specified reference to one extension
///
/// Field order matters: the derived ordering sorts by publisher, package,
/// version and platform, with "unspecified" before any concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExtensionRef {
    pub publisher: String,
    pub package: String,
    pub version: Option<String>,
    pub platform: Option<PlatformTag>,
}

impl ExtensionRef {
    /// Build a reference, enforcing non-empty identity and normalizing the version
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidReference` if publisher or package is empty.
    pub fn new(
        publisher: impl Into<String>,
        package: impl Into<String>,
        version: Option<String>,
        platform: Option<PlatformTag>,
    ) -> Result<Self, ParseError> {
        let publisher = publisher.into().trim().to_string();
        let package = package.into().trim().to_string();
        if publisher.is_empty() || package.is_empty() {
            return Err(ParseError::InvalidReference {
                input: format!("{publisher}.{package}"),
                reason: "publisher and package must both be non-empty".to_string(),
            });
        }
        Ok(Self {
            publisher,
            package,
            version: normalize_version(version.as_deref()),
            platform,
        })
    }

    /// `publisher.package`, the identity the catalog is queried with
    #[must_use]
    pub fn extension_id(&self) -> String {
        format!("{}.{}", self.publisher, self.package)
    }

    /// Canonical label of this (possibly unresolved) reference
    #[must_use]
    pub fn label(&self) -> String {
        crate::format_label(
            &self.publisher,
            &self.package,
            self.version.as_deref(),
            self.platform,
        )
    }
}

impl fmt::Display for ExtensionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for ExtensionRef {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = |reason: &str| ParseError::InvalidReference {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (rest, platform) = match input.rfind('=') {
            Some(pos) => (&input[..pos], Some(&input[pos + 1..])),
            None => (input, None),
        };
        let (identity, version) = match rest.rfind('@') {
            Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
            None => (rest, None),
        };
        let Some(dot) = identity.rfind('.') else {
            return Err(invalid("expected <publisher>.<package>"));
        };

        let platform = normalize_platform(platform)?;
        Self::new(
            &identity[..dot],
            &identity[dot + 1..],
            version.map(str::to_string),
            platform,
        )
        .map_err(|_| invalid("publisher and package must both be non-empty"))
    }
}

/// Empty or whitespace-only versions mean "unspecified"
fn normalize_version(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

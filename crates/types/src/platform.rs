//! Target platform identifiers

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use vsixget_errors::ParseError;

/// Operating-system/architecture combination an extension build targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PlatformTag {
    Win32X64,
    Win32Ia32,
    Win32Arm64,
    LinuxX64,
    LinuxArm64,
    LinuxArmhf,
    AlpineX64,
    AlpineArm64,
    DarwinX64,
    DarwinArm64,
    Web,
    Universal,
}

impl PlatformTag {
    /// Every platform the catalog is known to publish
    pub const ALL: [PlatformTag; 12] = [
        Self::Win32X64,
        Self::Win32Ia32,
        Self::Win32Arm64,
        Self::LinuxX64,
        Self::LinuxArm64,
        Self::LinuxArmhf,
        Self::AlpineX64,
        Self::AlpineArm64,
        Self::DarwinX64,
        Self::DarwinArm64,
        Self::Web,
        Self::Universal,
    ];

    /// Wire spelling used by the catalog and in labels
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Win32X64 => "win32-x64",
            Self::Win32Ia32 => "win32-ia32",
            Self::Win32Arm64 => "win32-arm64",
            Self::LinuxX64 => "linux-x64",
            Self::LinuxArm64 => "linux-arm64",
            Self::LinuxArmhf => "linux-armhf",
            Self::AlpineX64 => "alpine-x64",
            Self::AlpineArm64 => "alpine-arm64",
            Self::DarwinX64 => "darwin-x64",
            Self::DarwinArm64 => "darwin-arm64",
            Self::Web => "web",
            Self::Universal => "universal",
        }
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformTag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == lowered)
            .ok_or_else(|| ParseError::UnknownPlatform {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for PlatformTag {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlatformTag> for String {
    fn from(tag: PlatformTag) -> Self {
        tag.as_str().to_string()
    }
}

// Sorting follows the wire spelling so report and dedup order is lexicographic.
impl Ord for PlatformTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for PlatformTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Normalize a raw platform value from any input source
///
/// Case is folded; empty strings and the literals `undefined` and `none`
/// mean "unspecified". Anything else must name a known platform.
///
/// # Errors
///
/// Returns `ParseError::UnknownPlatform` for values outside the known set.
pub fn normalize_platform(raw: Option<&str>) -> Result<Option<PlatformTag>, ParseError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let folded = raw.trim().to_ascii_lowercase();
    match folded.as_str() {
        "" | "undefined" | "none" => Ok(None),
        _ => folded
            .parse()
            .map(Some)
            .map_err(|_| ParseError::UnknownPlatform {
                value: raw.trim().to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_tags() {
        for tag in PlatformTag::ALL {
            assert_eq!(tag.as_str().parse::<PlatformTag>().unwrap(), tag);
        }
    }

    #[test]
    fn test_normalize_placeholders() {
        assert_eq!(normalize_platform(None).unwrap(), None);
        assert_eq!(normalize_platform(Some("")).unwrap(), None);
        assert_eq!(normalize_platform(Some("undefined")).unwrap(), None);
        assert_eq!(normalize_platform(Some("NONE")).unwrap(), None);
        assert_eq!(
            normalize_platform(Some(" Linux-X64 ")).unwrap(),
            Some(PlatformTag::LinuxX64)
        );
    }

    #[test]
    fn test_unknown_platform_rejected() {
        let err = normalize_platform(Some("beos-ppc")).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownPlatform {
                value: "beos-ppc".into()
            }
        );
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(PlatformTag::AlpineX64 < PlatformTag::Win32X64);
        assert!(PlatformTag::Web > PlatformTag::Universal);
    }
}

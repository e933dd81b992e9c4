//! Input parsing error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseError {
    #[error("invalid extension reference '{input}': {reason}")]
    InvalidReference { input: String, reason: String },

    #[error("invalid manifest entry in {source_name}: {entry}")]
    InvalidManifestEntry { source_name: String, entry: String },

    #[error("unknown target platform '{value}'")]
    UnknownPlatform { value: String },

    #[error("cannot read input {path}: {message}")]
    UnreadableInput { path: String, message: String },
}

impl UserFacingError for ParseError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidReference { .. } => {
                Some("Use the form <publisher>.<package>[@<version>][=<platform>].")
            }
            Self::InvalidManifestEntry { .. } => {
                Some("Every manifest object needs an identifier.id of the form publisher.package.")
            }
            Self::UnknownPlatform { .. } => Some(
                "Valid platforms: win32-x64, win32-ia32, win32-arm64, linux-x64, linux-arm64, \
                 linux-armhf, alpine-x64, alpine-arm64, darwin-x64, darwin-arm64, web, universal.",
            ),
            Self::UnreadableInput { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::InvalidReference { .. } => "parse.invalid_reference",
            Self::InvalidManifestEntry { .. } => "parse.invalid_manifest_entry",
            Self::UnknownPlatform { .. } => "parse.unknown_platform",
            Self::UnreadableInput { .. } => "parse.unreadable_input",
        })
    }
}

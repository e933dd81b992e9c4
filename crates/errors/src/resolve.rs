//! Version/platform resolution error types

use std::borrow::Cow;
use std::fmt;

use crate::{QueryError, UserFacingError};
use thiserror::Error;

/// One catalog variant as shown in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariantSummary {
    pub version: String,
    pub platform: Option<String>,
}

impl fmt::Display for VariantSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.platform {
            Some(platform) => write!(f, "{}={platform}", self.version),
            None => write!(f, "{}", self.version),
        }
    }
}

fn join_variants(variants: &[VariantSummary]) -> String {
    if variants.is_empty() {
        return "none".to_string();
    }
    variants
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_any(value: Option<&String>) -> &str {
    value.map_or("any", String::as_str)
}

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolveError {
    #[error(
        "no variant of {extension} matches version {} and platform {}; available: {}",
        or_any(.requested_version.as_ref()),
        or_any(.requested_platform.as_ref()),
        join_variants(.available)
    )]
    NoMatchingVariant {
        extension: String,
        requested_version: Option<String>,
        requested_platform: Option<String>,
        available: Vec<VariantSummary>,
    },

    #[error("catalog unavailable for {extension}: {source}")]
    CatalogUnavailable {
        extension: String,
        #[source]
        source: QueryError,
    },
}

impl UserFacingError for ResolveError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoMatchingVariant { .. } => {
                Some("Pick one of the available versions/platforms listed above.")
            }
            Self::CatalogUnavailable { source, .. } => source.user_hint(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::NoMatchingVariant { .. } => false,
            Self::CatalogUnavailable { source, .. } => source.is_retryable(),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::NoMatchingVariant { .. } => "resolve.no_matching_variant",
            Self::CatalogUnavailable { .. } => "resolve.catalog_unavailable",
        })
    }
}

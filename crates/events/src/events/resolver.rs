use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Catalog lookups and variant selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolverEvent {
    QueryStarted {
        reference: String,
    },

    /// A transient catalog failure is being retried after a delay
    QueryRetrying {
        reference: String,
        attempt: u32,
        delay_ms: u64,
        reason: String,
    },

    /// Catalog returned a variant that was dropped because its platform is unknown
    VariantSkipped {
        reference: String,
        version: String,
        platform: String,
    },

    Resolved {
        reference: String,
        artifact: String,
    },

    Failed {
        reference: String,
        failure: FailureContext,
    },
}

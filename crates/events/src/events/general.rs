use serde::{Deserialize, Serialize};

/// General utility events for warnings, errors, and operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    Warning {
        message: String,
    },

    Error {
        message: String,
    },

    OperationStarted {
        operation: String,
    },

    OperationCompleted {
        operation: String,
        success: bool,
    },
}

impl GeneralEvent {
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

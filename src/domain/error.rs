//! Domain error types.

/// Top-level error type for tradejournal.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("storage error for '{key}': {reason}")]
    Persistence { key: String, reason: String },

    #[error("corrupt ledger in '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("export failed: {reason}")]
    Export { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl JournalError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        JournalError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn persistence(key: &str, reason: impl Into<String>) -> Self {
        JournalError::Persistence {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&JournalError> for std::process::ExitCode {
    fn from(err: &JournalError) -> Self {
        let code: u8 = match err {
            JournalError::Io(_) => 1,
            JournalError::ConfigParse { .. } | JournalError::ConfigInvalid { .. } => 2,
            JournalError::Validation { .. } => 3,
            JournalError::Persistence { .. } | JournalError::Corrupt { .. } => 4,
            JournalError::Export { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

use thiserror::Error;

/// Errors raised at the crate boundary
///
/// Per-edit problems during alignment or highlighting are never errors; they
/// are reported as skip and unplaced reasons in the diagnostics instead.
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid edit at index {index}: {message}")]
    InvalidEdit { index: usize, message: String },
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl AlignError {
    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn invalid_edit(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidEdit {
            index,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

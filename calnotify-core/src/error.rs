//! Error types for calnotify.

use thiserror::Error;

/// Errors that can occur in calnotify operations.
#[derive(Error, Debug)]
pub enum CalNotifyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Event has no id")]
    MissingEventId,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CalNotifyError {
    /// Wrap any displayable transport error as a calendar error.
    ///
    /// Uses the alternate formatter so `anyhow` context chains survive.
    pub fn calendar(err: impl std::fmt::Display) -> Self {
        CalNotifyError::Calendar(format!("{:#}", err))
    }
}

/// Result type alias for calnotify operations.
pub type CalNotifyResult<T> = Result<T, CalNotifyError>;

//! Error types for expocal.

use thiserror::Error;

/// Errors that can occur in expocal operations.
#[derive(Error, Debug)]
pub enum ExpoError {
    #[error("No API key stored. Run `expocal auth` to connect one.")]
    CredentialMissing,

    #[error("API key looks invalid: {0}")]
    CredentialInvalid(String),

    #[error("Failed to fetch events: {0}")]
    FetchFailed(String),

    #[error("Cached events are unreadable: {0}")]
    CacheCorrupt(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("End date {end} is before start date {start}")]
    InvalidSpan { start: String, end: String },

    #[error("Invalid month '{0}'. Expected YYYY-MM")]
    InvalidMonth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ExpoError {
    /// Whether the caller can keep going with previous (or no) data.
    ///
    /// Fetch and cache failures are surfaced as a message; everything else
    /// should abort the current command.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ExpoError::FetchFailed(_) | ExpoError::CacheCorrupt(_))
    }
}

/// Result type alias for expocal operations.
pub type ExpoResult<T> = Result<T, ExpoError>;

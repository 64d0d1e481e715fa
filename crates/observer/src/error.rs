//! Error types for the observer core.

use thiserror::Error;

/// Errors from observer operations.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// observe() was called with no usable criteria
    #[error("observe() requires either a non-empty entry_types list or a single type argument")]
    MissingEntryTypes,

    /// Dynamic observe() options that could not be parsed
    #[error("invalid observe() options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

/// Result type for observer operations.
pub type ObserverResult<T> = Result<T, ObserverError>;

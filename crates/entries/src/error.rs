//! Error types for entry recording.

use thiserror::Error;

/// Errors from timeline recording operations.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// A measure referenced a mark that was never recorded
    #[error("no mark named '{0}' has been recorded")]
    MarkNotFound(String),
}

/// Result type for timeline operations.
pub type TimelineResult<T> = Result<T, TimelineError>;

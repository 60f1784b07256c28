//! Error types for the data layer.
//!
//! External API failures are never swallowed: orchestrators surface them as
//! [`DataError::FetchFailed`] once the retry policy is exhausted, and the UI
//! renders the error state. Malformed records are a filtering rule, not an
//! error (see the normalizer's dropped-record counter).

use thiserror::Error;

/// Errors surfaced by orchestrators and context construction.
#[derive(Debug, Error)]
pub enum DataError {
    /// External query/balance API call failed after exhausting retries
    #[error("fetch failed: {cause}")]
    FetchFailed { cause: String },

    /// Configuration rejected by validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, DataError>;

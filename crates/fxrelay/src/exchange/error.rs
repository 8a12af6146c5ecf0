//! Rate client error types.

use thiserror::Error;

/// Result type for rate source operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Errors that can occur while fetching rates for one date.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// HTTP request failed (transport error, timeout, or undecodable body).
    #[error("rate request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("rate source returned {status} for {date}")]
    UnexpectedStatus {
        date: String,
        status: reqwest::StatusCode,
    },
}

//! Error types for the fetch module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for remote fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connection refused, TLS, ...)
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote server answered with a non-success status
    #[error("Problem with retrieving data from {url}: HTTP status code is {status}")]
    Status {
        /// URL that was requested
        url: String,
        /// Status code returned by the server
        status: u16,
    },

    /// The HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl From<FetchError> for CrateError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Client(_) => CrateError::Storage(err.to_string()),
            _ => CrateError::BadRequest(err.to_string()),
        }
    }
}

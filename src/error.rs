//! Error types for the pageharvest crate

use thiserror::Error;

/// Result type for pageharvest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pageharvest operations
///
/// Module errors (`FetchError`, `ExtractError`, `DbError`, `MediaError`,
/// `PipelineError`) convert into one of these variants, which in turn decide
/// the HTTP status the API answers with.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input or an unreachable source URL
    #[error("{0}")]
    BadRequest(String),

    /// Unknown task identifier
    #[error("Task ID={0} not found!")]
    NotFound(i64),

    /// The fetched page could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Database or media store failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Whether the error was caused by the caller rather than by the server
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::BadRequest(_) | Error::NotFound(_))
    }
}

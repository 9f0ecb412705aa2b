//! Error types for the pipeline module

use crate::error::Error as CrateError;
use crate::extract::ExtractError;
use crate::fetch::FetchError;
use crate::store::{DbError, MediaError};
use thiserror::Error;

/// Error type for pipeline operations
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The submitted URL could not be parsed
    #[error("Invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Fetching the page failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The page could not be parsed
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Database error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Media store error
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Unknown task identifier
    #[error("Task ID={0} not found!")]
    TaskNotFound(i64),
}

impl From<PipelineError> for CrateError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidUrl { .. } => CrateError::BadRequest(err.to_string()),
            PipelineError::Fetch(e) => e.into(),
            PipelineError::Extract(e) => e.into(),
            PipelineError::Database(e) => e.into(),
            PipelineError::Media(e) => e.into(),
            PipelineError::TaskNotFound(id) => CrateError::NotFound(id),
        }
    }
}

//! # Store Error Types
//!
//! Error types for the two persistence layers of the crate:
//!
//! - `DbError`: failures of the libsql task/image database
//! - `MediaError`: failures of the filesystem store holding image payloads
//!
//! Both convert into the crate's `Error::Storage` so the API reports them as
//! server-side failures.

use crate::error::Error as CrateError;
use std::io;
use thiserror::Error;

/// Error type for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// LibSQL error
    #[error("LibSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// SQL query error
    #[error("SQL query error: {0}")]
    Query(String),

    /// Schema error
    #[error("Schema error: {0}")]
    Schema(String),

    /// Data error
    #[error("Data error: {0}")]
    Data(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<DbError> for CrateError {
    fn from(err: DbError) -> Self {
        CrateError::Storage(err.to_string())
    }
}

/// Error type for media store operations
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid media path: {0}")]
    InvalidPath(String),
}

impl From<MediaError> for CrateError {
    fn from(err: MediaError) -> Self {
        CrateError::Storage(err.to_string())
    }
}

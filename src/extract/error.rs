//! Error types for the extract module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for HTML extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The document has no `<body>` element (e.g. a frameset page)
    #[error("Document has no body element")]
    MissingBody,

    /// HTML parsing error
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),
}

impl From<ExtractError> for CrateError {
    fn from(err: ExtractError) -> Self {
        CrateError::Parse(err.to_string())
    }
}

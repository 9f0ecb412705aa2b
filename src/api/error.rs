//! HTTP rendering of crate errors
//!
//! Client errors expose their message directly. Storage failures are logged
//! with full detail and answered with a generic message so SQL and file
//! paths never reach the caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use crate::error::Error;

impl Error {
    /// HTTP status the API answers with for this error
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Error::BadRequest(_) | Error::NotFound(_) => self.to_string(),
            Error::Parse(m) => {
                warn!(error = %m, "Failed to parse page");
                self.to_string()
            }
            Error::Storage(m) => {
                error!(error = %m, "Storage failure");
                "Error during saving or loading task data!".to_string()
            }
        };

        (status, Json(json!({ "error_msg": message }))).into_response()
    }
}

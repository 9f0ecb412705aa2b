//! Request bodies accepted by the API

use serde::Deserialize;

/// Body of `POST /task/`
///
/// `url` is optional here so a missing field is reported with the API's own
/// error body rather than a deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub url: Option<String>,
}

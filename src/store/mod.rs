//! Persistence module
//!
//! Task and image records live in a libsql database; image payloads live on
//! the filesystem under the media root.

mod database;
pub mod error;
mod media;
mod schema;

pub use database::Database;
pub use error::{DbError, MediaError};
pub use media::{MediaConfig, MediaStore, image_file_name};

use serde::Serialize;

/// One URL-processing unit with its extracted text and image state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    /// ID of the task
    pub id: i64,

    /// URL of the page (unique)
    pub url: String,

    /// Extracted plain text, unset until extraction completes
    pub text_content: Option<String>,

    /// Whether images are still being downloaded
    pub images_in_progress: bool,

    /// Creation time (unix seconds)
    pub created_at: i64,

    /// Last update time (unix seconds)
    pub updated_at: i64,
}

impl Task {
    /// Whether the text content has been extracted
    pub fn text_ready(&self) -> bool {
        self.text_content.is_some()
    }

    /// Whether the image downloads have finished
    pub fn images_ready(&self) -> bool {
        !self.images_in_progress
    }
}

/// An image downloaded for a task
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// ID of the image
    pub id: i64,

    /// ID of the owning task
    pub task_id: i64,

    /// Path of the payload relative to the media root
    pub path: String,
}

/// Fields to set when upserting a task; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub text_content: Option<String>,
    pub images_in_progress: Option<bool>,
}

impl TaskUpdate {
    /// Update only the text content
    pub fn text(text: String) -> Self {
        Self {
            text_content: Some(text),
            images_in_progress: None,
        }
    }

    /// Update only the image-download flag
    pub fn images_in_progress(in_progress: bool) -> Self {
        Self {
            text_content: None,
            images_in_progress: Some(in_progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_readiness() {
        let mut task = Task {
            id: 1,
            url: "https://example.com/".to_string(),
            text_content: None,
            images_in_progress: true,
            created_at: 1625097600,
            updated_at: 1625097600,
        };

        assert!(!task.text_ready());
        assert!(!task.images_ready());

        task.text_content = Some(String::new());
        task.images_in_progress = false;

        assert!(task.text_ready());
        assert!(task.images_ready());
    }
}

//! Read-side accessors for processed tasks

use serde::Serialize;
use tracing::instrument;

use super::{Pipeline, PipelineError};
use crate::store::Task;

/// Readiness of both halves of a task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStatus {
    pub task_id: i64,
    pub url: String,
    pub text_ready: bool,
    pub images_ready: bool,
}

/// Extracted text of a task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskText {
    pub task_id: i64,
    pub url: String,
    pub text: Option<String>,
}

impl TaskText {
    pub fn is_ready(&self) -> bool {
        self.text.is_some()
    }
}

/// Public URLs of a task's stored images
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskImages {
    pub task_id: i64,
    pub url: String,
    pub images_urls: Vec<String>,
    #[serde(skip)]
    pub images_ready: bool,
}

impl TaskImages {
    pub fn is_ready(&self) -> bool {
        self.images_ready
    }
}

impl Pipeline {
    async fn require_task(&self, task_id: i64) -> Result<Task, PipelineError> {
        self.db
            .get_task(task_id)
            .await?
            .ok_or(PipelineError::TaskNotFound(task_id))
    }

    /// Readiness flags of a task
    #[instrument(skip(self), level = "debug")]
    pub async fn status(&self, task_id: i64) -> Result<TaskStatus, PipelineError> {
        let task = self.require_task(task_id).await?;

        Ok(TaskStatus {
            task_id: task.id,
            text_ready: task.text_ready(),
            images_ready: task.images_ready(),
            url: task.url,
        })
    }

    /// Extracted text of a task, `None` until extraction has completed
    #[instrument(skip(self), level = "debug")]
    pub async fn text(&self, task_id: i64) -> Result<TaskText, PipelineError> {
        let task = self.require_task(task_id).await?;

        Ok(TaskText {
            task_id: task.id,
            url: task.url,
            text: task.text_content,
        })
    }

    /// Public URLs of the images stored so far for a task
    #[instrument(skip(self), level = "debug")]
    pub async fn images(&self, task_id: i64) -> Result<TaskImages, PipelineError> {
        let task = self.require_task(task_id).await?;
        let images_urls = self
            .db
            .images_for_task(task.id)
            .await?
            .iter()
            .map(|image| self.media.url_for(&image.path))
            .collect();

        Ok(TaskImages {
            task_id: task.id,
            images_ready: task.images_ready(),
            url: task.url,
            images_urls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineConfig;
    use crate::store::{Database, MediaConfig, MediaStore, TaskUpdate};
    use tempfile::{TempDir, tempdir};

    async fn setup() -> (Pipeline, TempDir) {
        let temp_dir = tempdir().unwrap();
        let db = Database::new_from_path(temp_dir.path().join("test.db"))
            .await
            .unwrap();
        let media = MediaStore::new(MediaConfig {
            root: temp_dir.path().join("media"),
            url_prefix: "/images/".to_string(),
        });
        let pipeline = Pipeline::new(db, media, PipelineConfig::default()).unwrap();

        (pipeline, temp_dir)
    }

    #[tokio::test]
    async fn test_unknown_task() {
        let (pipeline, _temp_dir) = setup().await;

        assert!(matches!(
            pipeline.status(42).await,
            Err(PipelineError::TaskNotFound(42))
        ));
        assert!(matches!(
            pipeline.text(42).await,
            Err(PipelineError::TaskNotFound(42))
        ));
        assert!(matches!(
            pipeline.images(42).await,
            Err(PipelineError::TaskNotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_in_progress_task() {
        let (pipeline, _temp_dir) = setup().await;
        let (task, _) = pipeline
            .database()
            .upsert_task("https://example.com/", TaskUpdate::images_in_progress(true))
            .await
            .unwrap();

        let status = pipeline.status(task.id).await.unwrap();
        assert!(!status.text_ready);
        assert!(!status.images_ready);

        let text = pipeline.text(task.id).await.unwrap();
        assert!(!text.is_ready());
        assert_eq!(text.text, None);

        let images = pipeline.images(task.id).await.unwrap();
        assert!(!images.is_ready());
        assert!(images.images_urls.is_empty());
    }

    #[tokio::test]
    async fn test_completed_task() {
        let (pipeline, _temp_dir) = setup().await;
        let db = pipeline.database();
        let (task, _) = db
            .upsert_task("https://example.com/", TaskUpdate::text(String::new()))
            .await
            .unwrap();
        db.add_image(task.id, &format!("{}/logo.png", task.id))
            .await
            .unwrap();

        let status = pipeline.status(task.id).await.unwrap();
        assert!(status.text_ready);
        assert!(status.images_ready);

        // empty text still counts as extracted
        let text = pipeline.text(task.id).await.unwrap();
        assert!(text.is_ready());
        assert_eq!(text.text.as_deref(), Some(""));

        let images = pipeline.images(task.id).await.unwrap();
        assert!(images.is_ready());
        assert_eq!(images.images_urls, vec![format!("/images/{}/logo.png", task.id)]);
    }

    #[test]
    fn test_images_serialization_skips_flag() {
        let images = TaskImages {
            task_id: 1,
            url: "https://example.com/".to_string(),
            images_urls: vec!["/images/1/logo.png".to_string()],
            images_ready: true,
        };

        let json = serde_json::to_value(&images).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "task_id": 1,
                "url": "https://example.com/",
                "images_urls": ["/images/1/logo.png"]
            })
        );
    }
}

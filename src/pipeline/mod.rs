//! # Pipeline Module
//!
//! Turns a submitted URL into a stored task: the page is fetched, its body
//! text extracted with active content stripped, and every image it references
//! downloaded into the media store.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pageharvest::pipeline::{Pipeline, PipelineConfig};
//! use pageharvest::store::{Database, MediaStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new_from_path("pageharvest.db").await?;
//!     let pipeline = Pipeline::new(db, MediaStore::default(), PipelineConfig::default())?;
//!
//!     let processed = pipeline.process("https://example.com/").await?;
//!     let text = pipeline.text(processed.task_id).await?;
//!     println!("{}", text.text.unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod locks;
mod queries;

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::PipelineError;
pub use locks::UrlLocks;
pub use queries::{TaskImages, TaskStatus, TaskText};

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::extract::extract_page;
use crate::fetch::Fetcher;
use crate::store::{Database, MediaStore, TaskUpdate, image_file_name};

/// Outcome of a successful pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedTask {
    pub task_id: i64,
    pub url: String,
}

/// Page-processing pipeline
pub struct Pipeline {
    db: Database,
    media: MediaStore,
    fetcher: Fetcher,
    config: PipelineConfig,
    locks: UrlLocks,
}

impl Pipeline {
    /// Create a new pipeline
    pub fn new(
        db: Database,
        media: MediaStore,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        let fetcher = Fetcher::new(&config.user_agent)?;

        Ok(Self {
            db,
            media,
            fetcher,
            config,
            locks: UrlLocks::default(),
        })
    }

    /// Database backing the pipeline
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Media store holding downloaded images
    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    /// Process a URL end to end and return the task it was stored under
    ///
    /// Runs for the same URL are serialized. A page that cannot be fetched
    /// fails before any record is written; an image that cannot be fetched
    /// is skipped.
    #[instrument(skip(self))]
    pub async fn process(&self, url: &str) -> Result<ProcessedTask, PipelineError> {
        let page_url = Url::parse(url).map_err(|source| PipelineError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let _guard = self.locks.lock(url).await;

        info!("Fetching page");
        let page = self.fetcher.fetch(&page_url).await?;

        let (task, created) = self
            .db
            .upsert_task(url, TaskUpdate::images_in_progress(true))
            .await?;
        debug!(task_id = task.id, created, "Task record ready");

        let extracted = extract_page(&page.body, &page.url, &self.config.strip_selectors)?;

        let (task, _) = self
            .db
            .upsert_task(url, TaskUpdate::text(extracted.text))
            .await?;

        if !created {
            self.clear_images(task.id).await?;
        }

        let stored = self.store_images(task.id, &extracted.image_urls).await?;

        self.db.set_images_in_progress(task.id, false).await?;
        info!(
            task_id = task.id,
            images = stored,
            discovered = extracted.image_urls.len(),
            "Task processed"
        );

        Ok(ProcessedTask {
            task_id: task.id,
            url: task.url,
        })
    }

    /// Remove every stored image of a task, payload first
    async fn clear_images(&self, task_id: i64) -> Result<(), PipelineError> {
        let images = self.db.images_for_task(task_id).await?;
        debug!(task_id, count = images.len(), "Removing previous images");

        for image in images {
            self.media.remove(&image.path).await?;
            self.db.delete_image(image.id).await?;
        }

        Ok(())
    }

    /// Download and record images, returning how many were stored
    async fn store_images(
        &self,
        task_id: i64,
        image_urls: &BTreeSet<Url>,
    ) -> Result<usize, PipelineError> {
        let mut stored = 0;

        for image_url in image_urls {
            let resource = match self.fetcher.fetch(image_url).await {
                Ok(resource) => resource,
                Err(e) => {
                    warn!(image_url = %image_url, error = %e, "Skipping image");
                    continue;
                }
            };

            let file_name = image_file_name(image_url);
            let path = self.media.save(task_id, &file_name, &resource.body).await?;
            self.db.add_image(task_id, &path).await?;
            stored += 1;
        }

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MediaConfig;
    use mockito::Server;
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
    async fn test_process_stores_text_and_images() {
        let mut server = Server::new_async().await;
        let page = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(
                r#"<html><body><p>Hello <b>world</b></p><script>evil()</script><img src="/logo.png"></body></html>"#,
            )
            .create_async()
            .await;
        let logo = server
            .mock("GET", "/logo.png")
            .with_status(200)
            .with_body(b"png-bytes")
            .create_async()
            .await;

        let (pipeline, temp_dir) = setup().await;
        let url = format!("{}/page", server.url());
        let processed = pipeline.process(&url).await.unwrap();

        page.assert_async().await;
        logo.assert_async().await;
        assert_eq!(processed.url, url);

        let task = pipeline
            .database()
            .get_task(processed.task_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(task.text_content.as_deref(), Some("Hello world"));
        assert!(!task.images_in_progress);

        let images = pipeline
            .database()
            .images_for_task(processed.task_id)
            .await
            .unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].path, format!("{}/logo.png", processed.task_id));

        let payload =
            std::fs::read(temp_dir.path().join("media").join(&images[0].path)).unwrap();
        assert_eq!(payload, b"png-bytes");
    }

    #[tokio::test]
    async fn test_reprocessing_reuses_task_and_replaces_images() {
        let mut server = Server::new_async().await;
        let _first_page = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body(r#"<html><body>first<img src="/old.png"></body></html>"#)
            .expect(1)
            .create_async()
            .await;
        let _old = server
            .mock("GET", "/old.png")
            .with_status(200)
            .with_body("old")
            .create_async()
            .await;

        let (pipeline, temp_dir) = setup().await;
        let url = format!("{}/page", server.url());
        let first = pipeline.process(&url).await.unwrap();

        server.reset();
        let _second_page = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body(r#"<html><body>second<img src="/new.png"></body></html>"#)
            .create_async()
            .await;
        let _new = server
            .mock("GET", "/new.png")
            .with_status(200)
            .with_body("new")
            .create_async()
            .await;

        let second = pipeline.process(&url).await.unwrap();
        assert_eq!(first.task_id, second.task_id);

        let task = pipeline
            .database()
            .get_task(second.task_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(task.text_content.as_deref(), Some("second"));

        let images = pipeline
            .database()
            .images_for_task(second.task_id)
            .await
            .unwrap();
        assert_eq!(images.len(), 1);
        assert!(images[0].path.ends_with("new.png"));

        let media_dir = temp_dir.path().join("media").join(second.task_id.to_string());
        assert!(!media_dir.join("old.png").exists());
        assert!(media_dir.join("new.png").exists());
    }

    #[tokio::test]
    async fn test_failed_image_is_skipped() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body(
                r#"<html><body><img src="/missing.png"><img src="/ok.png"></body></html>"#,
            )
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/missing.png")
            .with_status(404)
            .create_async()
            .await;
        let _ok = server
            .mock("GET", "/ok.png")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let (pipeline, _temp_dir) = setup().await;
        let processed = pipeline
            .process(&format!("{}/page", server.url()))
            .await
            .unwrap();

        let images = pipeline
            .database()
            .images_for_task(processed.task_id)
            .await
            .unwrap();
        assert_eq!(images.len(), 1);
        assert!(images[0].path.ends_with("ok.png"));

        let task = pipeline
            .database()
            .get_task(processed.task_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!task.images_in_progress);
    }

    #[tokio::test]
    async fn test_page_failure_writes_nothing() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let (pipeline, _temp_dir) = setup().await;
        let url = format!("{}/gone", server.url());
        let result = pipeline.process(&url).await;

        assert!(matches!(
            result,
            Err(PipelineError::Fetch(crate::fetch::FetchError::Status { status: 404, .. }))
        ));
        assert!(pipeline.database().find_task_by_url(&url).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let (pipeline, _temp_dir) = setup().await;

        let result = pipeline.process("not a url").await;
        assert!(matches!(result, Err(PipelineError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_page_without_body_leaves_images_in_progress() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/frames")
            .with_status(200)
            .with_body(
                r#"<html><head></head><frameset cols="50%,50%"><frame src="a.html"></frameset></html>"#,
            )
            .create_async()
            .await;

        let (pipeline, _temp_dir) = setup().await;
        let url = format!("{}/frames", server.url());
        let result = pipeline.process(&url).await;
        assert!(matches!(result, Err(PipelineError::Extract(_))));

        let task = pipeline
            .database()
            .find_task_by_url(&url)
            .await
            .unwrap()
            .unwrap();
        assert!(task.text_content.is_none());
        assert!(task.images_in_progress);
    }

    #[tokio::test]
    async fn test_empty_page_leaves_images_in_progress() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/empty")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let (pipeline, _temp_dir) = setup().await;
        let url = format!("{}/empty", server.url());
        let result = pipeline.process(&url).await;
        assert!(matches!(
            result,
            Err(PipelineError::Extract(crate::extract::ExtractError::HtmlParse(_)))
        ));

        let task = pipeline
            .database()
            .find_task_by_url(&url)
            .await
            .unwrap()
            .unwrap();
        assert!(task.text_content.is_none());
        assert!(task.images_in_progress);
    }
}

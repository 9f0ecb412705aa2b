//! # pageharvest - Web Page Text and Image Harvester
//!
//! This crate fetches web pages, extracts their visible text with script
//! content stripped, downloads every image they reference, and persists the
//! result as a task that can be polled over HTTP.
//!
//! ## Features
//!
//! - HTML sanitizing and plain-text extraction
//! - Image discovery with relative URL resolution
//! - Task and image persistence with LibSQL
//! - Image payload storage on the local filesystem
//! - Per-URL serialization of processing runs
//! - Axum HTTP API with JSON error bodies
//! - Async API with Tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! use pageharvest::pipeline::{Pipeline, PipelineConfig};
//! use pageharvest::store::{Database, MediaConfig, MediaStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new_from_path("pageharvest.db").await?;
//!     let media = MediaStore::new(MediaConfig::default());
//!     let pipeline = Pipeline::new(db, media, PipelineConfig::default())?;
//!
//!     let processed = pipeline.process("https://example.com/").await?;
//!     let images = pipeline.images(processed.task_id).await?;
//!
//!     for url in images.images_urls {
//!         println!("{}", url);
//!     }
//!     Ok(())
//! }
//! ```

mod error;

pub mod api;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod store;

pub use error::Error;

//! # API Module
//!
//! HTTP surface over the pipeline. Submitting a URL runs the whole pipeline
//! before answering; the status, text and images endpoints are polled
//! afterwards. Stored image payloads are served from the media root.
//!
//! | Route | Method |
//! |---|---|
//! | `/task/` | POST |
//! | `/task/{task_id}/status/` | GET |
//! | `/task/{task_id}/text/` | GET |
//! | `/task/{task_id}/images/` | GET |
//! | `<media url prefix>/<task_id>/<file>` | GET |
//!
//! Every error, including a 404 for an unknown route or a missing image, is
//! answered as `{"error_msg": "..."}`.

mod error;
mod handlers;
mod types;

pub use types::CreateTaskRequest;

use std::sync::Arc;

use axum::Router;
use axum::handler::HandlerWithoutStateExt;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::pipeline::Pipeline;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let media = state.pipeline.media();
    let media_mount = media_mount(media.url_prefix());
    let media_root = media.root().to_path_buf();

    let router = Router::new()
        .route("/task/", post(handlers::create_task))
        .route("/task/{task_id}/status/", get(handlers::task_status))
        .route("/task/{task_id}/text/", get(handlers::task_text))
        .route("/task/{task_id}/images/", get(handlers::task_images));

    let router = match media_mount {
        Some(mount) => router.nest_service(
            &mount,
            ServeDir::new(media_root).not_found_service(handlers::not_found.into_service()),
        ),
        None => router,
    };

    router
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Path the media root is mounted at, if the prefix is a local path
///
/// An absolute prefix (`https://cdn.example.com/`) means payloads are served
/// elsewhere, so nothing is mounted.
fn media_mount(url_prefix: &str) -> Option<String> {
    let mount = url_prefix.trim_end_matches('/');
    if url_prefix.starts_with('/') && !mount.is_empty() {
        Some(mount.to_string())
    } else {
        None
    }
}

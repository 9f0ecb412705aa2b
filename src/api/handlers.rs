//! Task endpoint handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::AppState;
use super::types::CreateTaskRequest;
use crate::error::{Error, Result};
use crate::pipeline::{ProcessedTask, TaskImages, TaskStatus, TaskText};

fn parse_task_id(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| Error::BadRequest(format!("Task ID={} is not a valid identifier!", raw)))
}

fn readiness(ready: bool) -> StatusCode {
    if ready {
        StatusCode::OK
    } else {
        StatusCode::ACCEPTED
    }
}

/// `POST /task/`: run the pipeline for the submitted URL
#[instrument(skip_all)]
pub async fn create_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ProcessedTask>> {
    let url = serde_json::from_slice::<CreateTaskRequest>(&body)
        .ok()
        .and_then(|request| request.url)
        .ok_or_else(|| {
            Error::BadRequest("No `url` request argument or passed not in JSON format!".to_string())
        })?;

    let processed = state.pipeline.process(&url).await?;
    info!(task_id = processed.task_id, url = %processed.url, "Task created");

    Ok(Json(processed))
}

/// `GET /task/{task_id}/status/`
pub async fn task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskStatus>> {
    let task_id = parse_task_id(&task_id)?;
    Ok(Json(state.pipeline.status(task_id).await?))
}

/// `GET /task/{task_id}/text/`: 202 until the text has been extracted
pub async fn task_text(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<(StatusCode, Json<TaskText>)> {
    let task_id = parse_task_id(&task_id)?;
    let text = state.pipeline.text(task_id).await?;

    Ok((readiness(text.is_ready()), Json(text)))
}

/// `GET /task/{task_id}/images/`: 202 while images are still downloading
pub async fn task_images(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<(StatusCode, Json<TaskImages>)> {
    let task_id = parse_task_id(&task_id)?;
    let images = state.pipeline.images(task_id).await?;

    Ok((readiness(images.is_ready()), Json(images)))
}

/// Fallback for unknown routes and missing media files
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error_msg": "Resource not found!" })),
    )
}

/// Fallback for known routes hit with an unsupported method
pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error_msg": "Method not allowed!" })),
    )
}

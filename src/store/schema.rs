//! # Database Schema Module
//!
//! Two tables back the task pipeline:
//! 1. `tasks` - one row per distinct page URL, holding the extracted text and
//!    the image-download flag
//! 2. `images` - image records owned by a task; rows cascade away with their task
//!
//! Foreign key enforcement is switched on per connection, since SQLite leaves
//! it off by default.

use crate::store::error::DbError;
use libsql::{Connection, params};

/// Initialize the database schema
pub async fn initialize_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute("PRAGMA foreign_keys = ON", params![])
        .await
        .map_err(|e| DbError::Schema(format!("Failed to enable foreign keys: {}", e)))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL UNIQUE,
            text_content TEXT,
            images_in_progress INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create tasks table: {}", e)))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            task_id INTEGER NOT NULL,
            path TEXT NOT NULL,
            FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
        )",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create images table: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_images_task_id ON images(task_id)",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create index on images: {}", e)))?;

    Ok(())
}

//! Database operations for tasks and their image records

use crate::store::error::DbError;
use crate::store::schema;
use crate::store::{Image, Task, TaskUpdate};
use libsql::{Connection, Row, Rows, params};
use std::path::Path;
use tracing::{debug, instrument};

const TASK_COLUMNS: &str = "id, url, text_content, images_in_progress, created_at, updated_at";

/// Database manager for tasks and images
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database manager
    #[instrument(skip(conn))]
    pub async fn new(conn: Connection) -> Result<Self, DbError> {
        schema::initialize_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Create a new database manager from a path
    pub async fn new_from_path(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let db = libsql::Builder::new_local(path.as_ref())
            .build()
            .await
            .map_err(|e| DbError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| DbError::Connection(format!("Failed to connect to database: {}", e)))?;

        Self::new(conn).await
    }

    /// Execute a custom query with parameters
    pub async fn execute_query<P>(&self, sql: &str, params: P) -> Result<Rows, DbError>
    where
        P: libsql::params::IntoParams,
    {
        self.conn
            .query(sql, params)
            .await
            .map_err(|e| DbError::Query(format!("Failed to execute query: {}", e)))
    }

    /// Get a task by its URL
    pub async fn find_task_by_url(&self, url: &str) -> Result<Option<Task>, DbError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {} FROM tasks WHERE url = ?", TASK_COLUMNS),
                params![url],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to get task: {}", e)))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(self.row_to_task(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DbError::Data(format!("Failed to get task: {}", e))),
        }
    }

    /// Create the task for `url` or update the existing one
    ///
    /// Fields left as `None` in `update` keep their stored value (or the
    /// column default on creation). Returns the stored task and whether it
    /// was created by this call.
    #[instrument(skip(self, update), level = "debug")]
    pub async fn upsert_task(&self, url: &str, update: TaskUpdate) -> Result<(Task, bool), DbError> {
        let created = self.find_task_by_url(url).await?.is_none();
        let now = chrono::Utc::now().timestamp();

        let mut rows = self
            .conn
            .query(
                &format!(
                    "INSERT INTO tasks (url, text_content, images_in_progress, created_at, updated_at)
                     VALUES (?1, ?2, COALESCE(?3, 0), ?4, ?4)
                     ON CONFLICT(url) DO UPDATE SET
                     text_content = COALESCE(excluded.text_content, tasks.text_content),
                     images_in_progress = COALESCE(?3, tasks.images_in_progress),
                     updated_at = excluded.updated_at
                     RETURNING {}",
                    TASK_COLUMNS
                ),
                params![
                    url,
                    update.text_content,
                    update.images_in_progress.map(i64::from),
                    now,
                ],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to upsert task: {}", e)))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Err(DbError::Data("No row returned from task upsert".to_string())),
            Err(e) => return Err(DbError::Data(format!("Failed to upsert task: {}", e))),
        };

        let task = self.row_to_task(&row)?;
        debug!(task_id = task.id, created, "Upserted task");
        Ok((task, created))
    }

    /// Get a task by ID
    pub async fn get_task(&self, id: i64) -> Result<Option<Task>, DbError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS),
                params![id],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to get task: {}", e)))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(self.row_to_task(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DbError::Data(format!("Failed to get task: {}", e))),
        }
    }

    /// Get all tasks, oldest first
    #[instrument(skip(self))]
    pub async fn list_tasks(&self) -> Result<Vec<Task>, DbError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {} FROM tasks ORDER BY id", TASK_COLUMNS),
                params![],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to list tasks: {}", e)))?;

        let mut tasks = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DbError::Data(format!("Failed to list tasks: {}", e)))?
        {
            tasks.push(self.row_to_task(&row)?);
        }

        Ok(tasks)
    }

    /// Update the image-download flag of a task
    pub async fn set_images_in_progress(&self, id: i64, in_progress: bool) -> Result<(), DbError> {
        let now = chrono::Utc::now().timestamp();

        self.conn
            .execute(
                "UPDATE tasks SET images_in_progress = ?, updated_at = ? WHERE id = ?",
                params![i64::from(in_progress), now, id],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to update task: {}", e)))?;

        Ok(())
    }

    /// Add an image record to a task
    pub async fn add_image(&self, task_id: i64, path: &str) -> Result<Image, DbError> {
        let mut rows = self
            .conn
            .query(
                "INSERT INTO images (task_id, path) VALUES (?, ?) RETURNING id, task_id, path",
                params![task_id, path],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to add image: {}", e)))?;

        match rows.next().await {
            Ok(Some(row)) => self.row_to_image(&row),
            Ok(None) => Err(DbError::Data("No row returned from image insert".to_string())),
            Err(e) => Err(DbError::Data(format!("Failed to add image: {}", e))),
        }
    }

    /// Get the image records of a task
    pub async fn images_for_task(&self, task_id: i64) -> Result<Vec<Image>, DbError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, task_id, path FROM images WHERE task_id = ? ORDER BY id",
                params![task_id],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to get images: {}", e)))?;

        let mut images = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DbError::Data(format!("Failed to get images: {}", e)))?
        {
            images.push(self.row_to_image(&row)?);
        }

        Ok(images)
    }

    /// Delete a single image record
    pub async fn delete_image(&self, id: i64) -> Result<(), DbError> {
        self.conn
            .execute("DELETE FROM images WHERE id = ?", params![id])
            .await
            .map_err(|e| DbError::Query(format!("Failed to delete image: {}", e)))?;

        Ok(())
    }

    /// Convert a database row to a Task
    fn row_to_task(&self, row: &Row) -> Result<Task, DbError> {
        let images_in_progress: i64 = row
            .get(3)
            .map_err(|e| DbError::Data(format!("Failed to get images_in_progress: {}", e)))?;

        Ok(Task {
            id: row
                .get(0)
                .map_err(|e| DbError::Data(format!("Failed to get id: {}", e)))?,
            url: row
                .get(1)
                .map_err(|e| DbError::Data(format!("Failed to get url: {}", e)))?,
            text_content: row
                .get(2)
                .map_err(|e| DbError::Data(format!("Failed to get text_content: {}", e)))?,
            images_in_progress: images_in_progress != 0,
            created_at: row
                .get(4)
                .map_err(|e| DbError::Data(format!("Failed to get created_at: {}", e)))?,
            updated_at: row
                .get(5)
                .map_err(|e| DbError::Data(format!("Failed to get updated_at: {}", e)))?,
        })
    }

    /// Convert a database row to an Image
    fn row_to_image(&self, row: &Row) -> Result<Image, DbError> {
        Ok(Image {
            id: row
                .get(0)
                .map_err(|e| DbError::Data(format!("Failed to get id: {}", e)))?,
            task_id: row
                .get(1)
                .map_err(|e| DbError::Data(format!("Failed to get task_id: {}", e)))?,
            path: row
                .get(2)
                .map_err(|e| DbError::Data(format!("Failed to get path: {}", e)))?,
        })
    }
}

//! Filesystem storage for image payloads
//!
//! Payloads live under the media root at `<task_id>/<file_name>`; the same
//! relative path is recorded in the database and appended to the media URL
//! prefix when the API lists a task's images.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use url::Url;

use crate::store::error::MediaError;

type Result<T> = std::result::Result<T, MediaError>;

/// Longest file name kept when deriving names from image URLs
const MAX_FILE_NAME_LEN: usize = 100;

/// Media store configuration
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory holding the image payloads
    pub root: PathBuf,

    /// URL prefix under which the root is served
    pub url_prefix: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("media"),
            url_prefix: "/images/".to_string(),
        }
    }
}

/// Storage manager for image payloads
#[derive(Debug, Clone)]
pub struct MediaStore {
    config: MediaConfig,
}

impl Default for MediaStore {
    fn default() -> Self {
        Self::new(MediaConfig::default())
    }
}

impl MediaStore {
    /// Create a new media store
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Directory holding the payloads
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// URL prefix the payloads are published under
    pub fn url_prefix(&self) -> &str {
        &self.config.url_prefix
    }

    /// Public URL of a stored payload
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.url_prefix.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Map a stored relative path to its location on disk
    ///
    /// Only plain relative paths are accepted; anything that could escape
    /// the media root is rejected.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !is_plain {
            return Err(MediaError::InvalidPath(path.to_string()));
        }

        Ok(self.config.root.join(relative))
    }

    /// Store a payload for a task and return its relative path
    ///
    /// If the task directory already holds a file with the same name, a
    /// numeric suffix is added before the extension.
    pub async fn save(&self, task_id: i64, file_name: &str, bytes: &[u8]) -> Result<String> {
        let dir = self.config.root.join(task_id.to_string());
        fs::create_dir_all(&dir).await?;

        let file_name = unique_file_name(&dir, file_name).await?;
        fs::write(dir.join(&file_name), bytes).await?;

        let path = format!("{}/{}", task_id, file_name);
        debug!(path = %path, bytes = bytes.len(), "Stored image payload");
        Ok(path)
    }

    /// Remove a stored payload
    ///
    /// Returns `false` when the file was already gone.
    pub async fn remove(&self, path: &str) -> Result<bool> {
        let full_path = self.resolve(path)?;

        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path, "Image payload already missing");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Derive a storage file name from the final path segment of an image URL
pub fn image_file_name(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    let mut name: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = name.trim_matches('.');
    if trimmed.is_empty() {
        return "image".to_string();
    }
    name = trimmed.to_string();

    if name.len() > MAX_FILE_NAME_LEN {
        name = name[name.len() - MAX_FILE_NAME_LEN..].to_string();
    }

    name
}

async fn unique_file_name(dir: &Path, file_name: &str) -> Result<String> {
    if !fs::try_exists(dir.join(file_name)).await? {
        return Ok(file_name.to_string());
    }

    let (stem, extension) = match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name.split_at(idx),
        _ => (file_name, ""),
    };

    let mut counter = 1;
    loop {
        let candidate = format!("{}_{}{}", stem, counter, extension);
        if !fs::try_exists(dir.join(&candidate)).await? {
            return Ok(candidate);
        }
        counter += 1;
    }
}

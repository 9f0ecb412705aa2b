//! Application configuration, loaded from environment variables at startup.

use std::path::PathBuf;

use crate::pipeline::PipelineConfig;
use crate::store::MediaConfig;

/// Runtime configuration for pageharvest.
///
/// Every field has a default so the server runs without any environment
/// variables set. Command-line flags override individual fields.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP address to bind (default: `"0.0.0.0:8000"`).
    pub bind_address: String,

    /// Path of the libsql database file (default: `"pageharvest.db"`).
    pub database_path: PathBuf,

    /// Directory holding downloaded images (default: `"media"`).
    pub media_root: PathBuf,

    /// URL prefix under which the media root is served (default: `"/images/"`).
    pub media_url: String,

    /// User agent for outgoing requests; the pipeline default when unset.
    pub user_agent: Option<String>,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit console log records as newline-delimited JSON.
    pub log_json: bool,

    /// Directory for daily-rotated log files; no file logging when unset.
    pub log_dir: Option<PathBuf>,

    /// Export traces over OTLP.
    pub otel: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Build [`AppConfig`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`AppConfig`] from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            bind_address: env_or(&lookup, "PAGEHARVEST_BIND", "0.0.0.0:8000"),
            database_path: env_or(&lookup, "PAGEHARVEST_DATABASE", "pageharvest.db").into(),
            media_root: env_or(&lookup, "PAGEHARVEST_MEDIA_ROOT", "media").into(),
            media_url: env_or(&lookup, "PAGEHARVEST_MEDIA_URL", "/images/"),
            user_agent: non_empty(lookup("PAGEHARVEST_USER_AGENT")),
            log_level: env_or(&lookup, "PAGEHARVEST_LOG", "info"),
            log_json: flag(&lookup, "PAGEHARVEST_LOG_JSON"),
            log_dir: non_empty(lookup("PAGEHARVEST_LOG_DIR")).map(PathBuf::from),
            otel: flag(&lookup, "PAGEHARVEST_OTEL"),
        }
    }

    /// Pipeline settings derived from this configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        let builder = PipelineConfig::builder();
        match &self.user_agent {
            Some(user_agent) => builder.user_agent(user_agent.clone()).build(),
            None => builder.build(),
        }
    }

    /// Media store settings derived from this configuration
    pub fn media_config(&self) -> MediaConfig {
        MediaConfig {
            root: self.media_root.clone(),
            url_prefix: self.media_url.clone(),
        }
    }
}

fn env_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(key)).unwrap_or_else(|| default.to_owned())
}

fn flag<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

//! # Pipeline Configuration Module
//!
//! Configuration for the page-processing pipeline, with a builder for
//! overriding individual settings.
//!
//! ## Key Components
//!
//! - `PipelineConfig`: user agent and sanitizer settings
//! - `PipelineConfigBuilder`: builder pattern implementation for easier configuration

use crate::extract::DEFAULT_STRIP_SELECTORS;

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// User agent sent with page and image requests
    pub user_agent: String,

    /// CSS selectors for elements removed before text extraction
    pub strip_selectors: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("pageharvest/{}", env!("CARGO_PKG_VERSION")),
            strip_selectors: DEFAULT_STRIP_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Builder for PipelineConfig
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the CSS selectors for elements to strip
    pub fn strip_selectors(mut self, strip_selectors: Vec<String>) -> Self {
        self.config.strip_selectors = strip_selectors;
        self
    }

    /// Build the configuration
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl PipelineConfig {
    /// Create a new builder
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();

        assert!(config.user_agent.starts_with("pageharvest/"));
        assert!(config.strip_selectors.contains(&"script".to_string()));
    }

    #[test]
    fn test_builder_overrides() {
        let config = PipelineConfig::builder()
            .user_agent("custom-agent/1.0")
            .strip_selectors(vec!["script".to_string(), "nav".to_string()])
            .build();

        assert_eq!(config.user_agent, "custom-agent/1.0");
        assert_eq!(config.strip_selectors, vec!["script", "nav"]);
    }
}

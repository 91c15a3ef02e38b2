use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and resolving credentials from the environment.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Generative model settings
    pub model: ModelConfig,

    /// Stock media provider settings
    pub media: MediaConfig,

    /// Pipeline tuning
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Generative model provider settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModelConfig {
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; falls back to the GEMINI_API_KEY environment variable
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL; empty means the public API
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_model_timeout_secs")]
    pub timeout_secs: u64,

    /// Generation temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens the model may generate
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

/// Stock media provider settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MediaConfig {
    /// API key; falls back to the PEXELS_API_KEY environment variable
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL; empty means the public API
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Result count requested per query
    #[serde(default = "default_per_query_limit")]
    pub per_query_limit: usize,

    /// Request timeout in seconds
    #[serde(default = "default_media_timeout_secs")]
    pub timeout_secs: u64,
}

/// Pipeline tuning
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Max concurrent media provider requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Overall media resolution deadline in seconds
    #[serde(default = "default_resolve_timeout_secs")]
    pub resolve_timeout_secs: u64,
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_model_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    4096
}

fn default_per_query_limit() -> usize {
    5
}

fn default_media_timeout_secs() -> u64 {
    30
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_resolve_timeout_secs() -> u64 {
    60
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: String::new(),
            timeout_secs: default_model_timeout_secs(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            per_query_limit: default_per_query_limit(),
            timeout_secs: default_media_timeout_secs(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: default_concurrent_requests(),
            resolve_timeout_secs: default_resolve_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            media: MediaConfig::default(),
            pipeline: PipelineConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Resolve credentials from the environment where the config file left
    /// them empty, then validate.
    pub fn resolve_credentials(&mut self) {
        if self.model.api_key.is_empty() {
            if let Ok(key) = std::env::var("GEMINI_API_KEY") {
                self.model.api_key = key;
            }
        }
        if self.media.api_key.is_empty() {
            if let Ok(key) = std::env::var("PEXELS_API_KEY") {
                self.media.api_key = key;
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.model.trim().is_empty() {
            return Err(anyhow!("Model name must not be empty"));
        }

        if self.model.api_key.trim().is_empty() {
            return Err(anyhow!(
                "Model API key is required (config 'model.api_key' or GEMINI_API_KEY)"
            ));
        }

        if self.media.api_key.trim().is_empty() {
            return Err(anyhow!(
                "Media API key is required (config 'media.api_key' or PEXELS_API_KEY)"
            ));
        }

        if !self.model.endpoint.is_empty() {
            url::Url::parse(&self.model.endpoint)
                .map_err(|e| anyhow!("Invalid model endpoint URL: {}", e))?;
        }

        if !self.media.endpoint.is_empty() {
            url::Url::parse(&self.media.endpoint)
                .map_err(|e| anyhow!("Invalid media endpoint URL: {}", e))?;
        }

        // Pexels caps per_page at 80
        if self.media.per_query_limit == 0 || self.media.per_query_limit > 80 {
            return Err(anyhow!(
                "media.per_query_limit must be between 1 and 80, got {}",
                self.media.per_query_limit
            ));
        }

        if self.pipeline.concurrent_requests == 0 || self.pipeline.concurrent_requests > 16 {
            return Err(anyhow!(
                "pipeline.concurrent_requests must be between 1 and 16, got {}",
                self.pipeline.concurrent_requests
            ));
        }

        if self.pipeline.resolve_timeout_secs == 0 {
            return Err(anyhow!("pipeline.resolve_timeout_secs must be positive"));
        }

        Ok(())
    }
}

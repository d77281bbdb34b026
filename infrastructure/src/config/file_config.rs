//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig};
use nutri_domain::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("base_url must start with http:// or https://")]
    InvalidBaseUrl,

    #[error("{0}")]
    InvalidGeneration(String),
}

/// Raw Gemini endpoint configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Base URL of the models collection
    pub base_url: String,
    /// Model name, e.g. `gemini-1.5-flash-latest`
    pub model: String,
    /// Request timeout; unset leaves the transport default in place
    pub timeout_seconds: Option<u64>,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: None,
        }
    }
}

/// Raw credential store configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// Path of the key-value store file (defaults to the data directory)
    pub path: Option<String>,
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show a spinner while a request is pending
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving one record per exchange event
    pub conversation_log: Option<String>,
    /// File receiving `tracing` output instead of stderr
    pub file: Option<String>,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Gemini endpoint settings
    pub gemini: FileGeminiConfig,
    /// Sampling parameters and preamble
    pub generation: GenerationConfig,
    /// Credential store settings
    pub store: FileStoreConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Logging settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(0) = self.gemini.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.gemini.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }

        let base_url = self.gemini.base_url.trim();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(ConfigValidationError::InvalidBaseUrl);
        }

        self.generation
            .validate()
            .map_err(|e| ConfigValidationError::InvalidGeneration(e.to_string()))
    }

    /// Endpoint settings for [`GeminiGateway`](crate::GeminiGateway).
    pub fn gemini_config(&self) -> GeminiConfig {
        let mut config = GeminiConfig::new()
            .with_base_url(self.gemini.base_url.trim())
            .with_model(self.gemini.model.trim());
        if let Some(seconds) = self.gemini.timeout_seconds {
            config = config.with_timeout(Duration::from_secs(seconds));
        }
        config
    }

    /// Store file path, falling back to the platform data directory.
    pub fn store_path(&self) -> Option<PathBuf> {
        match &self.store.path {
            Some(path) => Some(PathBuf::from(path)),
            None => crate::store::FileKeyValueStore::default_path(),
        }
    }
}

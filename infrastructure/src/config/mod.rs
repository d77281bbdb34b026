//! Configuration file loading for nutri-chat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. `NUTRI_CHAT_*` environment variables (`__` separates sections)
//! 3. Project root: `./nutri-chat.toml` or `./.nutri-chat.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/nutri-chat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileGeminiConfig, FileLoggingConfig, FileOutputConfig,
    FileReplConfig, FileStoreConfig,
};
pub use loader::ConfigLoader;

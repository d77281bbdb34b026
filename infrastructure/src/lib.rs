//! Infrastructure layer for nutri-chat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gemini;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileGeminiConfig, FileLoggingConfig,
    FileOutputConfig, FileReplConfig, FileStoreConfig,
};
pub use gemini::{GeminiConfig, GeminiGateway};
pub use logging::JsonlConversationLogger;
pub use store::FileKeyValueStore;

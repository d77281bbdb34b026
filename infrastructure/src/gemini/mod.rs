//! Google Gemini adapter for the generation gateway port.
//!
//! - [`config::GeminiConfig`] — endpoint, model and timeout
//! - [`protocol`] — `generateContent` request/response bodies
//! - [`gateway::GeminiGateway`] — the reqwest-backed adapter

pub mod config;
pub mod gateway;
pub mod protocol;

pub use config::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig};
pub use gateway::GeminiGateway;

//! Domain layer for nutri-chat
//!
//! This crate contains the core entities and value objects of a chat
//! session with a nutrition assistant. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Credential**: the API key that authorizes calls to the generation
//!   endpoint. A session is either `Unconfigured` or `Ready`.
//! - **Turn**: one message, spoken by the user or the assistant.
//! - **Transcript**: the append-only, ordered history of turns.

pub mod core;
pub mod generation;
pub mod prompt;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use crate::core::{
    credential::{Credential, CredentialState},
    error::DomainError,
};
pub use generation::GenerationConfig;
pub use prompt::{PromptTemplate, SUGGESTED_QUESTIONS};
pub use session::{
    entities::{Role, Turn},
    transcript::Transcript,
};

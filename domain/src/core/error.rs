//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The supplied credential was empty after trimming whitespace.
    #[error("Please enter a valid API key")]
    EmptyCredential,

    #[error("Invalid generation parameter: {0}")]
    InvalidGenerationParameter(String),
}

impl DomainError {
    /// Check if this error is a user-input validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::EmptyCredential)
    }
}

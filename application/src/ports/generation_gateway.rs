//! Generation gateway port
//!
//! Defines the interface for the external text-generation endpoint.

use async_trait::async_trait;
use nutri_domain::{Credential, GenerationConfig};
use thiserror::Error;

/// Errors that can occur while calling the generation endpoint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The endpoint answered with a non-success HTTP status.
    #[error("API Error: {status}")]
    Status { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A success response did not carry the expected candidate structure.
    #[error("Unexpected response format: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// HTTP status code, when the endpoint answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A single generation request: the wrapped prompt plus sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    /// Build a request from an already-wrapped prompt and the sampling
    /// parameters of `config`.
    pub fn new(prompt: impl Into<String>, config: &GenerationConfig) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: config.temperature,
            top_k: config.top_k,
            top_p: config.top_p,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Gateway for text generation
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Name of the model requests are sent to, for logs.
    fn model(&self) -> &str;

    /// Issue one request and return the text of the first candidate.
    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> Result<String, GatewayError>;
}

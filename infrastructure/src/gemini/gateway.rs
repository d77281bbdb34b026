//! Gemini generation gateway implementation

use super::config::GeminiConfig;
use super::protocol::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use nutri_application::{GatewayError, GenerationGateway, GenerationRequest};
use nutri_domain::Credential;
use nutri_domain::util::preview;
use tracing::{debug, info, warn};

/// [`GenerationGateway`] backed by the Generative Language REST API.
///
/// The credential travels as the `key` query parameter. Transport errors
/// are stripped of their URL so the key never reaches a log line.
pub struct GeminiGateway {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| GatewayError::Transport(e.without_url().to_string()))?;

        info!(
            "GeminiGateway initialized (model: {}, endpoint: {})",
            config.model,
            config.endpoint()
        );

        Ok(Self { config, http })
    }

    fn map_transport_error(error: reqwest::Error) -> GatewayError {
        if error.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Transport(error.without_url().to_string())
        }
    }
}

#[async_trait]
impl GenerationGateway for GeminiGateway {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> Result<String, GatewayError> {
        let body = GenerateContentRequest::from_request(request);

        debug!(model = %self.config.model, key = %credential, "Gemini API request");

        let response = self
            .http
            .post(self.config.endpoint())
            .query(&[("key", credential.expose())])
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                "Gemini API returned HTTP {}: {}",
                status.as_u16(),
                preview(&text, 200)
            );
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let text = response.text().await.map_err(Self::map_transport_error)?;
        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini API usage"
            );
        }

        parsed
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::MalformedResponse("no candidate text".to_string()))
    }
}

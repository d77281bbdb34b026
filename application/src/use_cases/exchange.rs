//! Exchange Client use case.
//!
//! One exchange = append the user turn, call the generation endpoint once,
//! append the assistant turn. Failures leave the user turn in place and are
//! mapped to one of three user-facing messages. Nothing is retried.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::generation_gateway::{GatewayError, GenerationGateway, GenerationRequest};
use crate::ports::progress::{ExchangeProgressNotifier, NoExchangeProgress};
use nutri_domain::util::preview;
use nutri_domain::{Credential, GenerationConfig, PromptTemplate, Transcript, Turn};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const INVALID_CREDENTIAL_MESSAGE: &str =
    "API key is invalid or has no access. Please check your Gemini API key.";
const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please wait a moment and try again.";
const GENERIC_ERROR_MESSAGE: &str =
    "Sorry, I encountered an error. Please check your API key and try again.";

/// A failed exchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// The endpoint answered with a non-success status.
    #[error("API Error: {status}")]
    Api { status: u16 },

    /// No response was received at all.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A success response without a usable candidate.
    #[error("Unexpected response format: {0}")]
    MalformedResponse(String),
}

impl ExchangeError {
    /// HTTP status code, if the endpoint answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ExchangeError::Api { status } => Some(*status),
            _ => None,
        }
    }

    /// The message shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self.status() {
            Some(403) => INVALID_CREDENTIAL_MESSAGE,
            Some(429) => RATE_LIMIT_MESSAGE,
            _ => GENERIC_ERROR_MESSAGE,
        }
    }
}

impl From<GatewayError> for ExchangeError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Status { status, .. } => ExchangeError::Api { status },
            GatewayError::Transport(msg) => ExchangeError::Transport(msg),
            GatewayError::Timeout => ExchangeError::Transport("request timed out".to_string()),
            GatewayError::MalformedResponse(msg) => ExchangeError::MalformedResponse(msg),
        }
    }
}

/// Sends user messages to the generation endpoint.
///
/// Single-flight is the caller's responsibility: the client keeps no
/// in-flight state and does not queue.
#[derive(Clone)]
pub struct ExchangeClient {
    gateway: Arc<dyn GenerationGateway>,
    config: GenerationConfig,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ExchangeClient {
    pub fn new(gateway: Arc<dyn GenerationGateway>, config: GenerationConfig) -> Self {
        Self {
            gateway,
            config,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Send `message` without progress reporting.
    ///
    /// See [`send_with_progress`](Self::send_with_progress).
    pub async fn send(
        &self,
        message: &str,
        credential: &Credential,
        transcript: &mut Transcript,
    ) -> Result<Option<Turn>, ExchangeError> {
        self.send_with_progress(message, credential, transcript, &NoExchangeProgress)
            .await
    }

    /// Run one exchange.
    ///
    /// - Blank `message`: `Ok(None)`, no request, transcript unchanged.
    /// - Success: both turns appended, the assistant turn is returned.
    /// - Failure: only the user turn is appended.
    pub async fn send_with_progress(
        &self,
        message: &str,
        credential: &Credential,
        transcript: &mut Transcript,
        progress: &dyn ExchangeProgressNotifier,
    ) -> Result<Option<Turn>, ExchangeError> {
        let message = message.trim();
        if message.is_empty() {
            debug!("Ignoring blank message");
            return Ok(None);
        }

        transcript.push(Turn::user(message));

        let prompt = PromptTemplate::wrap(&self.config.system_preamble, message);
        let request = GenerationRequest::new(prompt, &self.config);

        info!(
            "Sending message to {}: {}",
            self.gateway.model(),
            preview(message, 80)
        );
        self.conversation_logger.log(ConversationEvent::new(
            "exchange_request",
            serde_json::json!({
                "model": self.gateway.model(),
                "message": message,
                "temperature": request.temperature,
                "top_k": request.top_k,
                "top_p": request.top_p,
                "max_output_tokens": request.max_output_tokens,
            }),
        ));

        progress.on_request_start(message);
        let result = self.gateway.generate(credential, &request).await;
        progress.on_request_end(result.is_ok());

        match result {
            Ok(text) => {
                debug!("Received reply ({} bytes)", text.len());
                self.conversation_logger.log(ConversationEvent::new(
                    "exchange_response",
                    serde_json::json!({
                        "model": self.gateway.model(),
                        "bytes": text.len(),
                        "text": text,
                    }),
                ));
                let turn = Turn::assistant(text);
                transcript.push(turn.clone());
                Ok(Some(turn))
            }
            Err(gateway_error) => {
                warn!("Exchange failed: {}", gateway_error);
                let error = ExchangeError::from(gateway_error);
                self.conversation_logger.log(ConversationEvent::new(
                    "exchange_error",
                    serde_json::json!({
                        "model": self.gateway.model(),
                        "status": error.status(),
                        "error": error.to_string(),
                    }),
                ));
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nutri_domain::Role;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockGateway {
        responses: Mutex<VecDeque<Result<String, GatewayError>>>,
        requests: Mutex<Vec<(String, GenerationRequest)>>,
    }

    impl MockGateway {
        fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerationGateway for MockGateway {
        fn model(&self) -> &str {
            "mock-model"
        }

        async fn generate(
            &self,
            credential: &Credential,
            request: &GenerationRequest,
        ) -> Result<String, GatewayError> {
            self.requests
                .lock()
                .unwrap()
                .push((credential.expose().to_string(), request.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Transport("no more responses".to_string())))
        }
    }

    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    struct RecordingProgress {
        calls: Mutex<Vec<String>>,
    }

    impl ExchangeProgressNotifier for RecordingProgress {
        fn on_request_start(&self, message: &str) {
            self.calls.lock().unwrap().push(format!("start:{}", message));
        }

        fn on_request_end(&self, success: bool) {
            self.calls.lock().unwrap().push(format!("end:{}", success));
        }
    }

    fn credential() -> Credential {
        Credential::parse("AIzaSyValidKey").unwrap()
    }

    fn status(code: u16) -> GatewayError {
        GatewayError::Status {
            status: code,
            body: String::new(),
        }
    }

    fn client(gateway: Arc<MockGateway>) -> ExchangeClient {
        ExchangeClient::new(gateway, GenerationConfig::default())
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_successful_exchange_appends_both_turns() {
        let gateway = Arc::new(MockGateway::new(vec![Ok("Eat more vegetables.".to_string())]));
        let client = client(gateway.clone());
        let mut transcript = Transcript::new();

        let reply = client
            .send("What should I eat?", &credential(), &mut transcript)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(reply, Turn::assistant("Eat more vegetables."));
        assert_eq!(
            transcript.turns(),
            &[
                Turn::user("What should I eat?"),
                Turn::assistant("Eat more vegetables.")
            ]
        );
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_message_is_silent_noop() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let client = client(gateway.clone());
        let mut transcript = Transcript::new();

        for message in ["", "   ", "\n\t"] {
            let result = client.send(message, &credential(), &mut transcript).await;
            assert_eq!(result, Ok(None));
        }
        assert!(transcript.is_empty());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_invalid_credential_message() {
        let gateway = Arc::new(MockGateway::new(vec![Err(status(403))]));
        let client = client(gateway);
        let mut transcript = Transcript::new();

        let err = client
            .send("What should I eat?", &credential(), &mut transcript)
            .await
            .unwrap_err();

        assert_eq!(err, ExchangeError::Api { status: 403 });
        assert_eq!(err.user_message(), INVALID_CREDENTIAL_MESSAGE);
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last().unwrap().role(), Role::User);
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_retry_later_message() {
        let gateway = Arc::new(MockGateway::new(vec![Err(status(429))]));
        let client = client(gateway);
        let mut transcript = Transcript::new();

        let err = client
            .send("Hi", &credential(), &mut transcript)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), RATE_LIMIT_MESSAGE);
    }

    #[tokio::test]
    async fn test_other_failures_map_to_generic_message() {
        let gateway = Arc::new(MockGateway::new(vec![
            Err(status(500)),
            Err(GatewayError::MalformedResponse("no candidates".to_string())),
            Err(GatewayError::Transport("connection refused".to_string())),
            Err(GatewayError::Timeout),
        ]));
        let client = client(gateway.clone());
        let mut transcript = Transcript::new();

        for _ in 0..4 {
            let err = client
                .send("Hi", &credential(), &mut transcript)
                .await
                .unwrap_err();
            assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
        }
        // One user turn per attempt, no retries.
        assert_eq!(transcript.len(), 4);
        assert_eq!(gateway.call_count(), 4);
    }

    #[tokio::test]
    async fn test_request_carries_credential_prompt_and_parameters() {
        let gateway = Arc::new(MockGateway::new(vec![Ok("ok".to_string())]));
        let config = GenerationConfig::default()
            .with_temperature(0.1)
            .with_system_preamble("Be a chef.");
        let client = ExchangeClient::new(gateway.clone(), config);
        let mut transcript = Transcript::new();

        client
            .send("  Pasta?  ", &credential(), &mut transcript)
            .await
            .unwrap();

        let requests = gateway.requests.lock().unwrap();
        let (key, request) = &requests[0];
        assert_eq!(key, "AIzaSyValidKey");
        assert_eq!(request.prompt, "Be a chef. Here's the user's question: Pasta?");
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.top_k, 40);
        assert_eq!(transcript.turns()[0].text(), "Pasta?");
    }

    #[tokio::test]
    async fn test_progress_and_conversation_log() {
        let gateway = Arc::new(MockGateway::new(vec![Ok("ok".to_string()), Err(status(429))]));
        let logger = Arc::new(RecordingLogger {
            events: Mutex::new(Vec::new()),
        });
        let client = client(gateway).with_conversation_logger(logger.clone());
        let progress = RecordingProgress {
            calls: Mutex::new(Vec::new()),
        };
        let mut transcript = Transcript::new();

        let _ = client
            .send_with_progress("one", &credential(), &mut transcript, &progress)
            .await;
        let _ = client
            .send_with_progress("two", &credential(), &mut transcript, &progress)
            .await;

        assert_eq!(
            *progress.calls.lock().unwrap(),
            vec!["start:one", "end:true", "start:two", "end:false"]
        );
        assert_eq!(
            *logger.events.lock().unwrap(),
            vec![
                "exchange_request",
                "exchange_response",
                "exchange_request",
                "exchange_error"
            ]
        );
    }
}

//! Application layer for nutri-chat
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    generation_gateway::{GatewayError, GenerationGateway, GenerationRequest},
    key_value_store::{CREDENTIAL_KEY, InMemoryKeyValueStore, KeyValueStore, StoreError},
    progress::{ExchangeProgressNotifier, NoExchangeProgress},
};
pub use use_cases::chat_session::{ChatError, ChatSession, SubmitOutcome};
pub use use_cases::exchange::{ExchangeClient, ExchangeError};
pub use use_cases::session_store::{SessionStore, SessionStoreError};

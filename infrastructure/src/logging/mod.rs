//! Logging infrastructure — structured conversation logging.
//!
//! Provides [`JsonlConversationLogger`], which implements the
//! [`ConversationLogger`](nutri_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;

//! Prompt templates for the nutrition assistant

mod template;

pub use template::{DEFAULT_SYSTEM_PREAMBLE, PromptTemplate, SUGGESTED_QUESTIONS};

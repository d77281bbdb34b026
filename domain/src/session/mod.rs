//! Conversation session domain.
//!
//! - [`entities::Turn`] — a single message, attributed to a [`entities::Role`]
//! - [`transcript::Transcript`] — the ordered history of turns

pub mod entities;
pub mod transcript;

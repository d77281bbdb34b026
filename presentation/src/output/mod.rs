//! Output formatting for turns, errors and transcripts

pub mod console;

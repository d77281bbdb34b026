//! Generation parameters sent with every request.

mod config;

pub use config::GenerationConfig;

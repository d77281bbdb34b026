//! Generation configuration value object

use crate::core::error::DomainError;
use crate::prompt::DEFAULT_SYSTEM_PREAMBLE;
use serde::{Deserialize, Serialize};

/// Sampling parameters and instructional preamble for an exchange.
///
/// Defaults match the assistant's tuned values: temperature 0.7,
/// top-k 40, top-p 0.95 and a 1024 token reply cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
    /// Text prepended to every user message.
    pub system_preamble: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
            system_preamble: DEFAULT_SYSTEM_PREAMBLE.to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_system_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.system_preamble = preamble.into();
        self
    }

    /// Check that every parameter is inside the range the endpoint accepts.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DomainError::InvalidGenerationParameter(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(DomainError::InvalidGenerationParameter(format!(
                "top_p must be in (0, 1], got {}",
                self.top_p
            )));
        }
        if self.top_k == 0 {
            return Err(DomainError::InvalidGenerationParameter(
                "top_k must be at least 1".to_string(),
            ));
        }
        if self.max_output_tokens == 0 {
            return Err(DomainError::InvalidGenerationParameter(
                "max_output_tokens must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.top_k, 40);
        assert_eq!(config.top_p, 0.95);
        assert_eq!(config.max_output_tokens, 1024);
        assert!(config.system_preamble.contains("nutritionist"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = GenerationConfig::default()
            .with_temperature(0.2)
            .with_top_k(10)
            .with_top_p(0.5)
            .with_max_output_tokens(256)
            .with_system_preamble("Be brief.");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.top_k, 10);
        assert_eq!(config.top_p, 0.5);
        assert_eq!(config.max_output_tokens, 256);
        assert_eq!(config.system_preamble, "Be brief.");
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(GenerationConfig::default().with_temperature(2.5).validate().is_err());
        assert!(GenerationConfig::default().with_top_p(0.0).validate().is_err());
        assert!(GenerationConfig::default().with_top_p(f64::NAN).validate().is_err());
        assert!(GenerationConfig::default().with_temperature(f64::NAN).validate().is_err());
        assert!(GenerationConfig::default().with_top_k(0).validate().is_err());
        assert!(
            GenerationConfig::default()
                .with_max_output_tokens(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: GenerationConfig = serde_json::from_str(r#"{"temperature": 0.3}"#).unwrap();
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.top_k, 40);
    }
}

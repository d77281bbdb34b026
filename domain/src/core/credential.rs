//! Credential value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// An API key for the generation endpoint (Value Object)
///
/// Always non-empty and trimmed. `Debug` and `Display` mask the raw value
/// so a credential never ends up in logs verbatim.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Credential {
    value: String,
}

impl Credential {
    /// Validate and create a credential from user input.
    ///
    /// Surrounding whitespace is stripped; blank input is rejected.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyCredential);
        }
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    /// The raw token, for embedding in an outbound request.
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Masked form: first 4 and last 3 characters, `****` for short keys.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.value.chars().collect();
        if chars.len() <= 8 {
            return "****".to_string();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 3..].iter().collect();
        format!("{}…{}", head, tail)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl TryFrom<String> for Credential {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Credential> for String {
    fn from(credential: Credential) -> Self {
        credential.value
    }
}

/// Whether the session has a credential to talk to the endpoint with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialState {
    /// No credential saved yet; the setup prompt must be shown.
    #[default]
    Unconfigured,
    /// A credential is available and messages can be sent.
    Ready,
}

impl CredentialState {
    pub fn is_ready(&self) -> bool {
        matches!(self, CredentialState::Ready)
    }
}

impl std::fmt::Display for CredentialState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialState::Unconfigured => write!(f, "unconfigured"),
            CredentialState::Ready => write!(f, "ready"),
        }
    }
}

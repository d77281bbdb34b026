//! Chat session use case.
//!
//! The explicit session object the interface drives: it owns the
//! [`SessionStore`], the [`ExchangeClient`] and the [`Transcript`].
//! `submit` takes `&mut self`, so a second message cannot be sent while
//! one is still pending.

use crate::ports::key_value_store::StoreError;
use crate::ports::progress::{ExchangeProgressNotifier, NoExchangeProgress};
use crate::use_cases::exchange::{ExchangeClient, ExchangeError};
use crate::use_cases::session_store::{SessionStore, SessionStoreError};
use nutri_domain::{Credential, CredentialState, Transcript, Turn};
use thiserror::Error;
use tracing::info;

/// Errors that prevent a submission from being attempted at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("No API key configured")]
    NotConfigured,
}

/// Result of submitting one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The message was blank; nothing happened.
    Skipped,
    /// The assistant replied.
    Reply(Turn),
    /// The exchange failed; the user turn is still in the transcript.
    Failed(ExchangeError),
}

impl SubmitOutcome {
    /// Text to display for this outcome, if any.
    pub fn display_text(&self) -> Option<&str> {
        match self {
            SubmitOutcome::Skipped => None,
            SubmitOutcome::Reply(turn) => Some(turn.text()),
            SubmitOutcome::Failed(error) => Some(error.user_message()),
        }
    }
}

/// A chat with the nutrition assistant.
pub struct ChatSession {
    store: SessionStore,
    client: ExchangeClient,
    transcript: Transcript,
}

impl ChatSession {
    /// Create a session, restoring a saved credential if there is one.
    pub fn start(mut store: SessionStore, client: ExchangeClient) -> Result<Self, StoreError> {
        let state = store.restore()?;
        info!("Chat session started ({})", state);
        Ok(Self {
            store,
            client,
            transcript: Transcript::new(),
        })
    }

    pub fn state(&self) -> CredentialState {
        self.store.state()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.store.credential()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn client(&self) -> &ExchangeClient {
        &self.client
    }

    /// Save a credential entered at the setup prompt.
    pub fn configure(&mut self, value: &str) -> Result<Credential, SessionStoreError> {
        self.store.save_credential(value)
    }

    /// Submit a message without progress reporting.
    pub async fn submit(&mut self, message: &str) -> Result<SubmitOutcome, ChatError> {
        self.submit_with_progress(message, &NoExchangeProgress)
            .await
    }

    /// Submit a message and run one exchange.
    ///
    /// Fails with [`ChatError::NotConfigured`] while no credential is set;
    /// exchange failures are reported as [`SubmitOutcome::Failed`].
    pub async fn submit_with_progress(
        &mut self,
        message: &str,
        progress: &dyn ExchangeProgressNotifier,
    ) -> Result<SubmitOutcome, ChatError> {
        let Some(credential) = self.store.credential() else {
            return Err(ChatError::NotConfigured);
        };

        let result = self
            .client
            .send_with_progress(message, credential, &mut self.transcript, progress)
            .await;

        Ok(match result {
            Ok(Some(turn)) => SubmitOutcome::Reply(turn),
            Ok(None) => SubmitOutcome::Skipped,
            Err(error) => SubmitOutcome::Failed(error),
        })
    }
}

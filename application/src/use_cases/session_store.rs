//! Session Store use case.
//!
//! Owns the credential state machine: `Unconfigured` until a credential is
//! saved (or found in the store at startup), `Ready` afterwards. There is
//! no transition back to `Unconfigured`.

use crate::ports::key_value_store::{CREDENTIAL_KEY, KeyValueStore, StoreError};
use nutri_domain::{Credential, CredentialState, DomainError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from [`SessionStore::save_credential`].
#[derive(Error, Debug)]
pub enum SessionStoreError {
    /// Blank input; nothing was written and the state is unchanged.
    #[error("{0}")]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionStoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SessionStoreError::Validation(_))
    }
}

/// Holds the credential and persists it through a [`KeyValueStore`].
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    credential: Option<Credential>,
}

impl SessionStore {
    /// Create an `Unconfigured` store. Call [`restore`](Self::restore) to
    /// pick up a previously saved credential.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            credential: None,
        }
    }

    /// Read the saved credential without changing any state.
    ///
    /// A saved value that is blank, or a store that cannot be parsed, is
    /// treated as absent so the user can set up a new credential.
    pub fn load_credential(&self) -> Result<Option<Credential>, StoreError> {
        let raw = match self.store.get(CREDENTIAL_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(StoreError::Corrupt(reason)) => {
                warn!("Ignoring unreadable credential store: {}", reason);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        match Credential::parse(&raw) {
            Ok(credential) => Ok(Some(credential)),
            Err(_) => {
                warn!("Ignoring blank value stored under '{}'", CREDENTIAL_KEY);
                Ok(None)
            }
        }
    }

    /// Load the saved credential into the session, moving to `Ready` if
    /// one was found.
    pub fn restore(&mut self) -> Result<CredentialState, StoreError> {
        if let Some(credential) = self.load_credential()? {
            debug!("Restored credential {}", credential);
            self.credential = Some(credential);
        }
        Ok(self.state())
    }

    /// Validate and persist a credential, moving to `Ready`.
    ///
    /// Blank input fails with a validation error and has no side effect.
    pub fn save_credential(&mut self, value: &str) -> Result<Credential, SessionStoreError> {
        let credential = Credential::parse(value)?;
        self.store.set(CREDENTIAL_KEY, credential.expose())?;
        info!("Saved credential {}", credential);
        self.credential = Some(credential.clone());
        Ok(credential)
    }

    pub fn state(&self) -> CredentialState {
        if self.credential.is_some() {
            CredentialState::Ready
        } else {
            CredentialState::Unconfigured
        }
    }

    /// The active credential, `None` while `Unconfigured`.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}

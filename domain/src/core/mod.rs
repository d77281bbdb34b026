//! Core domain concepts shared across all subdomains.
//!
//! - [`credential::Credential`] — the validated API key
//! - [`credential::CredentialState`] — `Unconfigured` / `Ready`
//! - [`error::DomainError`] — domain-level errors

pub mod credential;
pub mod error;

//! Password providers with automatic memory zeroing.
//!
//! The connection manager never talks to the terminal itself. It asks an
//! injected `CredentialProvider` for the password the first time a session
//! is opened, so tests and embedders can substitute a fixed secret.
//!
//! # Security
//! - Passwords are returned in `Zeroizing<String>` containers
//! - Memory is cleared when the container goes out of scope
//! - Providers never appear in debug output with their secret

use crate::{ConnectionConfig, Result, error::TemplateError};
use zeroize::Zeroizing;

/// Source of the database password for a connection target.
pub trait CredentialProvider: Send + Sync {
    /// Returns the password for `target`.
    ///
    /// # Errors
    /// Returns `TemplateError::Credential` when the secret cannot be read.
    fn password(&self, target: &ConnectionConfig) -> Result<Zeroizing<String>>;
}

impl<F> CredentialProvider for F
where
    F: Fn(&ConnectionConfig) -> Result<Zeroizing<String>> + Send + Sync,
{
    fn password(&self, target: &ConnectionConfig) -> Result<Zeroizing<String>> {
        self(target)
    }
}

/// Asks for the password on the controlling terminal without echo.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptCredentials;

impl PromptCredentials {
    /// Prompt shown for `target`.
    pub fn prompt_for(target: &ConnectionConfig) -> String {
        format!("Enter your password for {}: ", target.prompt_label())
    }
}

impl CredentialProvider for PromptCredentials {
    fn password(&self, target: &ConnectionConfig) -> Result<Zeroizing<String>> {
        rpassword::prompt_password(Self::prompt_for(target))
            .map(Zeroizing::new)
            .map_err(|source| TemplateError::Credential { source })
    }
}

/// Fixed password, zeroed on drop.
///
/// # Example
///
/// ```rust
/// use tbltemplate_core::{ConnectionConfig, security::{CredentialProvider, StaticCredentials}};
///
/// let provider = StaticCredentials::new("secret");
/// let password = provider.password(&ConnectionConfig::default()).unwrap();
/// assert_eq!(password.as_str(), "secret");
/// ```
#[derive(Clone)]
pub struct StaticCredentials {
    password: Zeroizing<String>,
}

impl StaticCredentials {
    /// Creates a provider that always answers with `password`.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Zeroizing::new(password.into()),
        }
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("password", &"****")
            .finish()
    }
}

impl CredentialProvider for StaticCredentials {
    fn password(&self, _target: &ConnectionConfig) -> Result<Zeroizing<String>> {
        Ok(self.password.clone())
    }
}

//! Backend credential types.
//!
//! Type-safe wrapper for the bearer token returned on login.

use secrecy::{ExposeSecret, SecretString};

/// Bearer token identifying a logged-in user to the cart endpoints.
///
/// The token is redacted from `Debug` output. A session without a token is an
/// anonymous session and has no cart.
#[derive(Debug, Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    /// Wrap a token string.
    ///
    /// Returns `None` for an empty or whitespace-only token, which the
    /// backend would reject anyway.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return None;
        }
        Some(Self(SecretString::from(token)))
    }

    /// Value for an `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }

    /// Expose the raw token.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<SecretString> for AuthToken {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

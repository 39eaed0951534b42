//! Provider-neutral identity types and the lookup trait.

use std::fmt;

// =============================================================================
// PRINCIPAL
// =============================================================================

/// Opaque identifier of a signed-in user (Clerk `user_...` id).
///
/// Never empty: an empty subject means "not signed in" and is rejected by
/// [`PrincipalId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Wrap a raw identifier. Returns `None` for empty or whitespace-only input.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Credentials a request presented for identity resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCredentials {
    session_token: Option<String>,
}

impl SessionCredentials {
    /// Empty tokens are dropped so providers only ever see a real candidate.
    #[must_use]
    pub fn new(session_token: Option<String>) -> Self {
        Self { session_token: session_token.filter(|t| !t.trim().is_empty()) }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("jwks fetch failed: {0}")]
    JwksFetch(String),
    #[error("jwks response invalid: {0}")]
    JwksDecode(String),
    #[error("malformed session token: {0}")]
    MalformedToken(String),
    #[error("no signing key matches kid {0:?}")]
    UnknownKey(Option<String>),
    #[error("session token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("unauthorized party: {0}")]
    UnauthorizedParty(String),
    #[error("session token has no subject")]
    MissingSubject,
}

// =============================================================================
// IDENTITY PROVIDER TRAIT
// =============================================================================

/// Resolve the principal behind a request. Enables mocking in tests.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` means no credentials were presented.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentityError`] if the credentials could not be verified
    /// or the provider could not be reached.
    async fn resolve(&self, credentials: &SessionCredentials) -> Result<Option<PrincipalId>, IdentityError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

//! Identity — resolve the signed-in principal for a request.
//!
//! DESIGN
//! ======
//! Handlers depend on the [`IdentityProvider`] trait object held in
//! `AppState`. Production uses [`clerk::ClerkVerifier`], which verifies
//! Clerk session tokens locally against the instance JWKS. When Clerk is not
//! configured the service falls back to [`AnonymousIdentity`] and every
//! visitor sees the signed-out page.

pub mod clerk;
pub mod types;

pub use types::{IdentityError, IdentityProvider, PrincipalId, SessionCredentials};

/// Provider used when no identity backend is configured.
pub struct AnonymousIdentity;

#[async_trait::async_trait]
impl IdentityProvider for AnonymousIdentity {
    async fn resolve(&self, _credentials: &SessionCredentials) -> Result<Option<PrincipalId>, IdentityError> {
        Ok(None)
    }
}

//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Rendering itself is stateless; the state only carries the identity
//! provider and the optional hosted account portal for navigation redirects.

use std::sync::Arc;

use crate::identity::IdentityProvider;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    /// Base URL of the hosted sign-in/sign-up pages, without trailing slash.
    pub account_portal_url: Option<Arc<str>>,
}

impl AppState {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>, account_portal_url: Option<String>) -> Self {
        Self { identity, account_portal_url: account_portal_url.map(Arc::from) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

//! Viewer extraction — who is looking at the page, if anyone.

use std::convert::Infallible;

use axum::extract::FromRef;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::identity::{PrincipalId, SessionCredentials};
use crate::state::AppState;

/// Cookie Clerk sets on the application's own domain.
pub const SESSION_COOKIE: &str = "__session";

/// Collect the session token from the `__session` cookie, falling back to an
/// `Authorization: Bearer` header (scheme matched case-insensitively).
#[must_use]
pub fn session_credentials(headers: &HeaderMap) -> SessionCredentials {
    let jar = CookieJar::from_headers(headers);
    let from_cookie = jar
        .get(SESSION_COOKIE)
        .map(Cookie::value)
        .filter(|v| !v.is_empty());

    let from_header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|v| !v.is_empty());

    match from_cookie.or(from_header) {
        Some(token) => SessionCredentials::new(Some(token.to_owned())),
        None => SessionCredentials::anonymous(),
    }
}

// =============================================================================
// VIEWER EXTRACTOR
// =============================================================================

/// Optional principal for the current request. Never rejects: a failed
/// lookup is logged and the request continues as signed out.
pub struct Viewer {
    pub principal: Option<PrincipalId>,
}

impl<S> axum::extract::FromRequestParts<S> for Viewer
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let credentials = session_credentials(&parts.headers);
        let app_state = AppState::from_ref(state);

        let principal = match app_state.identity.resolve(&credentials).await {
            Ok(principal) => principal,
            Err(e) => {
                tracing::warn!(error = %e, "identity lookup failed; treating viewer as signed out");
                None
            }
        };

        Ok(Self { principal })
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

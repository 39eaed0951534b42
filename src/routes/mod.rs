//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One page at `/`, a health check, and the two navigation destinations the
//! page links to. Sign-in and sign-up themselves belong to the identity
//! provider: when a hosted account portal is configured those paths redirect
//! to it, otherwise they are not served.

pub mod auth;
pub mod home;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::page::{SIGN_IN_PATH, SIGN_UP_PATH};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home))
        .route(SIGN_IN_PATH, get(sign_in))
        .route(SIGN_UP_PATH, get(sign_up))
        .route("/healthz", get(healthz))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn sign_in(State(state): State<AppState>) -> Response {
    account_portal_redirect(&state, SIGN_IN_PATH)
}

async fn sign_up(State(state): State<AppState>) -> Response {
    account_portal_redirect(&state, SIGN_UP_PATH)
}

fn account_portal_redirect(state: &AppState, path: &str) -> Response {
    match &state.account_portal_url {
        Some(base) => Redirect::temporary(&format!("{base}{path}")).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

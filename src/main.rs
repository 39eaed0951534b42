mod config;
mod identity;
mod page;
mod routes;
mod state;

use std::sync::Arc;

use identity::IdentityProvider;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env is normal outside local development.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::PortalConfig::from_env().expect("invalid configuration");

    // Identity is non-fatal: without Clerk every visitor is anonymous.
    let identity: Arc<dyn IdentityProvider> = match config.clerk {
        Some(clerk) => match identity::clerk::ClerkVerifier::new(clerk) {
            Ok(verifier) => {
                tracing::info!(api_url = %verifier.config().api_url, "clerk identity configured");
                Arc::new(verifier)
            }
            Err(e) => {
                tracing::warn!(error = %e, "clerk identity unavailable — all visitors signed out");
                Arc::new(identity::AnonymousIdentity)
            }
        },
        None => {
            tracing::warn!("CLERK_SECRET_KEY not set — all visitors signed out");
            Arc::new(identity::AnonymousIdentity)
        }
    };

    let state = state::AppState::new(identity, config.account_portal_url);

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "engage portal listening");
    axum::serve(listener, app).await.expect("server failed");
}

//! Clerk session-token verification.
//!
//! ARCHITECTURE
//! ============
//! Clerk issues a short-lived RS256 JWT per browser session (the `__session`
//! cookie). The verifier checks it locally against the instance JWKS, fetched
//! from the Backend API with the secret key, so a page render costs no
//! network round trip once keys are cached.
//!
//! TRADE-OFFS
//! ==========
//! Keys are cached for a TTL and refetched early when a token names an
//! unknown `kid` (key rotation). The `kid` is attacker-controlled, so those
//! early refetches are throttled to one per `jwks_min_refresh_interval`.
//! A failed refresh falls back to the stale set rather than signing every
//! visitor out. Concurrent refreshes may race; every refresh yields a valid
//! set so the last writer simply wins.

use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::types::{IdentityError, IdentityProvider, PrincipalId, SessionCredentials};

pub const DEFAULT_API_URL: &str = "https://api.clerk.com";
pub const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_CLOCK_SKEW_SECS: u64 = 5;
pub const DEFAULT_JWKS_MIN_REFRESH_SECS: u64 = 60;

const JWKS_REQUEST_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClerkConfig {
    /// Backend API secret key (`sk_live_...` / `sk_test_...`).
    pub secret_key: String,
    /// Backend API base URL, without trailing slash.
    pub api_url: String,
    /// Expected `iss` claim. Not checked when `None`.
    pub issuer: Option<String>,
    /// Accepted `azp` origins. Not checked when empty.
    pub authorized_parties: Vec<String>,
    pub jwks_cache_ttl: Duration,
    /// Minimum gap between refetches triggered by an unknown `kid`.
    pub jwks_min_refresh_interval: Duration,
    /// Leeway applied to `exp` and `nbf`.
    pub clock_skew_secs: u64,
}

impl ClerkConfig {
    #[must_use]
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            issuer: None,
            authorized_parties: Vec::new(),
            jwks_cache_ttl: Duration::from_secs(DEFAULT_JWKS_CACHE_TTL_SECS),
            jwks_min_refresh_interval: Duration::from_secs(DEFAULT_JWKS_MIN_REFRESH_SECS),
            clock_skew_secs: DEFAULT_CLOCK_SKEW_SECS,
        }
    }

    #[must_use]
    pub fn jwks_url(&self) -> String {
        format!("{}/v1/jwks", self.api_url)
    }
}

// =============================================================================
// CLAIMS
// =============================================================================

/// The session-token claims read after signature and time validation.
#[derive(Debug, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub sid: Option<String>,
    pub iss: Option<String>,
    pub azp: Option<String>,
}

// =============================================================================
// VERIFIER
// =============================================================================

struct CachedKeys {
    set: JwkSet,
    fetched_at: Instant,
    /// Set when the last refresh was caused by, or ended in, a `kid` miss.
    miss_refreshed_at: Option<Instant>,
}

impl CachedKeys {
    fn miss_refresh_throttled(&self, interval: Duration) -> bool {
        self.miss_refreshed_at.is_some_and(|at| at.elapsed() < interval)
    }
}

pub struct ClerkVerifier {
    config: ClerkConfig,
    http: reqwest::Client,
    keys: RwLock<Option<CachedKeys>>,
}

impl ClerkVerifier {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClerkConfig) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(JWKS_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| IdentityError::JwksFetch(e.to_string()))?;
        Ok(Self { config, http, keys: RwLock::new(None) })
    }

    #[must_use]
    pub fn config(&self) -> &ClerkConfig {
        &self.config
    }

    async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, IdentityError> {
        let mut kid_miss = false;
        {
            let cached = self.keys.read().await;
            if let Some(cached) = cached.as_ref() {
                if cached.fetched_at.elapsed() < self.config.jwks_cache_ttl {
                    match select_key(&cached.set, kid) {
                        Ok(key) => return Ok(key),
                        Err(e) if cached.miss_refresh_throttled(self.config.jwks_min_refresh_interval) => {
                            return Err(e);
                        }
                        Err(_) => kid_miss = true,
                    }
                }
            }
        }

        let set = match self.fetch_jwks().await {
            Ok(set) => set,
            Err(e) => {
                if kid_miss {
                    if let Some(cached) = self.keys.write().await.as_mut() {
                        cached.miss_refreshed_at = Some(Instant::now());
                    }
                }
                return self.stale_key(kid, e).await;
            }
        };
        let key = select_key(&set, kid);
        let now = Instant::now();
        let miss_refreshed_at = (kid_miss || key.is_err()).then_some(now);
        *self.keys.write().await = Some(CachedKeys { set, fetched_at: now, miss_refreshed_at });
        key
    }

    /// Serve a key from an expired cache when the refresh itself failed.
    async fn stale_key(&self, kid: Option<&str>, error: IdentityError) -> Result<DecodingKey, IdentityError> {
        let cached = self.keys.read().await;
        match cached.as_ref().map(|c| select_key(&c.set, kid)) {
            Some(Ok(key)) => {
                tracing::warn!(error = %error, "clerk jwks refresh failed; serving stale keys");
                Ok(key)
            }
            _ => Err(error),
        }
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, IdentityError> {
        let resp = self
            .http
            .get(self.config.jwks_url())
            .bearer_auth(&self.config.secret_key)
            .send()
            .await
            .map_err(|e| IdentityError::JwksFetch(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(IdentityError::JwksFetch(format!("{status}: {body}")));
        }

        let set = resp
            .json::<JwkSet>()
            .await
            .map_err(|e| IdentityError::JwksDecode(e.to_string()))?;
        tracing::debug!(keys = set.keys.len(), "clerk jwks refreshed");
        Ok(set)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for ClerkVerifier {
    async fn resolve(&self, credentials: &SessionCredentials) -> Result<Option<PrincipalId>, IdentityError> {
        let Some(token) = credentials.session_token() else {
            return Ok(None);
        };

        let header = jsonwebtoken::decode_header(token).map_err(|e| IdentityError::MalformedToken(e.to_string()))?;
        let key = self.decoding_key(header.kid.as_deref()).await?;
        let claims = verify_token(token, &key, &self.config)?;
        tracing::debug!(sub = %claims.sub, sid = ?claims.sid, iss = ?claims.iss, "clerk session verified");

        PrincipalId::new(claims.sub)
            .map(Some)
            .ok_or(IdentityError::MissingSubject)
    }
}

// =============================================================================
// VERIFICATION
// =============================================================================

/// Pick the signing key for a token header's `kid`.
///
/// A token without `kid` is accepted only when the set holds a single key.
pub(crate) fn select_key(set: &JwkSet, kid: Option<&str>) -> Result<DecodingKey, IdentityError> {
    let jwk = match kid {
        Some(kid) => set.find(kid),
        None if set.keys.len() == 1 => set.keys.first(),
        None => None,
    }
    .ok_or_else(|| IdentityError::UnknownKey(kid.map(str::to_owned)))?;

    Ok(DecodingKey::from_jwk(jwk)?)
}

/// Check signature, `exp`/`nbf` (with leeway), issuer and authorized party.
pub(crate) fn verify_token(token: &str, key: &DecodingKey, config: &ClerkConfig) -> Result<SessionClaims, IdentityError> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.leeway = config.clock_skew_secs;
    validation.validate_nbf = true;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp", "sub"]);
    if let Some(issuer) = &config.issuer {
        validation.set_issuer(&[issuer]);
    }

    let claims = jsonwebtoken::decode::<SessionClaims>(token, key, &validation)?.claims;

    if let Some(azp) = &claims.azp {
        if !config.authorized_parties.is_empty() && !config.authorized_parties.iter().any(|p| p == azp) {
            return Err(IdentityError::UnauthorizedParty(azp.clone()));
        }
    }

    Ok(claims)
}

#[cfg(test)]
#[path = "clerk_test.rs"]
mod tests;

//! Portal configuration parsed from environment variables.

use std::time::Duration;

use crate::identity::clerk::{
    ClerkConfig, DEFAULT_CLOCK_SKEW_SECS, DEFAULT_JWKS_CACHE_TTL_SECS, DEFAULT_JWKS_MIN_REFRESH_SECS,
};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub port: u16,
    /// `None` when `CLERK_SECRET_KEY` is unset; identity is then disabled.
    pub clerk: Option<ClerkConfig>,
    /// Hosted Clerk account portal. `/sign-in` and `/sign-up` redirect here.
    pub account_portal_url: Option<String>,
}

impl PortalConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `CLERK_SECRET_KEY`: identity disabled when absent
    /// - `CLERK_API_URL`: default `https://api.clerk.com`
    /// - `CLERK_JWT_ISSUER`: expected `iss` claim
    /// - `CLERK_AUTHORIZED_PARTIES`: comma-separated accepted `azp` origins
    /// - `CLERK_JWKS_CACHE_TTL_SECS`: default 3600
    /// - `CLERK_JWKS_MIN_REFRESH_SECS`: default 60
    /// - `CLERK_CLOCK_SKEW_SECS`: default 5
    /// - `CLERK_ACCOUNT_PORTAL_URL`: hosted sign-in/sign-up pages
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PortalConfig::from_env`] with an explicit variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| non_empty(lookup(key));

        let port = parse_or(var("PORT"), "PORT", DEFAULT_PORT)?;

        let clerk = match var("CLERK_SECRET_KEY") {
            Some(secret_key) => {
                let defaults = ClerkConfig::new(secret_key);
                Some(ClerkConfig {
                    api_url: var("CLERK_API_URL").map_or(defaults.api_url.clone(), |url| trim_url(&url)),
                    issuer: var("CLERK_JWT_ISSUER"),
                    authorized_parties: var("CLERK_AUTHORIZED_PARTIES")
                        .map(|raw| parse_list(&raw))
                        .unwrap_or_default(),
                    jwks_cache_ttl: Duration::from_secs(parse_or(
                        var("CLERK_JWKS_CACHE_TTL_SECS"),
                        "CLERK_JWKS_CACHE_TTL_SECS",
                        DEFAULT_JWKS_CACHE_TTL_SECS,
                    )?),
                    jwks_min_refresh_interval: Duration::from_secs(parse_or(
                        var("CLERK_JWKS_MIN_REFRESH_SECS"),
                        "CLERK_JWKS_MIN_REFRESH_SECS",
                        DEFAULT_JWKS_MIN_REFRESH_SECS,
                    )?),
                    clock_skew_secs: parse_or(
                        var("CLERK_CLOCK_SKEW_SECS"),
                        "CLERK_CLOCK_SKEW_SECS",
                        DEFAULT_CLOCK_SKEW_SECS,
                    )?,
                    ..defaults
                })
            }
            None => None,
        };

        let account_portal_url = var("CLERK_ACCOUNT_PORTAL_URL").map(|url| trim_url(&url));

        Ok(Self { port, clerk, account_portal_url })
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn trim_url(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(trim_url)
        .collect()
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key: key.to_string(), value }),
        None => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

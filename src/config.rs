//! Gateway configuration loaded from the environment.

use crate::types::SigningKey;
use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use url::Url;

/// Default lifetime for minted public interview tokens (24 hours).
pub const DEFAULT_PUBLIC_TOKEN_TTL_SECONDS: u64 = 86_400;

/// Runtime configuration for the gateway.
///
/// The signing key is carried here as an explicit value rather than read
/// from the environment at verification time, so tests can run with
/// distinct keys and no process-wide side effects.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind address for the HTTP server.
    pub bind: SocketAddr,
    /// Supabase project URL, e.g. `https://xyzcompany.supabase.co`.
    pub supabase_url: Url,
    /// Supabase anonymous API key, sent as the `apikey` header.
    pub supabase_anon_key: String,
    /// Symmetric key that signs and verifies scoped interview tokens.
    pub signing_key: SigningKey,
    /// Lifetime of minted public interview tokens, in seconds.
    pub public_token_ttl_seconds: u64,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required: `SUPABASE_URL`, `SUPABASE_ANON_KEY`,
    /// `SUPABASE_JWT_SIGNING_KEY`. Optional: `BIND` (default
    /// `0.0.0.0:8080`), `PUBLIC_TOKEN_TTL_SECONDS` (default 24h).
    pub fn from_env() -> Result<Self> {
        let bind = env::var("BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("BIND must be a socket address, e.g. 0.0.0.0:8080")?;

        let supabase_url = env::var("SUPABASE_URL")
            .context("SUPABASE_URL is not set")?
            .parse::<Url>()
            .context("SUPABASE_URL is not a valid URL")?;

        let supabase_anon_key =
            env::var("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY is not set")?;

        let signing_key = env::var("SUPABASE_JWT_SIGNING_KEY")
            .context("SUPABASE_JWT_SIGNING_KEY is not set")?;

        let public_token_ttl_seconds = match env::var("PUBLIC_TOKEN_TTL_SECONDS") {
            Ok(raw) => raw
                .parse()
                .context("PUBLIC_TOKEN_TTL_SECONDS must be an integer number of seconds")?,
            Err(_) => DEFAULT_PUBLIC_TOKEN_TTL_SECONDS,
        };

        Ok(Self {
            bind,
            supabase_url,
            supabase_anon_key,
            signing_key: SigningKey::new(signing_key),
            public_token_ttl_seconds,
        })
    }

    /// Base URL of the Supabase Auth API (`/auth/v1`).
    pub fn auth_base(&self) -> Result<Url> {
        self.supabase_url
            .join("auth/v1/")
            .context("could not derive auth API URL from SUPABASE_URL")
    }

    /// Base URL of the PostgREST data API (`/rest/v1`).
    pub fn rest_base(&self) -> Result<Url> {
        self.supabase_url
            .join("rest/v1/")
            .context("could not derive REST API URL from SUPABASE_URL")
    }
}

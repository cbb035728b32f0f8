//! Shared application state for the router and the auth dispatcher.

use crate::auth::{IdentityVerifier, TierAuthorizer};
use crate::config::GatewayConfig;
use crate::supabase::{ScopedClientFactory, SubscriptionTiers, SupabaseIdentity};
use crate::tokens::PublicTokenIssuer;
use crate::types::SigningKey;
use std::sync::Arc;

/// Everything the request pipeline needs, cheap to clone per request.
///
/// The delegated collaborators are trait objects so tests can swap in mocks;
/// production wiring uses the Supabase-backed implementations.
#[derive(Clone)]
pub struct AppState {
    /// Symmetric key for verifying scoped interview tokens.
    pub signing_key: SigningKey,
    /// Delegated identity verification (Supabase Auth in production).
    pub identity: Arc<dyn IdentityVerifier>,
    /// Delegated subscription-tier authorization.
    pub tiers: Arc<dyn TierAuthorizer>,
    /// Factory for per-request data clients under row-level policy.
    pub scoped_clients: ScopedClientFactory,
    /// Mints public interview tokens.
    pub issuer: Arc<PublicTokenIssuer>,
}

impl AppState {
    /// Wire up production collaborators from configuration.
    pub fn from_config(config: &GatewayConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::new();

        let scoped_clients = ScopedClientFactory::new(
            http.clone(),
            config.rest_base()?,
            config.supabase_anon_key.clone(),
        );
        let identity = SupabaseIdentity::new(
            http,
            &config.auth_base()?,
            config.supabase_anon_key.clone(),
        )?;
        let tiers = SubscriptionTiers::new(scoped_clients.clone());
        let issuer = PublicTokenIssuer::new(&config.signing_key, config.public_token_ttl_seconds);

        Ok(Self {
            signing_key: config.signing_key.clone(),
            identity: Arc::new(identity),
            tiers: Arc::new(tiers),
            scoped_clients,
            issuer: Arc::new(issuer),
        })
    }
}

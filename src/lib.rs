// Core modules
mod config;
mod state;
mod types;

pub mod api;
pub mod auth;
pub mod supabase;
pub mod tokens;

// Re-export key types and functions
pub use api::create_router;
pub use auth::{AuthError, RequestIdentity, TokenClass, flexible_auth};
pub use config::{DEFAULT_PUBLIC_TOKEN_TTL_SECONDS, GatewayConfig};
pub use state::AppState;
pub use supabase::{ScopedClient, ScopedClientFactory, SubscriptionTiers, SupabaseIdentity};
pub use tokens::PublicTokenIssuer;
pub use types::{RoleName, SigningKey, SubjectId};

use anyhow::Result;
use axum::Router;

/// Convenience function to create a fully wired gateway router.
///
/// Builds the Supabase-backed collaborators from configuration and mounts
/// the protected API behind the flexible auth dispatcher.
pub fn create_app(config: &GatewayConfig) -> Result<Router> {
    let state = AppState::from_config(config)?;
    Ok(create_router(state))
}

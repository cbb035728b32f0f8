//! Seams for the delegated verification chain.
//!
//! Provider-issued tokens are not verified here: the dispatcher routes them
//! into these two collaborators, in order, and defers fully to their
//! responses. Their failure semantics are their own; the dispatcher never
//! reinterprets or translates them. Trait objects so tests can substitute
//! recording mocks for the Supabase-backed implementations.

use crate::auth::RequestIdentity;
use async_trait::async_trait;
use axum::response::Response;

/// Validates a bearer token against the identity provider.
///
/// On success, returns the provider's notion of the verified identity; the
/// dispatcher attaches it to the request. On failure, returns the
/// collaborator's own terminal response (typically an unauthenticated-style
/// 401, or a 503 when the provider is unreachable), which the dispatcher
/// propagates verbatim.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<RequestIdentity, Response>;
}

/// Authorizes the identity just established against its subscription tier.
///
/// Runs only after [`IdentityVerifier`] succeeds, with the same raw token so
/// the implementation can query under the caller's own credentials. May
/// reject with an authorization-style response (the only place a 403 can
/// come from in this chain), or return to let the request proceed.
#[async_trait]
pub trait TierAuthorizer: Send + Sync {
    async fn authorize(&self, identity: &RequestIdentity, token: &str) -> Result<(), Response>;
}

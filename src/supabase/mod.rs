//! Supabase-facing collaborators.
//!
//! Everything that talks to the Supabase project lives here: the PostgREST
//! data client bound to a caller's token (so row-level policy applies to
//! every query), the identity verifier that delegates provider tokens to
//! Supabase Auth, and the subscription-tier authorizer.

mod client;
mod identity;
mod tiers;

pub use client::{DataError, ScopedClient, ScopedClientFactory};
pub use identity::SupabaseIdentity;
pub use tiers::SubscriptionTiers;

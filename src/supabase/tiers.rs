//! Subscription-tier authorization for provider-authenticated callers.

use crate::auth::{RejectionBody, RequestIdentity, TierAuthorizer};
use crate::supabase::client::ScopedClientFactory;
use async_trait::async_trait;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

/// [`TierAuthorizer`] that reads the caller's `subscription_tier` from their
/// `profiles` row.
///
/// The lookup runs through a [`ScopedClientFactory`] binding under the
/// caller's own token, so row-level policy guarantees a caller can only ever
/// read their own profile. A missing profile or empty tier rejects with 403
/// — the one place in the chain that emits authorization-style failures.
#[derive(Debug, Clone)]
pub struct SubscriptionTiers {
    clients: ScopedClientFactory,
}

impl SubscriptionTiers {
    pub fn new(clients: ScopedClientFactory) -> Self {
        Self { clients }
    }

    fn forbidden() -> Response {
        (
            StatusCode::FORBIDDEN,
            Json(RejectionBody::new("Subscription required")),
        )
            .into_response()
    }

    fn unavailable() -> Response {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(RejectionBody::new("Authorization service unavailable")),
        )
            .into_response()
    }
}

#[async_trait]
impl TierAuthorizer for SubscriptionTiers {
    async fn authorize(&self, identity: &RequestIdentity, token: &str) -> Result<(), Response> {
        let client = self.clients.bind(token);
        let filter = format!("eq.{}", identity.id);

        let rows = client
            .select("profiles", "subscription_tier", &[("id", &filter)])
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %identity.id, "profile lookup failed");
                Self::unavailable()
            })?;

        let tier = rows
            .first()
            .and_then(|row| row.get("subscription_tier"))
            .and_then(|v| v.as_str())
            .unwrap_or("");

        if tier.is_empty() {
            debug!(user_id = %identity.id, "no subscription tier on profile");
            return Err(Self::forbidden());
        }

        debug!(user_id = %identity.id, tier = %tier, "tier authorized");
        Ok(())
    }
}

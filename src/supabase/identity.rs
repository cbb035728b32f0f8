//! Provider-token verification through Supabase Auth.

use crate::auth::{IdentityVerifier, RejectionBody, RequestIdentity};
use async_trait::async_trait;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// Shape of `GET /auth/v1/user` we care about.
#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// [`IdentityVerifier`] backed by the Supabase Auth API.
///
/// Asks the provider whether the token is valid instead of checking a
/// signature locally. Owns its failure semantics: invalid tokens get a 401,
/// an unreachable provider gets a 503, both with the standard rejection
/// body.
#[derive(Debug, Clone)]
pub struct SupabaseIdentity {
    http: reqwest::Client,
    user_endpoint: Url,
    anon_key: String,
}

impl SupabaseIdentity {
    /// `auth_base` is the Supabase Auth API base, e.g.
    /// `https://project.supabase.co/auth/v1/`.
    pub fn new(
        http: reqwest::Client,
        auth_base: &Url,
        anon_key: impl Into<String>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http,
            user_endpoint: auth_base.join("user")?,
            anon_key: anon_key.into(),
        })
    }

    fn unavailable() -> Response {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(RejectionBody::new("Authentication service unavailable")),
        )
            .into_response()
    }

    fn unauthenticated() -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(RejectionBody::new("Invalid or expired token")),
        )
            .into_response()
    }
}

#[async_trait]
impl IdentityVerifier for SupabaseIdentity {
    async fn verify(&self, token: &str) -> Result<RequestIdentity, Response> {
        let response = self
            .http
            .get(self.user_endpoint.clone())
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "identity provider unreachable");
                Self::unavailable()
            })?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "provider rejected token");
            return Err(Self::unauthenticated());
        }

        let user: SupabaseUser = response.json().await.map_err(|e| {
            warn!(error = %e, "provider returned an unparseable user payload");
            Self::unavailable()
        })?;

        debug!(user_id = %user.id, "provider token verified");

        Ok(RequestIdentity::new(
            user.id,
            user.email,
            user.role.unwrap_or_else(|| "authenticated".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_endpoint_derivation() {
        let base: Url = "https://example.supabase.co/auth/v1/".parse().unwrap();
        let verifier = SupabaseIdentity::new(reqwest::Client::new(), &base, "anon").unwrap();
        assert_eq!(
            verifier.user_endpoint.as_str(),
            "https://example.supabase.co/auth/v1/user"
        );
    }

    #[test]
    fn test_user_payload_deserialization() {
        let json = r#"{"id":"u1","email":"a@b.c","role":"authenticated","aud":"ignored"}"#;
        let user: SupabaseUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.email.as_deref(), Some("a@b.c"));
        assert_eq!(user.role.as_deref(), Some("authenticated"));
    }

    #[test]
    fn test_user_payload_minimal() {
        let user: SupabaseUser = serde_json::from_str(r#"{"id":"u1"}"#).unwrap();
        assert!(user.email.is_none());
        assert!(user.role.is_none());
    }

    #[tokio::test]
    async fn test_rejection_statuses() {
        assert_eq!(
            SupabaseIdentity::unauthenticated().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            SupabaseIdentity::unavailable().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}

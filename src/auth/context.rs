//! Request-scoped identity for authenticated callers.

use crate::auth::verifier::ScopedAccessClaims;
use crate::auth::{AuthError, PUBLIC_INTERVIEWEE_ROLE};
use crate::types::{RoleName, SubjectId};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

/// The verified principal for the current request.
///
/// Created fresh per request by whichever verification path succeeded,
/// attached to the request extensions, read by handlers, and discarded when
/// the request ends. Never persisted or shared across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestIdentity {
    /// Subject id. Empty string when the token carried no `sub`, so
    /// handlers can assume presence.
    pub id: SubjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: RoleName,
}

impl RequestIdentity {
    pub fn new(id: impl Into<SubjectId>, email: Option<String>, role: impl Into<RoleName>) -> Self {
        Self {
            id: id.into(),
            email,
            role: role.into(),
        }
    }

    /// Build the identity for a verified scoped-access grant.
    ///
    /// `sub` defaults to the empty string — the identity never carries an
    /// absent id.
    pub fn from_scoped_claims(claims: &ScopedAccessClaims) -> Self {
        Self {
            id: SubjectId::new(claims.sub.clone().unwrap_or_default()),
            email: claims.email.clone(),
            role: RoleName::new(PUBLIC_INTERVIEWEE_ROLE),
        }
    }

    /// Whether this principal is an anonymous public interviewee.
    pub fn is_public_interviewee(&self) -> bool {
        self.role.as_str() == PUBLIC_INTERVIEWEE_ROLE
    }
}

/// Extract the identity the auth middleware injected into extensions.
///
/// Rejects with 401 if no identity is present (middleware didn't run or the
/// route is wired outside the protected surface).
impl<S: Send + Sync> FromRequestParts<S> for RequestIdentity {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .ok_or(AuthError::AuthMissing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped_claims(sub: Option<&str>, email: Option<&str>) -> ScopedAccessClaims {
        ScopedAccessClaims {
            sub: sub.map(str::to_string),
            email: email.map(str::to_string),
            role: Some(PUBLIC_INTERVIEWEE_ROLE.to_string()),
            interview_id: None,
            exp: 0,
            nbf: None,
            iat: None,
        }
    }

    #[test]
    fn test_identity_from_claims() {
        let identity =
            RequestIdentity::from_scoped_claims(&scoped_claims(Some("u1"), Some("a@b.c")));
        assert_eq!(identity.id.as_str(), "u1");
        assert_eq!(identity.email.as_deref(), Some("a@b.c"));
        assert_eq!(identity.role.as_str(), "public_interviewee");
        assert!(identity.is_public_interviewee());
    }

    #[test]
    fn test_missing_sub_defaults_to_empty() {
        let identity = RequestIdentity::from_scoped_claims(&scoped_claims(None, None));
        assert_eq!(identity.id.as_str(), "");
        assert!(identity.email.is_none());
    }

    #[test]
    fn test_serialization_omits_absent_email() {
        let identity = RequestIdentity::from_scoped_claims(&scoped_claims(Some("u1"), None));
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["id"], "u1");
        assert_eq!(json["role"], "public_interviewee");
        assert!(json.get("email").is_none());
    }
}

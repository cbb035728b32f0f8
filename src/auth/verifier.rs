//! Local verification of scoped interview tokens.

use super::AuthError;
use crate::types::SigningKey;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role claim that marks a token as a scoped public-interview grant.
pub const PUBLIC_INTERVIEWEE_ROLE: &str = "public_interviewee";

/// Payload of a locally-issued scoped token.
///
/// Trusted only after [`verify_scoped`] succeeds; until then this is
/// attacker-controlled data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopedAccessClaims {
    /// Anonymous respondent id. Optional in the wire format; the request
    /// identity substitutes an empty string when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Role marker; `"public_interviewee"` selects the scoped branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// The single interview session this grant is scoped to. Enforced by
    /// row-level policy in the data store, not by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_id: Option<Uuid>,
    /// Expiry, seconds since the Unix epoch. Required.
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

impl ScopedAccessClaims {
    /// Whether the verified role marks this as a scoped public-interview
    /// grant.
    pub fn is_public_interviewee(&self) -> bool {
        self.role.as_deref() == Some(PUBLIC_INTERVIEWEE_ROLE)
    }
}

/// Verify a token's signature and temporal claims against the gateway
/// signing key.
///
/// The allowed-algorithm set is the fixed singleton {HS256}; it is never
/// derived from the token's own header. Expiry failures are distinguished
/// ([`AuthError::TokenExpired`]) from every other failure
/// ([`AuthError::TokenInvalid`]); both are terminal, with no fallback to the
/// delegated path.
pub fn verify_scoped(token: &str, key: &SigningKey) -> Result<ScopedAccessClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_nbf = true;
    // Scoped tokens carry no audience.
    validation.validate_aud = false;

    let data = decode::<ScopedAccessClaims>(
        token,
        &DecodingKey::from_secret(key.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    })?;

    Ok(data.claims)
}

//! Issuance of scoped public-interview tokens.
//!
//! The dispatcher's local verification path needs a producer: when a company
//! user shares an interview publicly, the gateway mints a short-lived HS256
//! token carrying the `public_interviewee` role and the interview id, signed
//! with the same process-wide key the verifier checks against.

use crate::auth::{PUBLIC_INTERVIEWEE_ROLE, ScopedAccessClaims};
use crate::types::SigningKey;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use std::fmt;
use uuid::Uuid;

/// Signing failure while minting a token.
#[derive(Debug)]
pub struct IssueError(jsonwebtoken::errors::Error);

impl fmt::Display for IssueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to sign public interview token: {}", self.0)
    }
}

impl std::error::Error for IssueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Mints scoped HS256 grants for public interview sessions.
#[derive(Clone)]
pub struct PublicTokenIssuer {
    encoding_key: EncodingKey,
    ttl_seconds: u64,
}

impl fmt::Debug for PublicTokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("PublicTokenIssuer")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl PublicTokenIssuer {
    pub fn new(key: &SigningKey, ttl_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Mint a token granting anonymous access to one interview session.
    ///
    /// Each mint gets a fresh anonymous respondent id as its subject; two
    /// tokens for the same interview never share an identity.
    pub fn issue(&self, interview_id: Uuid) -> Result<String, IssueError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = ScopedAccessClaims {
            sub: Some(Uuid::new_v4().to_string()),
            email: None,
            role: Some(PUBLIC_INTERVIEWEE_ROLE.to_string()),
            interview_id: Some(interview_id),
            exp: now + self.ttl_seconds,
            nbf: None,
            iat: Some(now),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(IssueError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{TokenClass, classify, verify_scoped};

    #[test]
    fn test_minted_token_classifies_local() {
        let key = SigningKey::new("k1");
        let issuer = PublicTokenIssuer::new(&key, 3600);
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        assert_eq!(classify(&token).unwrap(), TokenClass::LocalScoped);
    }

    #[test]
    fn test_minted_token_verifies_with_same_key() {
        let key = SigningKey::new("k1");
        let issuer = PublicTokenIssuer::new(&key, 3600);
        let interview_id = Uuid::new_v4();
        let token = issuer.issue(interview_id).unwrap();

        let claims = verify_scoped(&token, &key).unwrap();
        assert!(claims.is_public_interviewee());
        assert_eq!(claims.interview_id, Some(interview_id));
        assert!(claims.sub.is_some());
    }

    #[test]
    fn test_minted_token_rejected_under_other_key() {
        let issuer = PublicTokenIssuer::new(&SigningKey::new("k1"), 3600);
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        assert!(verify_scoped(&token, &SigningKey::new("k2")).is_err());
    }

    #[test]
    fn test_subjects_are_unique_per_mint() {
        let key = SigningKey::new("k1");
        let issuer = PublicTokenIssuer::new(&key, 3600);
        let interview_id = Uuid::new_v4();

        let a = verify_scoped(&issuer.issue(interview_id).unwrap(), &key).unwrap();
        let b = verify_scoped(&issuer.issue(interview_id).unwrap(), &key).unwrap();
        assert_ne!(a.sub, b.sub);
    }

    #[test]
    fn test_expiry_honors_ttl() {
        let key = SigningKey::new("k1");
        let issuer = PublicTokenIssuer::new(&key, 1234);
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        let claims = verify_scoped(&token, &key).unwrap();
        let now = chrono::Utc::now().timestamp() as u64;
        assert!(claims.exp >= now + 1230 && claims.exp <= now + 1234);
    }
}

//! Flexible authentication for the protected API surface.
//!
//! Two structurally different bearer-token classes arrive on the same
//! `Authorization` header, and callers do not say which one they hold:
//!
//! - **Provider tokens**: issued by Supabase Auth (ES256/RS256 and friends),
//!   verified by asking the provider.
//! - **Scoped interview tokens**: locally-signed HS256 grants that give an
//!   anonymous respondent access to a single public interview session.
//!
//! The pipeline runs strictly left to right with no backtracking:
//! classify → verify → build-context-or-delegate.
//!
//! ## Security model
//!
//! - The token header is untrusted input; it selects a verification path and
//!   nothing else. Only the exact algorithm value `"HS256"` routes to local
//!   verification — every other value, including crafted ones, falls through
//!   to provider verification, so a forged header cannot reach the local
//!   path without also holding the signing key.
//! - Local verification runs with a fixed singleton allowed-algorithm set,
//!   never one derived from the token, so algorithm confusion is
//!   structurally impossible.
//! - Every rejection at this layer is a 401; tier-based 403s belong to the
//!   subscription collaborator.

mod classifier;
mod context;
mod delegate;
mod dispatcher;
mod verifier;

pub use classifier::{LOCAL_ALGORITHM, TokenClass, bearer_token, classify};
pub use context::RequestIdentity;
pub use delegate::{IdentityVerifier, TierAuthorizer};
pub use dispatcher::flexible_auth;
pub use verifier::{PUBLIC_INTERVIEWEE_ROLE, ScopedAccessClaims, verify_scoped};

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authentication failures local to the dispatcher.
///
/// All variants are terminal for the current request and map to 401.
/// Failures on the delegated path are owned by the collaborators and never
/// appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Header absent or not using the Bearer scheme
    AuthMissing,
    /// Wrong segment count, or header segment not decodable/parseable
    TokenMalformed,
    /// Local verification found the validity window has passed
    TokenExpired,
    /// Local signature verification failed for any other reason
    TokenInvalid,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthMissing => write!(f, "Missing or invalid authorization header"),
            Self::TokenMalformed => write!(f, "Invalid token format"),
            Self::TokenExpired => write!(f, "Token expired"),
            Self::TokenInvalid => write!(f, "Invalid token"),
        }
    }
}

impl std::error::Error for AuthError {}

/// JSON body for rejected requests: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RejectionBody {
    pub success: bool,
    pub error: String,
}

impl RejectionBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(RejectionBody::new(self.to_string())),
        )
            .into_response()
    }
}

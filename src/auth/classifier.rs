//! Token extraction, structural validation, and trust-domain routing.
//!
//! Nothing in this module verifies anything. The decoded header is untrusted
//! input and is used exclusively to pick a verification path.

use super::AuthError;
use axum::http::{HeaderMap, header};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

/// The one algorithm that routes to local verification. Exact match only —
/// `hs256`, typos, and absent values all go to the provider path.
pub const LOCAL_ALGORITHM: &str = "HS256";

/// Trust domain of a structurally valid token, decided exactly once.
///
/// Downstream steps pattern-match on this tag instead of re-inspecting the
/// raw header, so the trust domain cannot be re-decided inconsistently later
/// in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Locally-signed HS256 token; verify with the gateway signing key.
    LocalScoped,
    /// Everything else; hand to the provider verification chain.
    Delegated,
}

/// Decoded-but-unverified JWT header. Only `alg` matters here.
#[derive(Debug, Deserialize)]
struct RawHeader {
    #[serde(default)]
    alg: Option<String>,
}

/// Pull the bearer token out of the `Authorization` header.
///
/// Absent header, non-UTF-8 value, or any scheme other than the literal
/// `Bearer ` prefix rejects with [`AuthError::AuthMissing`]. No verification
/// of any kind is attempted for such requests.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::AuthMissing)
}

/// Classify a bearer token into its trust domain.
///
/// The segment count is checked before any decode attempt, so garbage input
/// never reaches the base64 or JSON layers. Decode or parse failure of the
/// header segment is [`AuthError::TokenMalformed`].
pub fn classify(token: &str) -> Result<TokenClass, AuthError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::TokenMalformed);
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(segments[0])
        .map_err(|_| AuthError::TokenMalformed)?;
    let raw: RawHeader =
        serde_json::from_slice(&header_bytes).map_err(|_| AuthError::TokenMalformed)?;

    // Closed allow-check on one exact value, not a deny-list: unrecognized
    // or attacker-chosen algorithm values always fall through to delegated
    // verification, never to the self-verified path.
    match raw.alg.as_deref() {
        Some(LOCAL_ALGORITHM) => Ok(TokenClass::LocalScoped),
        _ => Ok(TokenClass::Delegated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    /// Build `header.payload.sig` with an arbitrary JSON header segment.
    fn token_with_header(header_json: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode(r#"{"sub":"u1"}"#),
            URL_SAFE_NO_PAD.encode("sig")
        )
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_rejected() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers).unwrap_err(), AuthError::AuthMissing);
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&headers).unwrap_err(), AuthError::AuthMissing);
    }

    #[test]
    fn test_lowercase_scheme_rejected() {
        let headers = headers_with_auth("bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap_err(), AuthError::AuthMissing);
    }

    #[test]
    fn test_two_segments_malformed() {
        assert_eq!(
            classify("abc.def").unwrap_err(),
            AuthError::TokenMalformed
        );
    }

    #[test]
    fn test_four_segments_malformed() {
        assert_eq!(
            classify("a.b.c.d").unwrap_err(),
            AuthError::TokenMalformed
        );
    }

    #[test]
    fn test_undecodable_header_malformed() {
        assert_eq!(
            classify("!!not-base64!!.payload.sig").unwrap_err(),
            AuthError::TokenMalformed
        );
    }

    #[test]
    fn test_non_json_header_malformed() {
        let token = format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode("not json"),
            URL_SAFE_NO_PAD.encode("{}"),
            URL_SAFE_NO_PAD.encode("sig")
        );
        assert_eq!(classify(&token).unwrap_err(), AuthError::TokenMalformed);
    }

    #[test]
    fn test_hs256_routes_local() {
        let token = token_with_header(r#"{"alg":"HS256"}"#);
        assert_eq!(classify(&token).unwrap(), TokenClass::LocalScoped);
    }

    #[test]
    fn test_es256_routes_delegated() {
        let token = token_with_header(r#"{"alg":"ES256"}"#);
        assert_eq!(classify(&token).unwrap(), TokenClass::Delegated);
    }

    #[test]
    fn test_rs256_routes_delegated() {
        let token = token_with_header(r#"{"alg":"RS256","kid":"key-1"}"#);
        assert_eq!(classify(&token).unwrap(), TokenClass::Delegated);
    }

    #[test]
    fn test_lowercase_hs256_routes_delegated() {
        // Case variance never reaches the local path.
        let token = token_with_header(r#"{"alg":"hs256"}"#);
        assert_eq!(classify(&token).unwrap(), TokenClass::Delegated);
    }

    #[test]
    fn test_absent_alg_routes_delegated() {
        let token = token_with_header(r#"{"typ":"JWT"}"#);
        assert_eq!(classify(&token).unwrap(), TokenClass::Delegated);
    }

    #[test]
    fn test_null_alg_routes_delegated() {
        let token = token_with_header(r#"{"alg":null}"#);
        assert_eq!(classify(&token).unwrap(), TokenClass::Delegated);
    }
}

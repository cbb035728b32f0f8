//! NewType wrappers for strong typing throughout the gateway.
//!
//! These types prevent accidental mixing of semantically different strings
//! (e.g., passing a raw bearer token where a subject id is expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a NewType wrapper with standard trait implementations.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

newtype_string!(
    /// Subject identifier of the verified principal (the JWT `sub` claim).
    ///
    /// For provider-issued tokens this is the Supabase user id; for scoped
    /// interview tokens it is the anonymous respondent id minted at issuance.
    /// An empty string means the claim was absent — downstream code can rely
    /// on the value being present, never on an Option.
    SubjectId
);

newtype_string!(
    /// Role of the verified principal (the JWT `role` claim).
    ///
    /// Common values: "authenticated" (provider tokens) and
    /// "public_interviewee" (scoped interview tokens).
    RoleName
);

/// Process-wide symmetric signing key for scoped interview tokens.
///
/// Wraps the raw secret so it cannot be printed accidentally: the `Debug`
/// impl is redacted. Injected through [`crate::GatewayConfig`], never read
/// from ambient global state.
#[derive(Clone)]
pub struct SigningKey(String);

impl SigningKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw key bytes for the jsonwebtoken encoding/decoding keys.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.write_str("SigningKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_id_creation() {
        let id = SubjectId::new("u1");
        assert_eq!(id.as_str(), "u1");
        assert_eq!(id.to_string(), "u1");
    }

    #[test]
    fn test_subject_id_from_string() {
        let id: SubjectId = "u1".into();
        assert_eq!(id.as_str(), "u1");

        let id: SubjectId = String::from("u2").into();
        assert_eq!(id.as_str(), "u2");
    }

    #[test]
    fn test_subject_id_serde() {
        let id = SubjectId::new("u1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"u1\"");

        let parsed: SubjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_role_name_creation() {
        let role = RoleName::new("public_interviewee");
        assert_eq!(role.as_str(), "public_interviewee");
    }

    #[test]
    fn test_signing_key_debug_redacted() {
        let key = SigningKey::new("super-secret");
        let printed = format!("{:?}", key);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn test_signing_key_bytes() {
        let key = SigningKey::new("abc");
        assert_eq!(key.as_bytes(), b"abc");
    }
}

//! JWT-bearer assertion construction and signing.
//!
//! This module builds the claims payload asserted to the token endpoint and
//! signs it as a compact RS256 JWS. The standard claims (`iss`, `scope`,
//! `aud`, `exp`, `iat`, `sub`) are laid down first; additional claims from
//! the configuration are inserted afterwards, so a colliding additional
//! claim overrides the standard value.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::TokenConfig;
use crate::secret::Secret;

/// Assertion lifetime in seconds (one hour, the JWT-bearer convention).
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Error type for assertion signing.
#[derive(Debug, Error)]
pub enum AssertionError {
    /// The private key could not be parsed as RSA PEM material.
    #[error("invalid private key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    /// Signing the claims payload failed.
    #[error("failed to sign assertion: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Build the claims payload for one assertion.
///
/// `issued_at` is the epoch second the caller captured for this attempt; the
/// expiry claim is derived from it so the token's lifetime window and the
/// manager's expiry tracking share one instant.
pub(crate) fn build_claims(
    config: &TokenConfig,
    audience: &str,
    issued_at: i64,
) -> Map<String, Value> {
    let mut claims = Map::new();

    if let Some(issuer) = &config.issuer {
        claims.insert("iss".to_string(), Value::from(issuer.as_str()));
    }
    if let Some(scope) = &config.scope {
        claims.insert("scope".to_string(), Value::from(scope.as_str()));
    }
    claims.insert("aud".to_string(), Value::from(audience));
    claims.insert(
        "exp".to_string(),
        Value::from(issued_at + ASSERTION_LIFETIME_SECS),
    );
    claims.insert("iat".to_string(), Value::from(issued_at));
    if let Some(subject) = &config.subject {
        claims.insert("sub".to_string(), Value::from(subject.as_str()));
    }

    // Layered after the standard claims: collisions favor the caller.
    for (name, value) in &config.additional_claims {
        claims.insert(name.clone(), value.clone());
    }

    claims
}

/// Build and sign the assertion for one exchange attempt.
///
/// A malformed key surfaces as [`AssertionError::InvalidKey`] rather than an
/// empty signature.
pub(crate) fn sign(
    config: &TokenConfig,
    key: &Secret,
    audience: &str,
    issued_at: i64,
) -> Result<String, AssertionError> {
    let claims = build_claims(config, audience, issued_at);

    let encoding_key =
        EncodingKey::from_rsa_pem(key.expose().as_bytes()).map_err(AssertionError::InvalidKey)?;

    encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(AssertionError::Signing)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUDIENCE: &str = "https://oauth.example.com/token";

    fn base_config() -> TokenConfig {
        TokenConfig::new()
            .with_issuer("robot@example.iam.gserviceaccount.com")
            .with_subject("user@example.com")
            .with_scopes(["read", "write"])
    }

    #[test]
    fn test_standard_claims() {
        let claims = build_claims(&base_config(), AUDIENCE, 1_700_000_000);

        assert_eq!(
            claims.get("iss"),
            Some(&Value::from("robot@example.iam.gserviceaccount.com"))
        );
        assert_eq!(claims.get("sub"), Some(&Value::from("user@example.com")));
        assert_eq!(claims.get("scope"), Some(&Value::from("read write")));
        assert_eq!(claims.get("aud"), Some(&Value::from(AUDIENCE)));
        assert_eq!(claims.get("iat"), Some(&Value::from(1_700_000_000)));
        assert_eq!(claims.get("exp"), Some(&Value::from(1_700_000_000 + 3600)));
    }

    #[test]
    fn test_optional_claims_omitted() {
        let claims = build_claims(&TokenConfig::new(), AUDIENCE, 0);

        assert!(!claims.contains_key("iss"));
        assert!(!claims.contains_key("sub"));
        assert!(!claims.contains_key("scope"));
        assert!(claims.contains_key("aud"));
    }

    #[test]
    fn test_additional_claim_included() {
        let config = base_config().with_claim("department", "infra");
        let claims = build_claims(&config, AUDIENCE, 0);

        assert_eq!(claims.get("department"), Some(&Value::from("infra")));
    }

    #[test]
    fn test_additional_claim_overrides_standard() {
        let config = base_config().with_claim("iss", "override@example.com");
        let claims = build_claims(&config, AUDIENCE, 0);

        assert_eq!(claims.get("iss"), Some(&Value::from("override@example.com")));
    }

    #[test]
    fn test_malformed_key_is_an_error() {
        let key = Secret::new("not pem material");
        let result = sign(&base_config(), &key, AUDIENCE, 0);

        assert!(matches!(result, Err(AssertionError::InvalidKey(_))));
    }
}

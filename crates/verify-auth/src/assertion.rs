//! `private_key_jwt` client assertions (RFC 7523).

use chrono::Utc;
use jsonwebtoken::Header;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::jwk::Jwk;

/// `client_assertion_type` value for JWT bearer assertions.
pub const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Assertion lifetime in seconds.
pub const ASSERTION_TTL_SECS: i64 = 300;

/// Claims carried by a client assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Client identifier.
    pub iss: String,
    /// Client identifier.
    pub sub: String,
    /// Token endpoint URL.
    pub aud: String,
    /// Unique token id.
    pub jti: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl AssertionClaims {
    /// Claims for `client_id` addressed to `token_endpoint`, valid from now.
    #[must_use]
    pub fn new(client_id: &str, token_endpoint: &str) -> Self {
        let now = Utc::now().timestamp();
        Self {
            iss: client_id.to_string(),
            sub: client_id.to_string(),
            aud: token_endpoint.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        }
    }
}

/// Sign a client assertion for `client_id` with the given key.
///
/// # Errors
///
/// Returns [`AuthError::InvalidKey`] when the key is incomplete and
/// [`AuthError::Signing`] when signing fails.
pub fn client_assertion(client_id: &str, token_endpoint: &str, jwk: &Jwk) -> AuthResult<String> {
    let mut header = Header::new(jwk.algorithm());
    header.kid.clone_from(&jwk.kid);
    let claims = AssertionClaims::new(client_id, token_endpoint);
    let key = jwk.encoding_key()?;
    jsonwebtoken::encode(&header, &claims, &key).map_err(|source| AuthError::Signing { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::{RSA_4096_JWK, RSA_JWK};
    use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};

    const ENDPOINT: &str = "https://acme.verify.ibm.com/oauth2/token";

    #[test]
    fn assertion_verifies_with_public_components() -> anyhow::Result<()> {
        let jwk = Jwk::parse(RSA_JWK)?;
        let token = client_assertion("cli-client", ENDPOINT, &jwk)?;

        let header = decode_header(&token)?;
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("test-key-1"));

        let key = DecodingKey::from_rsa_components(jwk.modulus(), jwk.exponent())?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[ENDPOINT]);
        validation.set_issuer(&["cli-client"]);
        let claims = decode::<AssertionClaims>(&token, &key, &validation)?.claims;

        assert_eq!(claims.sub, "cli-client");
        assert_eq!(claims.exp - claims.iat, ASSERTION_TTL_SECS);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
        Ok(())
    }

    #[test]
    fn rs512_assertion_from_4096_bit_key_verifies() -> anyhow::Result<()> {
        let jwk = Jwk::parse(RSA_4096_JWK)?;
        let token = client_assertion("cli-client", ENDPOINT, &jwk)?;

        let header = decode_header(&token)?;
        assert_eq!(header.alg, Algorithm::RS512);
        assert_eq!(header.kid.as_deref(), Some("test-key-4096"));

        let key = DecodingKey::from_rsa_components(jwk.modulus(), jwk.exponent())?;
        let mut validation = Validation::new(Algorithm::RS512);
        validation.set_audience(&[ENDPOINT]);
        let claims = decode::<AssertionClaims>(&token, &key, &validation)?.claims;
        assert_eq!(claims.iss, "cli-client");
        Ok(())
    }

    #[test]
    fn every_assertion_gets_a_fresh_jti() {
        let first = AssertionClaims::new("c", ENDPOINT);
        let second = AssertionClaims::new("c", ENDPOINT);
        assert_ne!(first.jti, second.jti);
    }
}

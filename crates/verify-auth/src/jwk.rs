//! RSA JSON Web Keys and their conversion to PKCS#1 DER for signing.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, EncodingKey};
use serde::Deserialize;

use crate::error::{AuthError, AuthResult};

/// Private RSA key in JWK form (RFC 7517/7518).
#[derive(Clone, Deserialize)]
pub struct Jwk {
    /// Key type; only `RSA` is accepted.
    pub kty: String,
    /// Key identifier placed in the JWT header.
    #[serde(default)]
    pub kid: Option<String>,
    /// Intended algorithm.
    #[serde(default)]
    pub alg: Option<String>,
    n: String,
    e: String,
    d: Option<String>,
    p: Option<String>,
    q: Option<String>,
    dp: Option<String>,
    dq: Option<String>,
    qi: Option<String>,
}

impl std::fmt::Debug for Jwk {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("kid", &self.kid)
            .field("alg", &self.alg)
            .finish_non_exhaustive()
    }
}

impl Jwk {
    /// Parse a JWK from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::KeyFormat`] for malformed JSON and
    /// [`AuthError::InvalidKey`] for a non-RSA key.
    pub fn parse(raw: &str) -> AuthResult<Self> {
        let jwk: Self =
            serde_json::from_str(raw.trim()).map_err(|source| AuthError::KeyFormat { source })?;
        if jwk.kty != "RSA" {
            return Err(AuthError::InvalidKey {
                reason: format!("key type '{}' is not supported; use an RSA key", jwk.kty),
            });
        }
        Ok(jwk)
    }

    /// Signing algorithm: the key's `alg` when it names RS384 or RS512,
    /// otherwise RS256.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        match self.alg.as_deref() {
            Some("RS384") => Algorithm::RS384,
            Some("RS512") => Algorithm::RS512,
            _ => Algorithm::RS256,
        }
    }

    /// Public modulus, base64url encoded.
    #[must_use]
    pub fn modulus(&self) -> &str {
        &self.n
    }

    /// Public exponent, base64url encoded.
    #[must_use]
    pub fn exponent(&self) -> &str {
        &self.e
    }

    /// Build the `jsonwebtoken` signing key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidKey`] when a private component is missing
    /// or not valid base64url.
    pub fn encoding_key(&self) -> AuthResult<EncodingKey> {
        Ok(EncodingKey::from_rsa_der(&self.to_pkcs1_der()?))
    }

    /// DER encoding of the `RSAPrivateKey` structure (RFC 8017 A.1.2).
    fn to_pkcs1_der(&self) -> AuthResult<Vec<u8>> {
        let components = [
            ("n", Some(&self.n)),
            ("e", Some(&self.e)),
            ("d", self.d.as_ref()),
            ("p", self.p.as_ref()),
            ("q", self.q.as_ref()),
            ("dp", self.dp.as_ref()),
            ("dq", self.dq.as_ref()),
            ("qi", self.qi.as_ref()),
        ];
        let mut body = der_integer(&[0]);
        for (name, value) in components {
            let value = value.ok_or_else(|| AuthError::InvalidKey {
                reason: format!("private key component '{name}' is missing"),
            })?;
            let bytes = URL_SAFE_NO_PAD
                .decode(value.trim_end_matches('='))
                .map_err(|err| AuthError::InvalidKey {
                    reason: format!("component '{name}' is not base64url: {err}"),
                })?;
            body.extend(der_integer(&bytes));
        }
        let mut der = vec![0x30];
        der.extend(der_length(body.len()));
        der.extend(body);
        Ok(der)
    }
}

fn der_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        return vec![u8::try_from(len).unwrap_or_default()];
    }
    let bytes: Vec<u8> = len
        .to_be_bytes()
        .into_iter()
        .skip_while(|byte| *byte == 0)
        .collect();
    let mut out = vec![0x80 | u8::try_from(bytes.len()).unwrap_or_default()];
    out.extend(bytes);
    out
}

fn der_integer(unsigned: &[u8]) -> Vec<u8> {
    let trimmed: Vec<u8> = unsigned.iter().copied().skip_while(|byte| *byte == 0).collect();
    let mut content = if trimmed.is_empty() { vec![0] } else { trimmed };
    if content[0] & 0x80 != 0 {
        content.insert(0, 0);
    }
    let mut out = vec![0x02];
    out.extend(der_length(content.len()));
    out.extend(content);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::{RSA_4096_JWK, RSA_4096_PKCS1_DER, RSA_JWK};
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn der_length_uses_long_form_above_127() {
        assert_eq!(der_length(5), vec![5]);
        assert_eq!(der_length(0x80), vec![0x81, 0x80]);
        assert_eq!(der_length(0x0102), vec![0x82, 0x01, 0x02]);
    }

    #[test]
    fn der_integer_keeps_values_positive() {
        assert_eq!(der_integer(&[0]), vec![0x02, 0x01, 0x00]);
        assert_eq!(der_integer(&[0x00, 0x7f]), vec![0x02, 0x01, 0x7f]);
        assert_eq!(der_integer(&[0xff]), vec![0x02, 0x02, 0x00, 0xff]);
    }

    #[test]
    fn rsa_jwk_converts_to_signing_key() -> anyhow::Result<()> {
        let jwk = Jwk::parse(RSA_JWK)?;
        assert_eq!(jwk.kid.as_deref(), Some("test-key-1"));
        assert_eq!(jwk.algorithm(), Algorithm::RS256);
        let der = jwk.to_pkcs1_der()?;
        assert_eq!(der[0], 0x30);
        jwk.encoding_key()?;
        Ok(())
    }

    #[test]
    fn der_length_covers_multi_byte_lengths() {
        assert_eq!(der_length(0x7f), vec![0x7f]);
        assert_eq!(der_length(0xff), vec![0x81, 0xff]);
        assert_eq!(der_length(0x0100), vec![0x82, 0x01, 0x00]);
        assert_eq!(der_length(0x0929), vec![0x82, 0x09, 0x29]);
        assert_eq!(der_length(0x01_0000), vec![0x83, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn large_integer_gets_long_form_length_and_sign_byte() {
        let modulus = vec![0xc0; 512];
        let der = der_integer(&modulus);
        assert_eq!(&der[..5], &[0x02, 0x82, 0x02, 0x01, 0x00]);
        assert_eq!(der.len(), 5 + 512);
    }

    #[test]
    fn rsa_4096_der_matches_openssl_encoding() -> anyhow::Result<()> {
        let jwk = Jwk::parse(RSA_4096_JWK)?;
        assert_eq!(jwk.algorithm(), Algorithm::RS512);

        let expected: String = RSA_4096_PKCS1_DER
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect();
        let expected = STANDARD.decode(expected)?;
        let der = jwk.to_pkcs1_der()?;

        assert_eq!(&der[..2], &[0x30, 0x82]);
        assert_eq!(der, expected);
        jwk.encoding_key()?;
        Ok(())
    }

    #[test]
    fn public_only_key_is_rejected() {
        let jwk = Jwk::parse(r#"{"kty":"RSA","n":"AQAB","e":"AQAB"}"#).expect("parses");
        let err = jwk.encoding_key().err().expect("no private part");
        assert!(err.to_string().contains("'d' is missing"));
    }

    #[test]
    fn non_rsa_key_is_rejected() {
        let err = Jwk::parse(r#"{"kty":"EC","n":"","e":""}"#).expect_err("EC unsupported");
        assert!(matches!(err, AuthError::InvalidKey { .. }));
    }

    #[test]
    fn malformed_json_is_a_format_error() {
        assert!(matches!(
            Jwk::parse("not json"),
            Err(AuthError::KeyFormat { .. })
        ));
    }
}

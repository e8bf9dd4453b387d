//! Personal and signer certificates.
//!
//! Both are addressed by label rather than by a generated identifier. The
//! list endpoints return bare JSON arrays.

use serde::{Deserialize, Serialize};

use crate::envelope::{ResourceData, kinds, require};
use crate::error::{ModelError, ModelResult};

const PEM_HEADER: &str = "-----BEGIN CERTIFICATE-----";

/// A certificate with its private key held by the tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalCert {
    /// Unique label.
    #[serde(default)]
    pub label: String,
    /// PEM certificate, or a PKCS#12 bundle in base64 on import.
    #[serde(default)]
    pub cert: String,
    /// PKCS#12 password when `cert` is a bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Whether the certificate signs tenant assertions by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    /// Subject distinguished name (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Issuer distinguished name (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    /// Start of validity (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notbefore: Option<String>,
    /// End of validity (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notafter: Option<String>,
}

/// A trusted certificate used to verify partner signatures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerCert {
    /// Unique label.
    #[serde(default)]
    pub label: String,
    /// PEM certificate.
    #[serde(default)]
    pub cert: String,
    /// Subject distinguished name (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Issuer distinguished name (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    /// Start of validity (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notbefore: Option<String>,
    /// End of validity (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notafter: Option<String>,
}

const SAMPLE_PEM: &str = "-----BEGIN CERTIFICATE-----\n<base64 DER>\n-----END CERTIFICATE-----\n";

impl ResourceData for PersonalCert {
    const KIND: &'static str = kinds::PERSONAL_CERT;

    fn validate(&self) -> ModelResult<()> {
        require(Self::KIND, "label", &self.label)?;
        require(Self::KIND, "cert", &self.cert)
    }

    fn boilerplate() -> Self {
        Self {
            label: "saml-signing".to_string(),
            cert: "<base64 PKCS#12 bundle>".to_string(),
            password: Some("<bundle password>".to_string()),
            is_default: Some(false),
            ..Self::default()
        }
    }

    fn display_name(&self) -> Option<String> {
        Some(self.label.clone())
    }
}

impl ResourceData for SignerCert {
    const KIND: &'static str = kinds::SIGNER_CERT;

    fn validate(&self) -> ModelResult<()> {
        require(Self::KIND, "label", &self.label)?;
        require(Self::KIND, "cert", &self.cert)?;
        if !self.cert.trim_start().starts_with(PEM_HEADER) {
            return Err(ModelError::InvalidField {
                kind: Self::KIND,
                field: "cert",
                reason: "expected a PEM encoded certificate".to_string(),
            });
        }
        Ok(())
    }

    fn boilerplate() -> Self {
        Self {
            label: "partner-idp".to_string(),
            cert: SAMPLE_PEM.to_string(),
            ..Self::default()
        }
    }

    fn display_name(&self) -> Option<String> {
        Some(self.label.clone())
    }
}

//! The `IBMVerifyAuth` resource consumed by `verifyctl auth -f`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use verify_api_models::{ModelError, ModelResult, ResourceData, kinds};

/// How the client authenticates to the token endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthType {
    /// Secret in an HTTP basic `Authorization` header.
    #[default]
    #[serde(alias = "default")]
    ClientSecretBasic,
    /// Secret as `client_id`/`client_secret` form fields.
    ClientSecretPost,
    /// Signed JWT client assertion.
    PrivateKeyJwt,
}

impl ClientAuthType {
    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientSecretBasic => "client_secret_basic",
            Self::ClientSecretPost => "client_secret_post",
            Self::PrivateKeyJwt => "private_key_jwt",
        }
    }
}

/// Credentials and options for one token acquisition.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResource {
    /// Tenant host, e.g. `acme.verify.ibm.com`.
    #[serde(default)]
    pub tenant: String,
    /// OAuth client identifier.
    #[serde(default)]
    pub client_id: String,
    /// Client authentication method.
    #[serde(default)]
    pub client_auth_type: ClientAuthType,
    /// Client secret for the secret-based methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Requested scopes, joined with spaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    /// Extra form parameters appended to every token request.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
    /// Use the device flow to log in as a user.
    #[serde(default)]
    pub user: bool,
    /// RSA JSON Web Key, inline or `@path` relative to the resource file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_raw: Option<String>,
}

impl std::fmt::Debug for AuthResource {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AuthResource")
            .field("tenant", &self.tenant)
            .field("client_id", &self.client_id)
            .field("client_auth_type", &self.client_auth_type)
            .field("scopes", &self.scopes)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl AuthResource {
    /// Joined `scope` parameter, if any scopes were requested.
    #[must_use]
    pub fn scope(&self) -> Option<String> {
        (!self.scopes.is_empty()).then(|| self.scopes.join(" "))
    }
}

impl ResourceData for AuthResource {
    const KIND: &'static str = kinds::AUTH;

    fn validate(&self) -> ModelResult<()> {
        if self.tenant.trim().is_empty() {
            return Err(ModelError::MissingField {
                kind: Self::KIND,
                field: "tenant",
            });
        }
        if self.client_id.trim().is_empty() {
            return Err(ModelError::MissingField {
                kind: Self::KIND,
                field: "clientId",
            });
        }
        match self.client_auth_type {
            ClientAuthType::PrivateKeyJwt if self.private_key_raw.is_none() => {
                Err(ModelError::MissingField {
                    kind: Self::KIND,
                    field: "privateKeyRaw",
                })
            }
            ClientAuthType::ClientSecretBasic | ClientAuthType::ClientSecretPost
                if !self.user && self.client_secret.as_deref().is_none_or(str::is_empty) =>
            {
                Err(ModelError::MissingField {
                    kind: Self::KIND,
                    field: "clientSecret",
                })
            }
            _ => Ok(()),
        }
    }

    fn boilerplate() -> Self {
        Self {
            tenant: "acme.verify.ibm.com".to_string(),
            client_id: "<client id>".to_string(),
            client_auth_type: ClientAuthType::ClientSecretBasic,
            client_secret: Some("<client secret>".to_string()),
            scopes: vec!["openid".to_string()],
            parameters: BTreeMap::new(),
            user: false,
            private_key_raw: None,
        }
    }

    fn display_name(&self) -> Option<String> {
        Some(self.tenant.clone())
    }

    fn resolve_files(&mut self, base_dir: &Path) -> ModelResult<()> {
        if let Some(reference) = self
            .private_key_raw
            .as_deref()
            .and_then(|raw| raw.trim().strip_prefix('@'))
        {
            let path = base_dir.join(reference);
            let contents =
                fs::read_to_string(&path).map_err(|source| ModelError::Read { path, source })?;
            self.private_key_raw = Some(contents);
        }
        Ok(())
    }
}

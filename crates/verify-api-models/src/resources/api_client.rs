//! API clients served by `/v1.0/apiclients`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::{ResourceData, kinds, require, require_items};
use crate::error::ModelResult;

/// An API client (machine identity with entitlements).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiClient {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// OAuth client identifier (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// OAuth client secret (returned on create only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Unique display name.
    #[serde(default)]
    pub client_name: String,
    /// Whether the client may obtain tokens.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Entitlements granted to the client.
    #[serde(default)]
    pub entitlements: Vec<String>,
    /// `allow` or `deny` for `ipFilters`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_filter_op: Option<String>,
    /// CIDR ranges evaluated against `ipFilterOp`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_filters: Vec<String>,
    /// JWKS URI used to verify private-key JWT assertions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwk_uri: Option<String>,
    /// Scope restrictions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_settings: Option<OverrideSettings>,
    /// Client authentication settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_config: Option<AdditionalConfig>,
    /// Arbitrary properties echoed back by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Value>,
}

const fn default_enabled() -> bool {
    true
}

/// Scope restriction settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideSettings {
    /// Whether only the listed scopes may be requested.
    #[serde(default)]
    pub restrict_scopes: bool,
    /// Allowed scopes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<Scope>,
}

/// Scope entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Scope value.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Client authentication settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalConfig {
    /// `default`, `client_secret_basic`, `client_secret_post`, `private_key_jwt`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_auth_method: Option<String>,
    /// Reject replayed assertion `jti` values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_client_assertion_jti: Option<bool>,
    /// Key identifiers accepted for assertion verification.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_client_assertion_verification_keys: Vec<String>,
}

/// List response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiClientList {
    /// Total matches.
    #[serde(default)]
    pub total: Option<u64>,
    /// Clients in this page.
    #[serde(default)]
    pub api_clients: Vec<ApiClient>,
}

impl ResourceData for ApiClient {
    const KIND: &'static str = kinds::API_CLIENT;

    fn validate(&self) -> ModelResult<()> {
        require(Self::KIND, "clientName", &self.client_name)?;
        require_items(Self::KIND, "entitlements", &self.entitlements)
    }

    fn boilerplate() -> Self {
        Self {
            client_name: "automation-client".to_string(),
            enabled: true,
            description: Some("Client used by CI pipelines".to_string()),
            entitlements: vec!["readUserGroups".to_string(), "manageUsers".to_string()],
            override_settings: Some(OverrideSettings {
                restrict_scopes: false,
                scopes: Vec::new(),
            }),
            ..Self::default()
        }
    }

    fn display_name(&self) -> Option<String> {
        Some(self.client_name.clone())
    }
}

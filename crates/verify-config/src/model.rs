//! Configuration document persisted between invocations.

use serde::{Deserialize, Serialize};
use verify_api_models::{API_VERSION, kinds};

/// Stored token for one tenant.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Tenant host.
    pub tenant: String,
    /// Bearer token.
    pub token: String,
    /// Token was obtained through the device flow.
    #[serde(default)]
    pub is_user: bool,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AuthConfig")
            .field("tenant", &self.tenant)
            .field("is_user", &self.is_user)
            .finish_non_exhaustive()
    }
}

/// The `IBMVerifyConfig` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Document version.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Always `IBMVerifyConfig`.
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Current tenant, used when `--tenant` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    /// One entry per tenant.
    #[serde(default)]
    pub auth: Vec<AuthConfig>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            tenant: None,
            auth: Vec::new(),
        }
    }
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    kinds::CONFIG.to_string()
}

impl CliConfig {
    /// Stored entry for `tenant`.
    #[must_use]
    pub fn auth_for(&self, tenant: &str) -> Option<&AuthConfig> {
        self.auth.iter().find(|entry| entry.tenant == tenant)
    }

    /// Replace or add the entry for `entry.tenant`, keeping one per tenant.
    pub fn upsert_auth(&mut self, entry: AuthConfig) {
        match self.auth.iter_mut().find(|existing| existing.tenant == entry.tenant) {
            Some(existing) => *existing = entry,
            None => self.auth.push(entry),
        }
    }

    /// Make `tenant` current.
    pub fn set_current(&mut self, tenant: &str) {
        self.tenant = Some(tenant.to_string());
    }

    /// `--tenant` when given, else the current tenant.
    #[must_use]
    pub fn effective_tenant<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        requested
            .filter(|tenant| !tenant.trim().is_empty())
            .or(self.tenant.as_deref())
    }
}

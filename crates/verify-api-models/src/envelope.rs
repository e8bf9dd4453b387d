//! The `{kind, apiVersion, metadata, data}` envelope shared by every resource
//! file and every rendered response.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, ModelResult};

/// Envelope API version written by the CLI.
pub const API_VERSION: &str = "1.0";

/// Canonical `kind` discriminators. Every command resolves kinds through these
/// constants so create, get, replace and delete cannot disagree.
pub mod kinds {
    /// SCIM user.
    pub const USER: &str = "IBMVerifyUser";
    /// SCIM group.
    pub const GROUP: &str = "IBMVerifyGroup";
    /// Application (SAML/OIDC/bookmark).
    pub const APPLICATION: &str = "IBMVerifyApplication";
    /// API client used for machine-to-machine access.
    pub const API_CLIENT: &str = "IBMVerifyAPIClient";
    /// Access policy from the policy vault.
    pub const ACCESS_POLICY: &str = "IBMVerifyAccessPolicy";
    /// Identity source (cloud directory, LDAP, federation).
    pub const IDENTITY_SOURCE: &str = "IBMVerifyIdentitySource";
    /// Personal certificate (key pair) held by the tenant.
    pub const PERSONAL_CERT: &str = "IBMVerifyPersonalCert";
    /// Signer certificate trusted by the tenant.
    pub const SIGNER_CERT: &str = "IBMVerifySignerCert";
    /// Password policy.
    pub const PASSWORD_POLICY: &str = "IBMVerifyPasswordPolicy";
    /// Branding theme.
    pub const THEME: &str = "IBMVerifyTheme";
    /// Authentication request consumed by `verifyctl auth`.
    pub const AUTH: &str = "IBMVerifyAuth";
    /// Persisted CLI configuration.
    pub const CONFIG: &str = "IBMVerifyConfig";
    /// List of envelopes.
    pub const LIST: &str = "List";
}

/// Typed payload carried in an envelope's `data` field.
pub trait ResourceData: Serialize + DeserializeOwned {
    /// The `kind` this payload travels under.
    const KIND: &'static str;

    /// Run required-field checks before any network call is made.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingField`] or [`ModelError::InvalidField`]
    /// describing the first failed check.
    fn validate(&self) -> ModelResult<()>;

    /// A sample payload used by `--boilerplate`.
    fn boilerplate() -> Self;

    /// Name recorded in the envelope metadata when rendering.
    fn display_name(&self) -> Option<String> {
        None
    }

    /// Load any companion files the payload references, relative to the
    /// directory holding the resource file.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Read`] when a referenced file cannot be read.
    fn resolve_files(&mut self, _base_dir: &Path) -> ModelResult<()> {
        Ok(())
    }
}

/// Resource families managed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// SCIM users.
    User,
    /// SCIM groups.
    Group,
    /// Applications.
    Application,
    /// API clients.
    ApiClient,
    /// Access policies.
    AccessPolicy,
    /// Identity sources.
    IdentitySource,
    /// Personal certificates.
    PersonalCert,
    /// Signer certificates.
    SignerCert,
    /// Password policies.
    PasswordPolicy,
    /// Branding themes.
    Theme,
}

impl ResourceKind {
    /// Every managed resource family.
    pub const ALL: [Self; 10] = [
        Self::User,
        Self::Group,
        Self::Application,
        Self::ApiClient,
        Self::AccessPolicy,
        Self::IdentitySource,
        Self::PersonalCert,
        Self::SignerCert,
        Self::PasswordPolicy,
        Self::Theme,
    ];

    /// Envelope `kind` for this family.
    #[must_use]
    pub const fn kind_name(self) -> &'static str {
        match self {
            Self::User => kinds::USER,
            Self::Group => kinds::GROUP,
            Self::Application => kinds::APPLICATION,
            Self::ApiClient => kinds::API_CLIENT,
            Self::AccessPolicy => kinds::ACCESS_POLICY,
            Self::IdentitySource => kinds::IDENTITY_SOURCE,
            Self::PersonalCert => kinds::PERSONAL_CERT,
            Self::SignerCert => kinds::SIGNER_CERT,
            Self::PasswordPolicy => kinds::PASSWORD_POLICY,
            Self::Theme => kinds::THEME,
        }
    }

    /// Human-readable label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::Application => "application",
            Self::ApiClient => "API client",
            Self::AccessPolicy => "access policy",
            Self::IdentitySource => "identity source",
            Self::PersonalCert => "personal certificate",
            Self::SignerCert => "signer certificate",
            Self::PasswordPolicy => "password policy",
            Self::Theme => "theme",
        }
    }
}

/// Serialization format of a resource file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl FileFormat {
    /// Pick the format from the file extension; anything but `.json` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Optional descriptive metadata attached to an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Resource name, when the resource has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Total result count reported by list endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Generic resource envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceObject {
    /// Kind discriminator, e.g. `IBMVerifyUser`.
    #[serde(default)]
    pub kind: String,
    /// Envelope version.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Optional metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Resource payload.
    #[serde(default)]
    pub data: Value,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

impl ResourceObject {
    /// Wrap a typed payload for output.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] if the payload cannot be represented as JSON.
    pub fn wrap<T: ResourceData>(item: &T) -> ModelResult<Self> {
        let data = serde_json::to_value(item).map_err(|source| ModelError::Json { source })?;
        let metadata = item.display_name().map(|name| Metadata {
            name: Some(name),
            total: None,
        });
        Ok(Self {
            kind: T::KIND.to_string(),
            api_version: default_api_version(),
            metadata,
            data,
        })
    }

    /// Decode an envelope from text in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] or [`ModelError::Yaml`] when the document
    /// is malformed.
    pub fn parse(input: &str, format: FileFormat) -> ModelResult<Self> {
        match format {
            FileFormat::Json => {
                serde_json::from_str(input).map_err(|source| ModelError::Json { source })
            }
            FileFormat::Yaml => {
                serde_yaml::from_str(input).map_err(|source| ModelError::Yaml { source })
            }
        }
    }

    /// Read and decode an envelope from disk, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Read`] when the file cannot be read, or a decode
    /// error when it is malformed.
    pub fn read(path: &Path) -> ModelResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, FileFormat::from_path(path))
    }

    /// Check the kind discriminator and decode `data` into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::KindMismatch`] when the envelope carries another
    /// kind, or [`ModelError::Json`] when `data` does not fit `T`.
    pub fn into_data<T: ResourceData>(self) -> ModelResult<T> {
        if self.kind != T::KIND {
            return Err(ModelError::KindMismatch {
                expected: T::KIND,
                found: self.kind,
            });
        }
        serde_json::from_value(self.data).map_err(|source| ModelError::Json { source })
    }

    /// Render the envelope.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the envelope cannot be encoded.
    pub fn render(&self, format: FileFormat) -> ModelResult<String> {
        render(self, format)
    }
}

/// Envelope for list output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceObjectList {
    /// Always `List`.
    pub kind: String,
    /// Envelope version.
    pub api_version: String,
    /// List metadata (total count).
    pub metadata: Metadata,
    /// Wrapped items.
    pub items: Vec<ResourceObject>,
}

impl ResourceObjectList {
    /// Wrap a page of typed payloads.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] if any payload cannot be represented as JSON.
    pub fn wrap<T: ResourceData>(items: &[T], total: Option<u64>) -> ModelResult<Self> {
        let items = items
            .iter()
            .map(ResourceObject::wrap)
            .collect::<ModelResult<Vec<_>>>()?;
        let total = total.or_else(|| u64::try_from(items.len()).ok());
        Ok(Self {
            kind: kinds::LIST.to_string(),
            api_version: default_api_version(),
            metadata: Metadata { name: None, total },
            items,
        })
    }

    /// Render the list envelope.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the list cannot be encoded.
    pub fn render(&self, format: FileFormat) -> ModelResult<String> {
        render(self, format)
    }
}

fn render<T: Serialize>(value: &T, format: FileFormat) -> ModelResult<String> {
    match format {
        FileFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|source| ModelError::Json { source })
        }
        FileFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|source| ModelError::Yaml { source })
        }
    }
}

pub(crate) fn require(kind: &'static str, field: &'static str, value: &str) -> ModelResult<()> {
    if value.trim().is_empty() {
        return Err(ModelError::MissingField { kind, field });
    }
    Ok(())
}

pub(crate) fn require_some<T>(
    kind: &'static str,
    field: &'static str,
    value: Option<&T>,
) -> ModelResult<()> {
    if value.is_none() {
        return Err(ModelError::MissingField { kind, field });
    }
    Ok(())
}

pub(crate) fn require_items<T>(
    kind: &'static str,
    field: &'static str,
    values: &[T],
) -> ModelResult<()> {
    if values.is_empty() {
        return Err(ModelError::MissingField { kind, field });
    }
    Ok(())
}

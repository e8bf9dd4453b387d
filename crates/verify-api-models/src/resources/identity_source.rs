//! Identity sources served by `/v2.0/identitysources`.

use serde::{Deserialize, Serialize};

use crate::envelope::{ResourceData, kinds, require};
use crate::error::ModelResult;

/// A directory or federation the tenant authenticates against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySource {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Unique instance name.
    #[serde(default)]
    pub instance_name: String,
    /// Source type (`1` cloud directory, `2` LDAP, `3` SAML, ...).
    #[serde(default)]
    pub source_type_id: String,
    /// Whether users may sign in through the source.
    #[serde(default)]
    pub enabled: bool,
    /// Type-specific properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<SourceProperty>,
}

/// Key/value property of an identity source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceProperty {
    /// Property key.
    pub key: String,
    /// Property value.
    #[serde(default)]
    pub value: String,
    /// Whether the value is masked in responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitive: Option<bool>,
}

/// List response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySourceList {
    /// Total matches.
    #[serde(default)]
    pub total: Option<u64>,
    /// Sources in this page.
    #[serde(default)]
    pub identity_sources: Vec<IdentitySource>,
}

impl ResourceData for IdentitySource {
    const KIND: &'static str = kinds::IDENTITY_SOURCE;

    fn validate(&self) -> ModelResult<()> {
        require(Self::KIND, "instanceName", &self.instance_name)?;
        require(Self::KIND, "sourceTypeId", &self.source_type_id)?;
        for property in &self.properties {
            require(Self::KIND, "properties[].key", &property.key)?;
        }
        Ok(())
    }

    fn boilerplate() -> Self {
        Self {
            instance_name: "Corporate LDAP".to_string(),
            source_type_id: "2".to_string(),
            enabled: true,
            properties: vec![
                SourceProperty {
                    key: "ldap_host".to_string(),
                    value: "ldap.example.com".to_string(),
                    sensitive: None,
                },
                SourceProperty {
                    key: "bind_password".to_string(),
                    value: "<secret>".to_string(),
                    sensitive: Some(true),
                },
            ],
            ..Self::default()
        }
    }

    fn display_name(&self) -> Option<String> {
        Some(self.instance_name.clone())
    }
}

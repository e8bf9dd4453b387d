//! Applications served by `/v1.0/applications`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::{ResourceData, kinds, require};
use crate::error::ModelResult;

/// A federated or bookmark application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Display name; unique per tenant.
    #[serde(default)]
    pub name: String,
    /// Template the application was instantiated from (`1` is custom).
    #[serde(default)]
    pub template_id: String,
    /// Application type such as `Custom Application`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_type: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the application shows on the launchpad.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_on_launchpad: Option<bool>,
    /// Application URL opened from the launchpad.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_url: Option<String>,
    /// Provider configuration (`saml`, `oidc`, `bookmark`, `sso`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<Value>,
    /// Attribute mappings sent to the service provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_mappings: Option<Value>,
    /// Hypermedia links; `_links.self.href` ends with the identifier.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// HAL link set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// Link to the resource itself.
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
}

/// Single HAL link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URL.
    pub href: String,
}

impl Application {
    /// Identifier derived from the self link.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.self_link.as_ref())
            .and_then(|link| link.href.rsplit('/').next())
            .filter(|id| !id.is_empty())
    }
}

/// List response (HAL).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationList {
    /// Total matches.
    #[serde(default)]
    pub total_count: Option<u64>,
    /// Embedded page.
    #[serde(rename = "_embedded", default)]
    pub embedded: EmbeddedApplications,
}

/// `_embedded` block of [`ApplicationList`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedApplications {
    /// Applications in this page.
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl ResourceData for Application {
    const KIND: &'static str = kinds::APPLICATION;

    fn validate(&self) -> ModelResult<()> {
        require(Self::KIND, "name", &self.name)?;
        require(Self::KIND, "templateId", &self.template_id)
    }

    fn boilerplate() -> Self {
        Self {
            name: "Expense portal".to_string(),
            template_id: "1".to_string(),
            application_type: Some("Custom Application".to_string()),
            description: Some("Internal expense reporting".to_string()),
            visible_on_launchpad: Some(true),
            application_url: Some("https://expenses.example.com".to_string()),
            providers: Some(serde_json::json!({
                "bookmark": { "bookmarkUrl": "https://expenses.example.com" }
            })),
            ..Self::default()
        }
    }

    fn display_name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_comes_from_self_link() -> anyhow::Result<()> {
        let app: Application = serde_json::from_str(
            r#"{"name":"a","templateId":"1","_links":{"self":{"href":"/v1.0/applications/4411"}}}"#,
        )?;
        assert_eq!(app.id(), Some("4411"));
        Ok(())
    }

    #[test]
    fn template_is_required() {
        let app = Application {
            name: "portal".to_string(),
            ..Application::default()
        };
        assert!(app.validate().is_err());
    }
}

//! SCIM user as served by `/v2.0/Users`.

use serde::{Deserialize, Serialize};

use super::scim::{IBM_USER_SCHEMA, ScimMeta, USER_SCHEMA};
use crate::envelope::{ResourceData, kinds, require, require_items};
use crate::error::ModelResult;

/// A tenant user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Schema URNs the payload conforms to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
    /// Unique login name.
    #[serde(default)]
    pub user_name: String,
    /// Structured name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<UserName>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Preferred language tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    /// Whether the account is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Email addresses; the first is used for notifications.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<Email>,
    /// Phone numbers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<PhoneNumber>,
    /// IBM extension attributes.
    #[serde(
        rename = "urn:ietf:params:scim:schemas:extension:ibm:2.0:User",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ibm_extension: Option<UserExtension>,
    /// Group memberships (read-only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<UserGroup>,
    /// Server metadata (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ScimMeta>,
}

/// Structured user name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserName {
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Full formatted name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

/// Email entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Address.
    pub value: String,
    /// `work`, `home`, ...
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Phone number entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    /// Number in E.164 or free form.
    pub value: String,
    /// `mobile`, `work`, ...
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// `urn:ietf:params:scim:schemas:extension:ibm:2.0:User`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExtension {
    /// Realm the user belongs to (`cloudIdentityRealm` for cloud directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    /// `regular` or `federated`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_category: Option<String>,
    /// Whether 2FA enrollment is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_f_a: Option<bool>,
    /// Custom attribute values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_attributes: Vec<CustomAttribute>,
}

/// Custom attribute value set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAttribute {
    /// Attribute name.
    pub name: String,
    /// Attribute values.
    #[serde(default)]
    pub values: Vec<String>,
}

/// Group reference on a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroup {
    /// Group identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Group display name.
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ResourceData for User {
    const KIND: &'static str = kinds::USER;

    fn validate(&self) -> ModelResult<()> {
        require(Self::KIND, "userName", &self.user_name)?;
        require_items(Self::KIND, "emails", &self.emails)?;
        for email in &self.emails {
            require(Self::KIND, "emails[].value", &email.value)?;
        }
        Ok(())
    }

    fn boilerplate() -> Self {
        Self {
            schemas: vec![USER_SCHEMA.to_string(), IBM_USER_SCHEMA.to_string()],
            user_name: "jdoe".to_string(),
            name: Some(UserName {
                family_name: Some("Doe".to_string()),
                given_name: Some("John".to_string()),
                formatted: Some("John Doe".to_string()),
            }),
            display_name: Some("John Doe".to_string()),
            active: Some(true),
            emails: vec![Email {
                value: "jdoe@example.com".to_string(),
                kind: Some("work".to_string()),
            }],
            phone_numbers: vec![PhoneNumber {
                value: "+15555550100".to_string(),
                kind: Some("mobile".to_string()),
            }],
            ibm_extension: Some(UserExtension {
                realm: Some("cloudIdentityRealm".to_string()),
                user_category: Some("regular".to_string()),
                ..UserExtension::default()
            }),
            ..Self::default()
        }
    }

    fn display_name(&self) -> Option<String> {
        Some(self.user_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelError;

    #[test]
    fn username_without_email_fails_validation() {
        let user = User {
            user_name: "bob".to_string(),
            ..User::default()
        };
        let err = user.validate().expect_err("emails are required");
        assert!(matches!(err, ModelError::MissingField { field: "emails", .. }));
    }

    #[test]
    fn ibm_extension_uses_schema_urn_key() -> anyhow::Result<()> {
        let value = serde_json::to_value(User::boilerplate())?;
        assert!(value.get(IBM_USER_SCHEMA).is_some());
        assert_eq!(value["userName"], "jdoe");
        Ok(())
    }
}

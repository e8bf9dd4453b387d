//! SCIM group as served by `/v2.0/Groups`.

use serde::{Deserialize, Serialize};

use super::scim::{GROUP_SCHEMA, IBM_GROUP_SCHEMA, ScimMeta};
use crate::envelope::{ResourceData, kinds, require};
use crate::error::ModelResult;

/// A tenant group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Schema URNs the payload conforms to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
    /// Unique group name.
    #[serde(default)]
    pub display_name: String,
    /// Direct members.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<GroupMember>,
    /// IBM extension attributes.
    #[serde(
        rename = "urn:ietf:params:scim:schemas:extension:ibm:2.0:Group",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ibm_extension: Option<GroupExtension>,
    /// Server metadata (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ScimMeta>,
}

/// Member reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Member identifier.
    pub value: String,
    /// `user` or `group`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Member display name (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// `urn:ietf:params:scim:schemas:extension:ibm:2.0:Group`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupExtension {
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owner references.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<GroupMember>,
}

impl ResourceData for Group {
    const KIND: &'static str = kinds::GROUP;

    fn validate(&self) -> ModelResult<()> {
        require(Self::KIND, "displayName", &self.display_name)?;
        for member in &self.members {
            require(Self::KIND, "members[].value", &member.value)?;
        }
        Ok(())
    }

    fn boilerplate() -> Self {
        Self {
            schemas: vec![GROUP_SCHEMA.to_string(), IBM_GROUP_SCHEMA.to_string()],
            display_name: "developers".to_string(),
            members: vec![GroupMember {
                value: "<user id>".to_string(),
                kind: Some("user".to_string()),
                display: None,
            }],
            ibm_extension: Some(GroupExtension {
                description: Some("Application developers".to_string()),
                owners: Vec::new(),
            }),
            ..Self::default()
        }
    }

    fn display_name(&self) -> Option<String> {
        Some(self.display_name.clone())
    }
}

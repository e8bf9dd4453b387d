//! SCIM 2.0 building blocks shared by users and groups.

use serde::{Deserialize, Serialize};

/// SCIM core user schema URN.
pub const USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
/// IBM user extension schema URN.
pub const IBM_USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:extension:ibm:2.0:User";
/// SCIM core group schema URN.
pub const GROUP_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
/// IBM group extension schema URN.
pub const IBM_GROUP_SCHEMA: &str = "urn:ietf:params:scim:schemas:extension:ibm:2.0:Group";

/// Server-maintained resource metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimMeta {
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Last modification timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// `User` or `Group`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Canonical resource URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// SCIM list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimList<T> {
    /// Total number of matches on the server.
    #[serde(default)]
    pub total_results: u64,
    /// Number of resources in this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<u64>,
    /// 1-based index of the first resource in this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u64>,
    /// The page itself.
    #[serde(rename = "Resources", default = "Vec::new")]
    pub resources: Vec<T>,
}

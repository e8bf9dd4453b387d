//! Entitlements an API client or user needs for each operation.

use crate::envelope::ResourceKind;

/// CRUD operation performed by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create a resource.
    Create,
    /// Read a single resource or list resources.
    Get,
    /// Replace an existing resource.
    Replace,
    /// Delete a resource.
    Delete,
}

/// An entitlement identifier with its console description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entitlement {
    /// Identifier configured on the API client.
    pub id: &'static str,
    /// Description shown in the admin console.
    pub description: &'static str,
}

const fn ent(id: &'static str, description: &'static str) -> Entitlement {
    Entitlement { id, description }
}

const MANAGE_USERS: Entitlement = ent("manageUsers", "Manage users and standard groups");
const MANAGE_ALL_USER_GROUPS: Entitlement =
    ent("manageAllUserGroups", "Manage users and all groups");
const READ_USER_GROUPS: Entitlement = ent("readUserGroups", "Read users and groups");
const MANAGE_API_CLIENTS: Entitlement = ent("manageAPIClients", "Manage API clients");
const READ_API_CLIENTS: Entitlement = ent("readAPIClients", "Read API clients");
const MANAGE_APPS: Entitlement = ent("manageApps", "Manage application configuration");
const READ_APPS: Entitlement = ent("readApps", "Read application configuration");
const MANAGE_POLICIES: Entitlement = ent("manageAccessPolicies", "Manage access policies");
const READ_POLICIES: Entitlement = ent("readAccessPolicies", "Read access policies");
const MANAGE_IDENTITY_SOURCES: Entitlement =
    ent("manageIdentitySources", "Manage identity sources");
const READ_IDENTITY_SOURCES: Entitlement = ent("readIdentitySources", "Read identity sources");
const MANAGE_CERTS: Entitlement = ent("manageCertificates", "Manage certificates");
const READ_CERTS: Entitlement = ent("readCertificates", "Read certificates");
const MANAGE_PASSWORD_POLICY: Entitlement =
    ent("managePasswordPolicy", "Manage password policies");
const READ_PASSWORD_POLICY: Entitlement = ent("readPasswordPolicy", "Read password policies");
const MANAGE_TEMPLATES: Entitlement = ent("manageTemplates", "Manage branding and templates");
const READ_TEMPLATES: Entitlement = ent("readTemplates", "Read branding and templates");

/// Entitlements that satisfy `operation` on `kind`. Any one of them suffices.
#[must_use]
pub fn required_entitlements(kind: ResourceKind, operation: Operation) -> &'static [Entitlement] {
    let read = matches!(operation, Operation::Get);
    match kind {
        ResourceKind::User | ResourceKind::Group => {
            if read {
                &[MANAGE_USERS, MANAGE_ALL_USER_GROUPS, READ_USER_GROUPS]
            } else {
                &[MANAGE_USERS, MANAGE_ALL_USER_GROUPS]
            }
        }
        ResourceKind::ApiClient => {
            if read {
                &[MANAGE_API_CLIENTS, READ_API_CLIENTS]
            } else {
                &[MANAGE_API_CLIENTS]
            }
        }
        ResourceKind::Application => {
            if read {
                &[MANAGE_APPS, READ_APPS]
            } else {
                &[MANAGE_APPS]
            }
        }
        ResourceKind::AccessPolicy => {
            if read {
                &[MANAGE_POLICIES, READ_POLICIES]
            } else {
                &[MANAGE_POLICIES]
            }
        }
        ResourceKind::IdentitySource => {
            if read {
                &[MANAGE_IDENTITY_SOURCES, READ_IDENTITY_SOURCES]
            } else {
                &[MANAGE_IDENTITY_SOURCES]
            }
        }
        ResourceKind::PersonalCert | ResourceKind::SignerCert => {
            if read {
                &[MANAGE_CERTS, READ_CERTS]
            } else {
                &[MANAGE_CERTS]
            }
        }
        ResourceKind::PasswordPolicy => {
            if read {
                &[MANAGE_PASSWORD_POLICY, READ_PASSWORD_POLICY]
            } else {
                &[MANAGE_PASSWORD_POLICY]
            }
        }
        ResourceKind::Theme => {
            if read {
                &[MANAGE_TEMPLATES, READ_TEMPLATES]
            } else {
                &[MANAGE_TEMPLATES]
            }
        }
    }
}

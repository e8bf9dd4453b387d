//! Typed payloads for each resource family.

pub mod api_client;
pub mod application;
pub mod certificate;
pub mod group;
pub mod identity_source;
pub mod password_policy;
pub mod policy;
pub mod scim;
pub mod theme;
pub mod user;

pub use api_client::{ApiClient, ApiClientList};
pub use application::{Application, ApplicationList};
pub use certificate::{PersonalCert, SignerCert};
pub use group::Group;
pub use identity_source::{IdentitySource, IdentitySourceList};
pub use password_policy::{PasswordPolicy, PasswordPolicyList};
pub use policy::{Policy, PolicyList};
pub use scim::ScimList;
pub use theme::{Theme, ThemeList};
pub use user::User;

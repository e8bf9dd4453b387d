#![forbid(unsafe_code)]
#![warn(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
//! Shared wire types for the IBM Security Verify administration API.
//!
//! Every resource that crosses the CLI boundary travels inside a
//! [`ResourceObject`] envelope keyed by its `kind`. The typed payloads mirror
//! the remote JSON schema field for field so the CLI and the API clients agree
//! on one contract.
//!
//! Layout: `envelope.rs` (envelope, kinds, decoding), `entitlements.rs`
//! (required entitlements per operation), `resources/` (typed payloads).

pub mod entitlements;
pub mod envelope;
pub mod error;
pub mod resources;

pub use entitlements::{Entitlement, Operation, required_entitlements};
pub use envelope::{
    API_VERSION, FileFormat, Metadata, ResourceData, ResourceKind, ResourceObject,
    ResourceObjectList, kinds,
};
pub use error::{ModelError, ModelResult};
pub use resources::{
    ApiClient, ApiClientList, Application, ApplicationList, Group, IdentitySource,
    IdentitySourceList, PasswordPolicy, PasswordPolicyList, PersonalCert, Policy, PolicyList,
    ScimList, SignerCert, Theme, ThemeList, User,
};

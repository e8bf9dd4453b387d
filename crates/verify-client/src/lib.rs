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
//! Typed HTTP client for the IBM Security Verify administration API.
//!
//! Layout: `http.rs` (transport trait and `reqwest` implementation),
//! `context.rs` (tenant base URL, bearer token), `error.rs` (status
//! classifier), `resources/` (one client per resource family).

pub mod context;
pub mod error;
pub mod http;
pub mod params;
pub mod resources;

pub use context::{ApiContext, tenant_base_url};
pub use error::{ApiError, ApiResult, classify};
pub use http::{
    Body, CONTENT_TYPE_JSON, CONTENT_TYPE_SCIM, HEADER_REQUEST_ID, HttpClient, HttpRequest,
    Method, Part, ReqwestClient, Response,
};
pub use params::{ListParams, Locator, Page};
pub use resources::{
    AccessPolicies, ApiClients, Applications, Groups, IdentitySources, PasswordPolicies,
    PersonalCerts, ResourceClient, SignerCerts, Themes, Users, created_id,
};

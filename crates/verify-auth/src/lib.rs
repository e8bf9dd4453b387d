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
//! OAuth token acquisition against an IBM Security Verify tenant.
//!
//! Supports client credentials and the device authorization grant, with
//! `client_secret_basic`, `client_secret_post` or `private_key_jwt` client
//! authentication.
//!
//! Layout: `resource.rs` (the `IBMVerifyAuth` document), `token.rs`
//! (token endpoint calls and device polling), `jwk.rs`/`assertion.rs`
//! (signed client assertions), `error.rs`.

pub mod assertion;
pub mod error;
pub mod jwk;
pub mod resource;
pub mod token;

pub use assertion::{AssertionClaims, CLIENT_ASSERTION_TYPE, client_assertion};
pub use error::{AuthError, AuthResult};
pub use jwk::Jwk;
pub use resource::{AuthResource, ClientAuthType};
pub use token::{DeviceAuthorization, PollOptions, TokenClient, TokenResponse};

#[cfg(test)]
pub(crate) mod testdata {
    pub(crate) const RSA_JWK: &str = include_str!("testdata/rsa-private.jwk.json");
    pub(crate) const RSA_4096_JWK: &str = include_str!("testdata/rsa-4096-private.jwk.json");
    /// Base64 of the same 4096-bit key as OpenSSL writes it in PKCS#1 DER.
    pub(crate) const RSA_4096_PKCS1_DER: &str =
        include_str!("testdata/rsa-4096-private.pkcs1.der.b64");
}

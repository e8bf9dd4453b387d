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
//! Persisted CLI configuration: the current tenant and one stored token per
//! tenant.
//!
//! Layout: `model.rs` (`CliConfig`, `AuthConfig`), `store.rs` (file
//! location, load and save), `error.rs`.

pub mod error;
pub mod model;
pub mod store;

pub use error::{ConfigError, ConfigResult};
pub use model::{AuthConfig, CliConfig};
pub use store::{CONFIG_FILE_NAME, ConfigStore, ENV_VERIFY_HOME, default_path};

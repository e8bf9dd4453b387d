//! Error types for token acquisition.

use thiserror::Error;
use verify_client::ApiError;

/// Result alias for token acquisition.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised while obtaining an access token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Transport failure or an unclassified status from the tenant.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The token endpoint answered with an OAuth error document.
    #[error("token request rejected: {error}{}", suffix(.description.as_deref()))]
    OAuth {
        /// OAuth `error` code.
        error: String,
        /// OAuth `error_description`.
        description: Option<String>,
    },
    /// The operator declined the device authorization.
    #[error("device authorization was denied")]
    AccessDenied,
    /// The device code expired before the operator approved it.
    #[error("device code expired before authorization completed; run auth again")]
    ExpiredToken,
    /// Polling stopped after the configured number of attempts.
    #[error("no token after {polls} polls; run auth again")]
    PollLimit {
        /// Attempts made.
        polls: u32,
    },
    /// The private key could not be used for signing.
    #[error("invalid private key: {reason}")]
    InvalidKey {
        /// Human-readable reason.
        reason: String,
    },
    /// The private key was not valid JSON.
    #[error("private key is not a JSON Web Key")]
    KeyFormat {
        /// Source serde error.
        source: serde_json::Error,
    },
    /// Signing the client assertion failed.
    #[error("failed to sign client assertion")]
    Signing {
        /// Source signing error.
        source: jsonwebtoken::errors::Error,
    },
    /// A token endpoint response did not have the expected shape.
    #[error("unexpected {endpoint} response")]
    Decode {
        /// Endpoint label.
        endpoint: &'static str,
        /// Source serde error.
        source: serde_json::Error,
    },
}

fn suffix(description: Option<&str>) -> String {
    description.map(|text| format!(": {text}")).unwrap_or_default()
}

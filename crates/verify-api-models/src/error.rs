//! Error types for envelope decoding and resource validation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while decoding or validating resource files.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The envelope named a different kind than the command expects.
    #[error("resource kind '{found}' does not match the expected kind '{expected}'")]
    KindMismatch {
        /// Kind the command operates on.
        expected: &'static str,
        /// Kind declared in the file (empty when absent).
        found: String,
    },
    /// A required field was missing or empty.
    #[error("{kind}: '{field}' is required")]
    MissingField {
        /// Kind of the resource being validated.
        kind: &'static str,
        /// JSON name of the missing field.
        field: &'static str,
    },
    /// A field was present but held an unusable value.
    #[error("{kind}: '{field}' is invalid: {reason}")]
    InvalidField {
        /// Kind of the resource being validated.
        kind: &'static str,
        /// JSON name of the offending field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
    /// Reading a resource file or a referenced file failed.
    #[error("failed to read {}", path.display())]
    Read {
        /// Path that could not be read.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The document was not valid JSON.
    #[error("invalid JSON document")]
    Json {
        /// Source serde error.
        source: serde_json::Error,
    },
    /// The document was not valid YAML.
    #[error("invalid YAML document")]
    Yaml {
        /// Source serde error.
        source: serde_yaml::Error,
    },
}

impl ModelError {
    /// Whether the error stems from user input rather than the environment.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::KindMismatch { .. } | Self::MissingField { .. } | Self::InvalidField { .. }
        )
    }
}

//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `VERIFY_HOME` nor a home directory is available.
    #[error("cannot locate the config directory; set VERIFY_HOME")]
    NoHome,
    /// Reading the config file failed.
    #[error("failed to read config {}", path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Writing the config file or its directory failed.
    #[error("failed to write config {}", path.display())]
    Write {
        /// Path being written.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The config file is not valid YAML of the expected shape.
    #[error("config {} is malformed", path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// Serialising the config failed.
    #[error("failed to encode config")]
    Encode {
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// The file declares a different kind.
    #[error("config {} has kind '{found}', expected '{expected}'", path.display())]
    KindMismatch {
        /// Config file path.
        path: PathBuf,
        /// Expected kind.
        expected: &'static str,
        /// Kind found in the file.
        found: String,
    },
}

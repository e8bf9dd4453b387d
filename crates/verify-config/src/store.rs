//! Locating, loading and saving the config file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use verify_api_models::kinds;

use crate::error::{ConfigError, ConfigResult};
use crate::model::CliConfig;

/// Environment variable naming the config directory.
pub const ENV_VERIFY_HOME: &str = "VERIFY_HOME";
/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config";
const DEFAULT_DIR: &str = ".verify";

/// `$VERIFY_HOME/config`, else `~/.verify/config`.
///
/// # Errors
///
/// Returns [`ConfigError::NoHome`] when neither location is known.
pub fn default_path() -> ConfigResult<PathBuf> {
    resolve_path(
        std::env::var_os(ENV_VERIFY_HOME).map(PathBuf::from),
        dirs::home_dir(),
    )
}

fn resolve_path(verify_home: Option<PathBuf>, home: Option<PathBuf>) -> ConfigResult<PathBuf> {
    verify_home
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| home.map(|dir| dir.join(DEFAULT_DIR)))
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoHome)
}

/// Config file at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`default_path`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHome`] when no location is known.
    pub fn from_env() -> ConfigResult<Self> {
        default_path().map(Self::new)
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config; a missing file yields an empty config.
    ///
    /// # Errors
    ///
    /// Returns read, parse or kind errors naming the file.
    pub fn load(&self) -> ConfigResult<CliConfig> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no config file yet");
                return Ok(CliConfig::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if text.trim().is_empty() {
            return Ok(CliConfig::default());
        }
        let config: CliConfig =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        if config.kind != kinds::CONFIG {
            return Err(ConfigError::KindMismatch {
                path: self.path.clone(),
                expected: kinds::CONFIG,
                found: config.kind,
            });
        }
        Ok(config)
    }

    /// Write the config, creating the parent directory when needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Write`] when the directory or file cannot be
    /// written.
    pub fn save(&self, config: &CliConfig) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let text = serde_yaml::to_string(config).map_err(|source| ConfigError::Encode { source })?;
        write_private(&self.path, text.as_bytes()).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

// Tokens live in this file: create it owner-only and tighten an existing
// file before any bytes are written.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        options.mode(0o600);
        let file = options.open(path)?;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        write_all(file, contents)
    }
    #[cfg(not(unix))]
    {
        write_all(options.open(path)?, contents)
    }
}

fn write_all(mut file: File, contents: &[u8]) -> io::Result<()> {
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AuthConfig;

    #[test]
    fn verify_home_wins_over_home_dir() -> anyhow::Result<()> {
        let path = resolve_path(Some("/tmp/vh".into()), Some("/home/op".into()))?;
        assert_eq!(path, PathBuf::from("/tmp/vh/config"));
        let path = resolve_path(None, Some("/home/op".into()))?;
        assert_eq!(path, PathBuf::from("/home/op/.verify/config"));
        let path = resolve_path(Some(PathBuf::new()), Some("/home/op".into()))?;
        assert_eq!(path, PathBuf::from("/home/op/.verify/config"));
        assert!(matches!(resolve_path(None, None), Err(ConfigError::NoHome)));
        Ok(())
    }

    #[test]
    fn missing_file_loads_empty_config() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = ConfigStore::new(dir.path().join("nested/config"));
        let config = store.load()?;
        assert_eq!(config, CliConfig::default());
        Ok(())
    }

    #[test]
    fn save_then_load_preserves_entries() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = ConfigStore::new(dir.path().join("nested/config"));
        let mut config = CliConfig::default();
        config.set_current("acme.verify.ibm.com");
        config.upsert_auth(AuthConfig {
            tenant: "acme.verify.ibm.com".into(),
            token: "tok".into(),
            is_user: true,
        });
        store.save(&config)?;

        let text = fs::read_to_string(store.path())?;
        assert!(text.contains("kind: IBMVerifyConfig"));
        assert!(text.contains("isUser: true"));
        assert_eq!(store.load()?, config);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn new_config_file_is_owner_only() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let store = ConfigStore::new(dir.path().join("config"));
        store.save(&CliConfig::default())?;
        let mode = fs::metadata(store.path())?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn existing_readable_file_is_tightened() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config");
        fs::write(
            &path,
            "kind: IBMVerifyConfig\napiVersion: \"1.0\"\nauth: []\nextra: leftover-from-a-longer-file\n",
        )?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644))?;

        let store = ConfigStore::new(&path);
        store.save(&CliConfig::default())?;

        assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, 0o600);
        assert!(!fs::read_to_string(&path)?.contains("leftover"));
        Ok(())
    }

    #[test]
    fn wrong_kind_is_rejected() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config");
        fs::write(&path, "kind: IBMVerifyUser\napiVersion: \"1.0\"\n")?;
        let err = ConfigStore::new(&path).load().expect_err("kind mismatch");
        assert!(matches!(err, ConfigError::KindMismatch { .. }));
        Ok(())
    }

    #[test]
    fn malformed_yaml_names_the_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config");
        fs::write(&path, "auth: [unterminated")?;
        let err = ConfigStore::new(&path).load().expect_err("parse error");
        assert!(err.to_string().contains("config"));
        assert!(matches!(err, ConfigError::Parse { .. }));
        Ok(())
    }
}

//! Branding themes served by `/v1.0/branding/themes`.
//!
//! A theme file names a zip archive holding the templates; the archive is
//! uploaded alongside the registration JSON as multipart form data.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::envelope::{ResourceData, kinds, require, require_some};
use crate::error::{ModelError, ModelResult};

/// Theme registration plus the archive to upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Theme name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether templates differ from the master theme (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customized: Option<bool>,
    /// Whether this is the tenant default (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    /// Path to the zip archive, relative to the theme file. A leading `@` is
    /// accepted and ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    /// Archive contents loaded by [`ResourceData::resolve_files`].
    #[serde(skip)]
    pub archive_bytes: Vec<u8>,
}

impl Theme {
    /// File name sent with the multipart `files` part.
    #[must_use]
    pub fn archive_file_name(&self) -> String {
        self.archive
            .as_deref()
            .map(|archive| archive.trim_start_matches('@'))
            .and_then(|archive| Path::new(archive).file_name())
            .and_then(|name| name.to_str())
            .map_or_else(|| "theme.zip".to_string(), str::to_string)
    }

    /// Registration JSON sent as the multipart `configuration` part.
    #[must_use]
    pub fn configuration(&self) -> serde_json::Value {
        let mut configuration = serde_json::json!({ "name": self.name });
        if let Some(description) = &self.description {
            configuration["description"] = serde_json::Value::String(description.clone());
        }
        configuration
    }
}

/// List response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeList {
    /// Number of registrations.
    #[serde(default)]
    pub count: Option<u64>,
    /// Registrations in this page.
    #[serde(default)]
    pub theme_registrations: Vec<Theme>,
}

impl ResourceData for Theme {
    const KIND: &'static str = kinds::THEME;

    fn validate(&self) -> ModelResult<()> {
        require(Self::KIND, "name", &self.name)?;
        require_some(Self::KIND, "archive", self.archive.as_ref())?;
        Ok(())
    }

    fn boilerplate() -> Self {
        Self {
            name: "Corporate".to_string(),
            description: Some("Corporate look and feel".to_string()),
            archive: Some("@corporate-theme.zip".to_string()),
            ..Self::default()
        }
    }

    fn display_name(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn resolve_files(&mut self, base_dir: &Path) -> ModelResult<()> {
        let Some(archive) = self.archive.as_deref() else {
            return Ok(());
        };
        let path = base_dir.join(archive.trim_start_matches('@'));
        self.archive_bytes = fs::read(&path).map_err(|source| ModelError::Read { path, source })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_is_read_relative_to_theme_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("brand.zip"), b"PK\x03\x04")?;
        let mut theme = Theme {
            name: "brand".into(),
            archive: Some("@brand.zip".into()),
            ..Theme::default()
        };
        theme.resolve_files(dir.path())?;
        assert_eq!(theme.archive_bytes, b"PK\x03\x04");
        assert_eq!(theme.archive_file_name(), "brand.zip");
        Ok(())
    }

    #[test]
    fn missing_archive_reports_path() {
        let mut theme = Theme {
            name: "brand".into(),
            archive: Some("absent.zip".into()),
            ..Theme::default()
        };
        let err = theme
            .resolve_files(Path::new("/nonexistent"))
            .expect_err("archive missing");
        assert!(err.to_string().contains("absent.zip"));
    }

    #[test]
    fn archive_is_required() {
        let theme = Theme {
            name: "brand".into(),
            ..Theme::default()
        };
        assert!(theme.validate().is_err());
    }
}

//! Resource file loading shared by `auth`, `create` and `replace`.

use std::path::{Path, PathBuf};

use verify_api_models::{ModelError, ResourceData, ResourceObject};

use crate::client::{CliError, CliResult};

/// Read an envelope, check its kind, resolve `@file` references relative to
/// the file, and validate required fields. No network access.
pub(crate) fn load_resource<T: ResourceData>(path: &Path) -> CliResult<T> {
    let item: T = read_resource(path)?;
    item.validate()?;
    Ok(item)
}

/// [`load_resource`] without the required-field check, for callers that
/// complete the payload from flags first.
pub(crate) fn read_resource<T: ResourceData>(path: &Path) -> CliResult<T> {
    let object = ResourceObject::read(path).map_err(|err| with_path(err, path))?;
    let mut item: T = object.into_data().map_err(|err| with_path(err, path))?;
    let base_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    item.resolve_files(&base_dir)?;
    tracing::debug!(path = %path.display(), kind = T::KIND, "resource loaded");
    Ok(item)
}

/// Require `-f FILE` for commands that read a resource.
pub(crate) fn require_file<'a>(file: Option<&'a Path>, command: &str) -> CliResult<&'a Path> {
    file.ok_or_else(|| CliError::validation(format!("{command} requires -f FILE")))
}

fn with_path(err: ModelError, path: &Path) -> CliError {
    match err {
        ModelError::Json { .. } | ModelError::Yaml { .. } => CliError::failure(
            anyhow::Error::new(err).context(format!("failed to parse {}", path.display())),
        ),
        ModelError::KindMismatch { .. } => {
            CliError::validation(format!("{}: {err}", path.display()))
        }
        other => other.into(),
    }
}

//! Output renderers for resources and lists.

use std::fs;
use std::path::Path;

use anyhow::anyhow;
use clap::ValueEnum;
use verify_api_models::{FileFormat, ResourceData, ResourceObject, ResourceObjectList};

use crate::client::{CliError, CliResult};

/// Output format for `get`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Envelope rendered as YAML.
    #[default]
    Yaml,
    /// Envelope rendered as JSON.
    Json,
    /// The API payload as JSON, without the envelope.
    Raw,
}

pub(crate) fn render_item<T: ResourceData>(item: &T, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Yaml => Ok(ResourceObject::wrap(item)?.render(FileFormat::Yaml)?),
        OutputFormat::Json => Ok(ResourceObject::wrap(item)?.render(FileFormat::Json)?),
        OutputFormat::Raw => raw_json(item),
    }
}

pub(crate) fn render_list<T: ResourceData>(
    items: &[T],
    total: Option<u64>,
    format: OutputFormat,
) -> CliResult<String> {
    let format = match format {
        OutputFormat::Yaml => FileFormat::Yaml,
        OutputFormat::Json => FileFormat::Json,
        OutputFormat::Raw => return raw_json(items),
    };
    Ok(ResourceObjectList::wrap(items, total)?.render(format)?)
}

fn raw_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

/// Print `text` to stdout, or write it to `outfile` when given.
pub(crate) fn emit(text: &str, outfile: Option<&Path>) -> CliResult<()> {
    let mut text = text.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    match outfile {
        Some(path) => {
            fs::write(path, text).map_err(|err| {
                CliError::failure(anyhow!("failed to write {}: {err}", path.display()))
            })?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => print!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use verify_api_models::Group;

    fn group() -> Group {
        Group {
            id: Some("g-1".into()),
            display_name: "admins".into(),
            ..Group::default()
        }
    }

    #[test]
    fn yaml_output_wraps_in_envelope() -> Result<()> {
        let text = render_item(&group(), OutputFormat::Yaml)?;
        assert!(text.contains("kind: IBMVerifyGroup"));
        assert!(text.contains("displayName: admins"));
        Ok(())
    }

    #[test]
    fn raw_output_omits_envelope() -> Result<()> {
        let text = render_item(&group(), OutputFormat::Raw)?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(value["displayName"], "admins");
        assert!(value.get("kind").is_none());
        Ok(())
    }

    #[test]
    fn list_output_carries_total() -> Result<()> {
        let text = render_list(&[group(), group()], Some(7), OutputFormat::Json)?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(value["kind"], "List");
        assert_eq!(value["metadata"]["total"], 7);
        assert_eq!(value["items"].as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[test]
    fn outfile_receives_the_text() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.yaml");
        emit("kind: List", Some(&path))?;
        assert_eq!(fs::read_to_string(&path)?, "kind: List\n");
        Ok(())
    }
}

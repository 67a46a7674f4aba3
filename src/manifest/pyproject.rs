use super::{ManifestParser, ManifestSource};
use crate::error::Result;
use toml::{Table, Value};

/// Reads the version of a Python project manifest
///
/// Looks under `[tool.<section>]` for each configured packaging tool
/// (`poetry` by default), then under the standard `[project]` table.
pub struct PyProjectParser {
    file_names: Vec<String>,
    tool_sections: Vec<String>,
}

impl PyProjectParser {
    pub fn new(file_names: Vec<String>, tool_sections: Vec<String>) -> Self {
        PyProjectParser {
            file_names,
            tool_sections,
        }
    }
}

impl Default for PyProjectParser {
    fn default() -> Self {
        Self::new(
            vec!["pyproject.toml".to_string(), "project.toml".to_string()],
            vec!["poetry".to_string()],
        )
    }
}

fn version_in(table: Option<&Value>) -> Option<String> {
    table
        .and_then(|t| t.get("version"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl ManifestParser for PyProjectParser {
    fn source(&self) -> ManifestSource {
        ManifestSource::ProjectManifest
    }

    fn file_names(&self) -> &[String] {
        &self.file_names
    }

    fn parse_version(&self, content: &str) -> Result<Option<String>> {
        let table: Table = toml::from_str(content)?;

        let tool = table.get("tool");
        for section in &self.tool_sections {
            if let Some(version) = version_in(tool.and_then(|t| t.get(section))) {
                return Ok(Some(version));
            }
        }

        Ok(version_in(table.get("project")))
    }
}

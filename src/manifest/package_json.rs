use super::{ManifestParser, ManifestSource};
use crate::error::Result;
use serde_json::Value;

/// Reads the top-level `version` field of a `package.json`
pub struct PackageJsonParser {
    file_names: Vec<String>,
}

impl PackageJsonParser {
    pub fn new(file_name: impl Into<String>) -> Self {
        PackageJsonParser {
            file_names: vec![file_name.into()],
        }
    }
}

impl Default for PackageJsonParser {
    fn default() -> Self {
        Self::new("package.json")
    }
}

impl ManifestParser for PackageJsonParser {
    fn source(&self) -> ManifestSource {
        ManifestSource::JsManifest
    }

    fn file_names(&self) -> &[String] {
        &self.file_names
    }

    fn parse_version(&self, content: &str) -> Result<Option<String>> {
        let value: Value = serde_json::from_str(content)?;

        Ok(value
            .get("version")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}

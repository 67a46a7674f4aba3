//! Manifest parsing and per-branch version extraction
//!
//! Two manifest formats are understood, each behind [ManifestParser]:
//!
//! - [package_json::PackageJsonParser]: flat JSON, top-level `version`
//! - [pyproject::PyProjectParser]: nested TOML, `[tool.<packager>]` or `[project]`
//!
//! [VersionExtractor] tries them in precedence order against a branch and
//! returns the first version found.

pub mod package_json;
pub mod pyproject;

pub use package_json::PackageJsonParser;
pub use pyproject::PyProjectParser;

use crate::boundary::BoundaryWarning;
use crate::config::ManifestsConfig;
use crate::error::{ReleaseBranchError, Result};
use crate::git::Repository;
use crate::ui;
use serde::Serialize;
use std::fmt;

/// Byte-order mark some editors write at the start of UTF-8 files
const UTF8_BOM: char = '\u{feff}';

/// Which manifest format supplied a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestSource {
    JsManifest,
    ProjectManifest,
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::JsManifest => write!(f, "package manifest"),
            ManifestSource::ProjectManifest => write!(f, "project manifest"),
        }
    }
}

/// A manifest format that can yield a version string
pub trait ManifestParser {
    /// The format this parser handles
    fn source(&self) -> ManifestSource;

    /// Candidate file names, tried in order
    fn file_names(&self) -> &[String];

    /// Extract the version from manifest text
    ///
    /// # Returns
    /// * `Ok(Some(version))` - Version string, verbatim
    /// * `Ok(None)` - Manifest is well-formed but declares no version
    /// * `Err` - Manifest cannot be parsed in this format
    fn parse_version(&self, content: &str) -> Result<Option<String>>;
}

/// A version string read from a branch, with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedVersion {
    pub version: String,
    pub source: ManifestSource,
    pub path: String,
}

/// Reads a branch's manifests in precedence order
pub struct VersionExtractor {
    parsers: Vec<Box<dyn ManifestParser>>,
    project_dir: String,
}

impl VersionExtractor {
    /// Create an extractor with an explicit parser order
    pub fn new(parsers: Vec<Box<dyn ManifestParser>>, project_dir: impl Into<String>) -> Self {
        VersionExtractor {
            parsers,
            project_dir: project_dir.into(),
        }
    }

    /// Package manifest first, then project manifest
    pub fn from_config(config: &ManifestsConfig, project_dir: &str) -> Self {
        Self::new(
            vec![
                Box::new(PackageJsonParser::new(config.package_json.clone())),
                Box::new(PyProjectParser::new(
                    config.project_files.clone(),
                    config.tool_sections.clone(),
                )),
            ],
            project_dir,
        )
    }

    /// Read one explicitly named manifest, picking the format by extension
    ///
    /// # Returns
    /// * `Err(UnsupportedManifest)` - Neither `.json` nor `.toml`
    pub fn for_manifest_file(path: &str, config: &ManifestsConfig) -> Result<Self> {
        let lower = path.to_ascii_lowercase();
        let parser: Box<dyn ManifestParser> = if lower.ends_with(".json") {
            Box::new(PackageJsonParser::new(path))
        } else if lower.ends_with(".toml") {
            Box::new(PyProjectParser::new(
                vec![path.to_string()],
                config.tool_sections.clone(),
            ))
        } else {
            return Err(ReleaseBranchError::unsupported_manifest(format!(
                "'{}' is neither a JSON package manifest nor a TOML project manifest",
                path
            )));
        };

        Ok(Self::new(vec![parser], ""))
    }

    /// Repository path of a manifest file
    pub fn manifest_path(&self, file_name: &str) -> String {
        let dir = self.project_dir.trim_matches('/');
        if dir.is_empty() || dir == "." {
            file_name.to_string()
        } else {
            format!("{}/{}", dir, file_name)
        }
    }

    /// Extract the first declared version on a branch
    ///
    /// Missing branches, missing manifests, unparsable manifests and
    /// manifests without a version all yield `Ok(None)`. Only repository
    /// access failures are errors.
    pub fn extract<R: Repository>(
        &self,
        repo: &R,
        branch: &str,
    ) -> Result<Option<ExtractedVersion>> {
        for parser in &self.parsers {
            for file_name in parser.file_names() {
                let path = self.manifest_path(file_name);

                let bytes = match repo.read_file_at_ref(branch, &path)? {
                    Some(bytes) => bytes,
                    None => {
                        tracing::debug!(branch, path = %path, "manifest not present");
                        continue;
                    }
                };

                let content = match String::from_utf8(bytes) {
                    Ok(content) => content,
                    Err(e) => {
                        ui::display_boundary_warning(&BoundaryWarning::UnparsableManifest {
                            branch: branch.to_string(),
                            path,
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };

                let text = content.strip_prefix(UTF8_BOM).unwrap_or(content.as_str());

                match parser.parse_version(text) {
                    Ok(Some(version)) => {
                        tracing::info!(
                            branch,
                            path = %path,
                            version = %version,
                            source = %parser.source(),
                            "found version"
                        );
                        return Ok(Some(ExtractedVersion {
                            version,
                            source: parser.source(),
                            path,
                        }));
                    }
                    Ok(None) => {
                        ui::display_boundary_warning(&BoundaryWarning::MissingVersionField {
                            branch: branch.to_string(),
                            path,
                        });
                    }
                    Err(e) => {
                        ui::display_boundary_warning(&BoundaryWarning::UnparsableManifest {
                            branch: branch.to_string(),
                            path,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        Ok(None)
    }
}

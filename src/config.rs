use crate::domain::DEFAULT_TICKET;
use crate::error::{ReleaseBranchError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "release-branch.toml";

/// Represents the complete configuration for release-branch.
///
/// Every value here is a fallback: command-line flags and CI environment
/// variables take precedence when set.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub manifests: ManifestsConfig,
}

fn default_stable_branch() -> String {
    "main".to_string()
}

fn default_ticket_placeholder() -> String {
    DEFAULT_TICKET.to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Fallback values for run inputs.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DefaultsConfig {
    #[serde(default = "default_stable_branch")]
    pub stable_branch: String,

    #[serde(default = "default_ticket_placeholder")]
    pub ticket_placeholder: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Also tag the release commit `v<version>`
    #[serde(default)]
    pub create_tag: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            stable_branch: default_stable_branch(),
            ticket_placeholder: default_ticket_placeholder(),
            remote: default_remote(),
            create_tag: false,
        }
    }
}

fn default_package_json() -> String {
    "package.json".to_string()
}

fn default_project_files() -> Vec<String> {
    vec!["pyproject.toml".to_string(), "project.toml".to_string()]
}

fn default_tool_sections() -> Vec<String> {
    vec!["poetry".to_string()]
}

/// Where manifests live and how to read them.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ManifestsConfig {
    /// File name of the JavaScript package manifest
    #[serde(default = "default_package_json")]
    pub package_json: String,

    /// Python project manifest file names, tried in order
    #[serde(default = "default_project_files")]
    pub project_files: Vec<String>,

    /// `[tool.<name>]` tables searched for a version, in order
    #[serde(default = "default_tool_sections")]
    pub tool_sections: Vec<String>,

    /// Directory holding the manifests, relative to the repository root
    #[serde(default)]
    pub project_dir: String,
}

impl Default for ManifestsConfig {
    fn default() -> Self {
        ManifestsConfig {
            package_json: default_package_json(),
            project_files: default_project_files(),
            tool_sections: default_tool_sections(),
            project_dir: String::new(),
        }
    }
}

fn find_config_file() -> Option<PathBuf> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-branch.toml` in current directory
/// 3. `release-branch.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = match config_path {
        Some(path) => PathBuf::from(path),
        None => match find_config_file() {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };

    tracing::debug!(path = %path.display(), "loading configuration");

    let config_str = fs::read_to_string(&path).map_err(|e| {
        ReleaseBranchError::config(format!("Cannot read '{}': {}", path.display(), e))
    })?;

    parse_config(&config_str)
        .map_err(|e| ReleaseBranchError::config(format!("Invalid '{}': {}", path.display(), e)))
}

/// Parses configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

//! Input resolution
//!
//! Run inputs arrive from three places: command-line flags, CI environment
//! variables, and the configuration file. They are merged once, at start-up,
//! into an immutable [ReleaseContext] that the rest of the pipeline receives
//! as a parameter.

use crate::config::Config;
use crate::domain::branch::{normalize_branch_name, ticket_from_branch};

/// Environment variables consulted for each input, first set wins
pub const STABLE_BRANCH_VARS: &[&str] = &["STABLE_BRANCH", "MAIN_BRANCH"];
pub const FEATURE_BRANCH_VARS: &[&str] =
    &["FEATURE_BRANCH", "BUILD_SOURCEBRANCHNAME", "BUILD_SOURCEBRANCH"];
pub const TICKET_VARS: &[&str] = &["TICKET_NUMBER"];
pub const PUSH_VARS: &[&str] = &["PUSH_RELEASE_BRANCH"];
pub const PROJECT_PATH_VARS: &[&str] = &["PROJECT_PATH"];
pub const MANIFEST_VARS: &[&str] = &["MANIFEST_PATH"];
pub const REMOTE_VARS: &[&str] = &["RELEASE_REMOTE"];
pub const TAG_VARS: &[&str] = &["CREATE_RELEASE_TAG"];

/// Feature branch used when nothing names one and HEAD is detached
pub const DETACHED_FEATURE_BRANCH: &str = "HEAD";

/// Unresolved inputs, all optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub stable_branch: Option<String>,
    pub feature_branch: Option<String>,
    pub ticket: Option<String>,
    pub push: Option<String>,
    pub project_path: Option<String>,
    pub manifest: Option<String>,
    pub remote: Option<String>,
    pub tag: Option<String>,
}

fn first_set<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RawInputs {
    /// Read inputs from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read inputs through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        RawInputs {
            stable_branch: first_set(&lookup, STABLE_BRANCH_VARS),
            feature_branch: first_set(&lookup, FEATURE_BRANCH_VARS),
            ticket: first_set(&lookup, TICKET_VARS),
            push: first_set(&lookup, PUSH_VARS),
            project_path: first_set(&lookup, PROJECT_PATH_VARS),
            manifest: first_set(&lookup, MANIFEST_VARS),
            remote: first_set(&lookup, REMOTE_VARS),
            tag: first_set(&lookup, TAG_VARS),
        }
    }

    /// Layer `overrides` on top of `self`; set values in `overrides` win
    pub fn overridden_by(self, overrides: RawInputs) -> Self {
        RawInputs {
            stable_branch: non_empty(overrides.stable_branch).or(self.stable_branch),
            feature_branch: non_empty(overrides.feature_branch).or(self.feature_branch),
            ticket: non_empty(overrides.ticket).or(self.ticket),
            push: non_empty(overrides.push).or(self.push),
            project_path: non_empty(overrides.project_path).or(self.project_path),
            manifest: non_empty(overrides.manifest).or(self.manifest),
            remote: non_empty(overrides.remote).or(self.remote),
            tag: non_empty(overrides.tag).or(self.tag),
        }
    }
}

/// Interpret a push or tag flag value (`1`, `true`, `yes`, case-insensitive)
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// Resolved inputs for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseContext {
    pub stable_branch: String,
    pub feature_branch: String,
    /// Ticket as given; sanitized only when the branch name is built
    pub ticket_number: String,
    pub ticket_placeholder: String,
    pub push: bool,
    /// Tag the release commit `v<version>`
    pub tag: bool,
    pub remote: String,
    pub project_dir: String,
    /// Explicit manifest path, bypassing format auto-detection
    pub manifest: Option<String>,
}

impl ReleaseContext {
    /// Merge raw inputs with configured defaults
    ///
    /// `current_branch` is the checked-out branch, used when no feature
    /// branch is named. Never fails: every input has a default.
    pub fn resolve(inputs: RawInputs, config: &Config, current_branch: Option<String>) -> Self {
        let stable_branch = inputs
            .stable_branch
            .as_deref()
            .map(normalize_branch_name)
            .unwrap_or_else(|| config.defaults.stable_branch.clone());

        let feature_branch = inputs
            .feature_branch
            .or(current_branch)
            .as_deref()
            .map(normalize_branch_name)
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| DETACHED_FEATURE_BRANCH.to_string());

        let ticket_number = inputs
            .ticket
            .or_else(|| ticket_from_branch(&feature_branch))
            .unwrap_or_else(|| config.defaults.ticket_placeholder.clone());

        let push = inputs.push.as_deref().map(parse_flag).unwrap_or(false);
        let tag = inputs
            .tag
            .as_deref()
            .map(parse_flag)
            .unwrap_or(config.defaults.create_tag);

        ReleaseContext {
            stable_branch,
            feature_branch,
            ticket_number,
            ticket_placeholder: config.defaults.ticket_placeholder.clone(),
            push,
            tag,
            remote: inputs
                .remote
                .unwrap_or_else(|| config.defaults.remote.clone()),
            project_dir: inputs
                .project_path
                .unwrap_or_else(|| config.manifests.project_dir.clone()),
            manifest: inputs.manifest,
        }
    }
}

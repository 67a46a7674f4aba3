//! Command-line surface
//!
//! Flags mirror the CI environment variables and take precedence over them.

pub mod orchestration;

use std::path::PathBuf;

use chrono::Utc;
use clap::ArgAction;

use crate::config::load_config;
use crate::context::{RawInputs, ReleaseContext};
use crate::domain::ReleaseResult;
use crate::git::{Git2Repository, Repository};

#[derive(Debug, clap::Parser)]
#[command(
    name = "release-branch",
    version,
    about = "Create a release branch when the feature branch declares a higher version"
)]
pub struct Cli {
    #[arg(short, long, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(long, default_value = ".", help = "Repository to operate on")]
    pub repo: PathBuf,

    #[arg(long, help = "Baseline branch [env: STABLE_BRANCH, MAIN_BRANCH]")]
    pub stable_branch: Option<String>,

    #[arg(long, help = "Candidate branch [env: FEATURE_BRANCH]")]
    pub feature_branch: Option<String>,

    #[arg(long, help = "Ticket identifier for the branch name [env: TICKET_NUMBER]")]
    pub ticket: Option<String>,

    #[arg(long, help = "Push the created branch [env: PUSH_RELEASE_BRANCH]")]
    pub push: bool,

    #[arg(long, help = "Tag the release commit v<version> [env: CREATE_RELEASE_TAG]")]
    pub tag: bool,

    #[arg(long, help = "Directory holding the manifests [env: PROJECT_PATH]")]
    pub project_path: Option<String>,

    #[arg(long, help = "Read exactly this manifest file [env: MANIFEST_PATH]")]
    pub manifest: Option<String>,

    #[arg(long, help = "Remote to push to [env: RELEASE_REMOTE]")]
    pub remote: Option<String>,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
}

impl Cli {
    /// Inputs given explicitly on the command line
    pub fn overrides(&self) -> RawInputs {
        RawInputs {
            stable_branch: self.stable_branch.clone(),
            feature_branch: self.feature_branch.clone(),
            ticket: self.ticket.clone(),
            push: self.push.then(|| "true".to_string()),
            project_path: self.project_path.clone(),
            manifest: self.manifest.clone(),
            remote: self.remote.clone(),
            tag: self.tag.then(|| "true".to_string()),
        }
    }

    /// Resolve inputs, open the repository and run the workflow
    pub fn run(&self) -> ReleaseResult {
        let config = match load_config(self.config.as_deref()) {
            Ok(config) => config,
            Err(e) => return ReleaseResult::failed("load configuration", e),
        };

        let repo = match Git2Repository::open(&self.repo) {
            Ok(repo) => repo,
            Err(e) => return ReleaseResult::failed("open repository", e),
        };

        let current_branch = match repo.current_branch() {
            Ok(branch) => branch,
            Err(e) => {
                tracing::warn!(error = %e, "cannot determine the checked-out branch");
                None
            }
        };

        let inputs = RawInputs::from_env().overridden_by(self.overrides());
        let ctx = ReleaseContext::resolve(inputs, &config, current_branch);
        let repo = repo.with_remote(ctx.remote.clone());

        orchestration::run_release_workflow(&repo, &ctx, &config, Utc::now().date_naive())
    }

    /// Log to stderr; `RUST_LOG` wins over `-v`
    pub fn setup_logging(&self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::default().add_directive(level.into()));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(console::colors_enabled_stderr())
            .with_target(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["release-branch"]).unwrap();
        assert_eq!(cli.repo, PathBuf::from("."));
        assert!(!cli.push);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.overrides(), RawInputs::default());
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "release-branch",
            "--stable-branch",
            "master",
            "--feature-branch",
            "feature/x",
            "--ticket",
            "PROJ-9",
            "--push",
            "--tag",
            "-vv",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.stable_branch.as_deref(), Some("master"));
        assert_eq!(overrides.feature_branch.as_deref(), Some("feature/x"));
        assert_eq!(overrides.ticket.as_deref(), Some("PROJ-9"));
        assert_eq!(overrides.push.as_deref(), Some("true"));
        assert_eq!(overrides.tag.as_deref(), Some("true"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["release-branch", "--dry-run"]).is_err());
    }

    #[test]
    fn test_open_failure_is_failed_outcome() {
        let dir = tempfile::TempDir::new().unwrap();
        let cli = Cli::try_parse_from([
            "release-branch",
            "--repo",
            dir.path().join("missing").to_str().unwrap(),
        ])
        .unwrap();

        let result = cli.run();
        assert_eq!(result.outcome(), "failed");
        assert_eq!(result.exit_code(), 1);
    }
}

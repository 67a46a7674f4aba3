//! Release workflow orchestration
//!
//! Runs the four pipeline stages in order and folds every outcome,
//! including repository failures, into a single [ReleaseResult]:
//!
//! ```text
//! inputs resolved -> versions extracted -> compared -> created | already_exists | skipped | failed
//! ```
//!
//! Nothing here reads the environment or the clock; the caller supplies the
//! resolved context and the run date.

use chrono::NaiveDate;

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::context::ReleaseContext;
use crate::domain::{
    release_branch_name, release_tag_name, sanitize_ticket, Comparison, ParsedVersion,
    ReleaseResult, SkipReason,
};
use crate::error::{ReleaseBranchError, Result};
use crate::git::{BranchLocation, RefCreation, Repository};
use crate::manifest::{ExtractedVersion, VersionExtractor};
use crate::ui;

/// Versions found on both branches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchVersions {
    pub stable: Option<ExtractedVersion>,
    pub feature: Option<ExtractedVersion>,
}

/// What the comparison stage decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseDecision {
    /// Feature is strictly greater; both VersionStrings verbatim
    Release {
        version: String,
        stable_version: String,
    },
    Skip(ReleaseResult),
}

/// Pick the extractor for this run
pub fn build_extractor(ctx: &ReleaseContext, config: &Config) -> Result<VersionExtractor> {
    match &ctx.manifest {
        Some(path) => VersionExtractor::for_manifest_file(path, &config.manifests),
        None => Ok(VersionExtractor::from_config(
            &config.manifests,
            &ctx.project_dir,
        )),
    }
}

/// Version Extraction: read both branches without touching the work tree
pub fn extract_versions<R: Repository>(
    repo: &R,
    ctx: &ReleaseContext,
    extractor: &VersionExtractor,
) -> Result<BranchVersions> {
    let mut versions = BranchVersions {
        stable: None,
        feature: None,
    };

    for (branch, slot) in [
        (&ctx.stable_branch, &mut versions.stable),
        (&ctx.feature_branch, &mut versions.feature),
    ] {
        if repo.resolve_branch(branch)?.is_none() {
            ui::display_boundary_warning(&BoundaryWarning::BranchNotFound {
                branch: branch.clone(),
            });
            continue;
        }
        *slot = extractor.extract(repo, branch)?;
    }

    Ok(versions)
}

fn parse_or_warn(branch: &str, extracted: &ExtractedVersion) -> Option<ParsedVersion> {
    match ParsedVersion::parse(&extracted.version) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            ui::display_boundary_warning(&BoundaryWarning::MalformedVersion {
                branch: branch.to_string(),
                version: extracted.version.clone(),
                reason: e.to_string(),
            });
            None
        }
    }
}

/// Version Comparison: release only when feature > stable
///
/// A missing or malformed version on either side is "no version found".
pub fn decide(ctx: &ReleaseContext, versions: &BranchVersions) -> ReleaseDecision {
    let feature_text = versions.feature.as_ref().map(|v| v.version.clone());
    let stable_text = versions.stable.as_ref().map(|v| v.version.clone());

    let stable = versions
        .stable
        .as_ref()
        .and_then(|v| parse_or_warn(&ctx.stable_branch, v));
    let feature = versions
        .feature
        .as_ref()
        .and_then(|v| parse_or_warn(&ctx.feature_branch, v));

    let (Some(stable), Some(feature)) = (stable, feature) else {
        return ReleaseDecision::Skip(ReleaseResult::skipped(
            SkipReason::NoVersionFound,
            feature_text,
            stable_text,
        ));
    };

    let comparison = feature.compare_to(&stable);
    tracing::info!(
        stable = %stable,
        feature = %feature,
        ?comparison,
        "compared versions"
    );

    let reason = match comparison {
        Comparison::Greater => {
            return ReleaseDecision::Release {
                version: feature_text.unwrap_or_else(|| feature.to_string()),
                stable_version: stable_text.unwrap_or_else(|| stable.to_string()),
            }
        }
        Comparison::Equal => SkipReason::VersionsEqual,
        Comparison::Lower => SkipReason::NotGreater,
    };

    ReleaseDecision::Skip(ReleaseResult::skipped(reason, feature_text, stable_text))
}

/// Push when requested; a failure is reported, never propagated
fn push_if_requested<R: Repository>(
    repo: &R,
    ctx: &ReleaseContext,
    branch: &str,
    refs: &[String],
) -> (bool, Option<String>) {
    if !ctx.push {
        return (false, None);
    }
    if refs.is_empty() {
        tracing::info!(branch, remote = %ctx.remote, "release branch already on remote");
        return (false, None);
    }

    tracing::info!(branch, remote = %ctx.remote, refs = ?refs, "pushing release refs");
    match repo.push_refs(refs) {
        Ok(()) => (true, None),
        Err(e) => {
            ui::display_boundary_warning(&BoundaryWarning::PushFailed {
                remote: ctx.remote.clone(),
                branch: branch.to_string(),
                reason: e.to_string(),
            });
            (false, Some(format!("push failed: {}", e)))
        }
    }
}

/// Compute the release branch name for the given version and date
pub fn compute_branch_name(ctx: &ReleaseContext, version: &str, today: NaiveDate) -> String {
    let ticket = sanitize_ticket(&ctx.ticket_number, &ctx.ticket_placeholder);
    if ticket != ctx.ticket_number {
        ui::display_boundary_warning(&BoundaryWarning::TicketSanitized {
            original: ctx.ticket_number.clone(),
            sanitized: ticket.clone(),
        });
    }

    release_branch_name(&ticket, version, today)
}

/// Place the release tag on the release branch tip, leaving an existing
/// tag untouched
fn tag_release<R: Repository>(repo: &R, branch: &str, tag: &str) -> Result<()> {
    let target = repo.resolve_branch(branch)?.ok_or_else(|| {
        ReleaseBranchError::tag(format!("Release branch '{}' does not resolve", branch))
    })?;

    match repo.create_tag(tag, target)? {
        RefCreation::Created => tracing::info!(tag, commit = %target, "created release tag"),
        RefCreation::AlreadyExists => tracing::info!(tag, "release tag already exists"),
    }
    Ok(())
}

/// Release Branch Materialization: create (and optionally tag and push)
/// the branch
///
/// An existing branch with the same name is reported as `already_exists`.
/// A branch that exists only on the remote is never pushed from here.
pub fn materialize<R: Repository>(
    repo: &R,
    ctx: &ReleaseContext,
    version: &str,
    stable_version: &str,
    today: NaiveDate,
) -> Result<ReleaseResult> {
    let branch = compute_branch_name(ctx, version, today);

    if !git2::Reference::is_valid_name(&format!("refs/heads/{}", branch)) {
        return Err(ReleaseBranchError::branch(format!(
            "'{}' is not a valid branch name",
            branch
        )));
    }

    let tag = if ctx.tag {
        let tag = release_tag_name(version);
        if !git2::Reference::is_valid_name(&format!("refs/tags/{}", tag)) {
            return Err(ReleaseBranchError::tag(format!(
                "'{}' is not a valid tag name",
                tag
            )));
        }
        Some(tag)
    } else {
        None
    };

    let location = repo.branch_location(&branch)?;
    let creation = match location {
        Some(_) => RefCreation::AlreadyExists,
        None => {
            let target = repo.resolve_branch(&ctx.feature_branch)?.ok_or_else(|| {
                ReleaseBranchError::branch(format!(
                    "Feature branch '{}' no longer resolves",
                    ctx.feature_branch
                ))
            })?;
            repo.create_branch(&branch, target)?
        }
    };

    if let Some(tag) = &tag {
        tag_release(repo, &branch, tag)?;
    }

    let mut refs = Vec::new();
    if location != Some(BranchLocation::RemoteOnly) {
        refs.push(format!("refs/heads/{}", branch));
    }
    if let Some(tag) = &tag {
        refs.push(format!("refs/tags/{}", tag));
    }
    let (pushed, reason) = push_if_requested(repo, ctx, &branch, &refs);

    Ok(match creation {
        RefCreation::Created => {
            tracing::info!(branch = %branch, version, pushed, "created release branch");
            ReleaseResult::Created {
                branch,
                version: version.to_string(),
                stable_version: stable_version.to_string(),
                pushed,
                tag,
                reason,
            }
        }
        RefCreation::AlreadyExists => {
            tracing::info!(branch = %branch, version, ?location, "release branch already exists");
            ReleaseResult::AlreadyExists {
                branch,
                version: version.to_string(),
                stable_version: stable_version.to_string(),
                pushed,
                tag,
                reason,
            }
        }
    })
}

/// Main release workflow
///
/// Orchestrates the whole run:
/// 1. Select the manifest parsers
/// 2. Extract versions from the stable and feature branches
/// 3. Compare them
/// 4. Create (and optionally tag and push) the release branch
///
/// Repository errors end the run as `failed`; every other condition is a
/// normal `skipped` or `already_exists` outcome.
pub fn run_release_workflow<R: Repository>(
    repo: &R,
    ctx: &ReleaseContext,
    config: &Config,
    today: NaiveDate,
) -> ReleaseResult {
    tracing::info!(
        stable = %ctx.stable_branch,
        feature = %ctx.feature_branch,
        ticket = %ctx.ticket_number,
        push = ctx.push,
        "inputs resolved"
    );

    let extractor = match build_extractor(ctx, config) {
        Ok(extractor) => extractor,
        Err(e) => return ReleaseResult::failed("select manifest", e),
    };

    let versions = match extract_versions(repo, ctx, &extractor) {
        Ok(versions) => versions,
        Err(e) => return ReleaseResult::failed("read manifests", e),
    };

    match decide(ctx, &versions) {
        ReleaseDecision::Skip(result) => {
            tracing::info!(outcome = result.outcome(), "no release branch needed");
            result
        }
        ReleaseDecision::Release {
            version,
            stable_version,
        } => match materialize(repo, ctx, &version, &stable_version, today) {
            Ok(result) => result,
            Err(e) => ReleaseResult::failed("create release branch", e),
        },
    }
}

//! Human-readable output.
//!
//! Everything here goes to stderr; stdout carries only the JSON result.

use console::{style, Term};

use crate::boundary::BoundaryWarning;
use crate::domain::ReleaseResult;

/// One-line description of an outcome, without styling
pub fn summary_line(result: &ReleaseResult) -> String {
    match result {
        ReleaseResult::Created {
            branch,
            version,
            stable_version,
            pushed,
            tag,
            reason,
        } => {
            let tag_note = tag
                .as_ref()
                .map(|tag| format!(" tagged {}", tag))
                .unwrap_or_default();
            let push_note = match (*pushed, reason.as_deref()) {
                (true, _) => " and pushed".to_string(),
                (false, Some(reason)) => format!(" (not pushed: {})", reason),
                (false, None) => String::new(),
            };
            format!(
                "Created {} for {} -> {}{}{}",
                branch, stable_version, version, tag_note, push_note
            )
        }
        ReleaseResult::AlreadyExists {
            branch,
            version,
            reason,
            ..
        } => match reason {
            Some(reason) => format!(
                "Release branch {} for version {} already exists ({})",
                branch, version, reason
            ),
            None => format!("Release branch {} for version {} already exists", branch, version),
        },
        ReleaseResult::Skipped {
            reason,
            version,
            stable_version,
        } => match (stable_version, version) {
            (Some(stable), Some(feature)) => {
                format!("No release branch: {} ({} -> {})", reason, stable, feature)
            }
            (None, Some(feature)) => format!("No release branch: {} ({})", reason, feature),
            _ => format!("No release branch: {}", reason),
        },
        ReleaseResult::Failed { reason } => format!("Release failed: {}", reason),
    }
}

/// Print a colored summary of the outcome to stderr.
pub fn display_result_summary(result: &ReleaseResult) {
    let line = summary_line(result);
    let styled = match result {
        ReleaseResult::Created { .. } => format!("{} {}", style("✓").green(), line),
        ReleaseResult::AlreadyExists { .. } => format!("{} {}", style("=").cyan(), line),
        ReleaseResult::Skipped { .. } => format!("{} {}", style("→").yellow(), line),
        ReleaseResult::Failed { .. } => format!("{} {}", style("ERROR:").red().bold(), line),
    };

    // Nothing sensible to do if stderr is gone
    let _ = Term::stderr().write_line(&styled);
}

/// Report a boundary warning through the log.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    tracing::warn!("{}", warning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SkipReason;

    #[test]
    fn test_summary_created() {
        let result = ReleaseResult::Created {
            branch: "release/T-1.0.0-20240101".to_string(),
            version: "1.0.0".to_string(),
            stable_version: "0.9.0".to_string(),
            pushed: true,
            tag: Some("v1.0.0".to_string()),
            reason: None,
        };
        assert_eq!(
            summary_line(&result),
            "Created release/T-1.0.0-20240101 for 0.9.0 -> 1.0.0 tagged v1.0.0 and pushed"
        );
    }

    #[test]
    fn test_summary_push_failure() {
        let result = ReleaseResult::Created {
            branch: "release/b".to_string(),
            version: "1.0.0".to_string(),
            stable_version: "0.9.0".to_string(),
            pushed: false,
            tag: None,
            reason: Some("push failed: denied".to_string()),
        };
        assert!(summary_line(&result).contains("not pushed: push failed: denied"));
    }

    #[test]
    fn test_summary_skipped() {
        let result = ReleaseResult::skipped(
            SkipReason::VersionsEqual,
            Some("2.0.0".to_string()),
            Some("2.0.0".to_string()),
        );
        assert_eq!(
            summary_line(&result),
            "No release branch: versions equal (2.0.0 -> 2.0.0)"
        );
    }

    #[test]
    fn test_summary_failed() {
        let result = ReleaseResult::failed("open repository", "missing");
        assert_eq!(summary_line(&result), "Release failed: open repository: missing");
    }

    #[test]
    fn test_display_result_summary() {
        // Visual verification test - output is printed to stderr
        display_result_summary(&ReleaseResult::skipped(
            SkipReason::NoVersionFound,
            None,
            None,
        ));
    }
}

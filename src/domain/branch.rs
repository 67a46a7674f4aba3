use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Placeholder used when no usable ticket identifier is available
pub const DEFAULT_TICKET: &str = "TICKET";

/// Prefix for every generated release branch
pub const RELEASE_PREFIX: &str = "release/";

/// Strip a leading `refs/heads/` from a branch reference
///
/// CI systems often hand over the full ref (`refs/heads/feature/x`) while
/// git lookups and ticket extraction want the short name.
pub fn normalize_branch_name(name: &str) -> String {
    let trimmed = name.trim();
    trimmed
        .strip_prefix("refs/heads/")
        .unwrap_or(trimmed)
        .to_string()
}

/// Issue-tracker key such as `PROJ-123`
const TICKET_KEY_PATTERN: &str = r"[A-Z][A-Z0-9]+-[0-9]+";

static TICKET_KEY: OnceLock<Regex> = OnceLock::new();

fn ticket_key() -> &'static Regex {
    TICKET_KEY.get_or_init(|| {
        Regex::new(TICKET_KEY_PATTERN).expect("ticket key pattern is valid")
    })
}

/// Find an issue-tracker key (e.g. `PROJ-123`) inside a branch name
pub fn ticket_from_branch(branch: &str) -> Option<String> {
    ticket_key().find(branch).map(|m| m.as_str().to_string())
}

/// Remove characters that are not allowed in a git branch name
///
/// Strips whitespace, slashes, control characters and `~ ^ : ? * [ \`,
/// collapses `..` and `@{`, then trims leading and trailing `.` and `-`.
/// Returns `placeholder` when nothing usable is left.
pub fn sanitize_ticket(ticket: &str, placeholder: &str) -> String {
    let mut cleaned: String = ticket
        .chars()
        .filter(|c| {
            !c.is_whitespace()
                && !c.is_control()
                && !matches!(c, '/' | '\\' | '~' | '^' | ':' | '?' | '*' | '[')
        })
        .collect();

    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", ".");
    }
    while cleaned.contains("@{") {
        cleaned = cleaned.replace("@{", "@");
    }

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '-');
    let trimmed = trimmed.strip_suffix(".lock").unwrap_or(trimmed);

    if trimmed.is_empty() || trimmed == "@" {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Compute the release branch name for a ticket, version and date
///
/// Example: `release/PROJ-123-1.1.0-20240615`
pub fn release_branch_name(ticket: &str, version: &str, date: NaiveDate) -> String {
    format!(
        "{}{}-{}-{}",
        RELEASE_PREFIX,
        ticket,
        version,
        date.format("%Y%m%d")
    )
}

/// Tag placed on the release commit: `v` followed by the version
///
/// A version that already carries a `v`/`V` prefix is not prefixed twice.
pub fn release_tag_name(version: &str) -> String {
    let bare = version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version);
    format!("v{}", bare)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_branch_name() {
        assert_eq!(normalize_branch_name("refs/heads/feature/x"), "feature/x");
        assert_eq!(normalize_branch_name("main"), "main");
        assert_eq!(normalize_branch_name("  develop \n"), "develop");
    }

    #[test]
    fn test_ticket_from_branch() {
        assert_eq!(
            ticket_from_branch("feature/PROJ-123-login-page"),
            Some("PROJ-123".to_string())
        );
        assert_eq!(ticket_from_branch("ABC2-9"), Some("ABC2-9".to_string()));
        assert_eq!(ticket_from_branch("feature/login"), None);
        assert_eq!(ticket_from_branch("HEAD"), None);
        // Repeated calls share the compiled pattern
        assert_eq!(ticket_from_branch("bugfix/OPS-7"), Some("OPS-7".to_string()));
        assert!(std::ptr::eq(ticket_key(), ticket_key()));
    }

    #[test]
    fn test_sanitize_ticket_keeps_valid_ticket() {
        assert_eq!(sanitize_ticket("PROJ-123", DEFAULT_TICKET), "PROJ-123");
    }

    #[test]
    fn test_sanitize_ticket_strips_whitespace_and_slashes() {
        assert_eq!(sanitize_ticket(" PROJ 123 ", DEFAULT_TICKET), "PROJ123");
        assert_eq!(sanitize_ticket("team/PROJ-1", DEFAULT_TICKET), "teamPROJ-1");
        assert_eq!(sanitize_ticket("a\\b", DEFAULT_TICKET), "ab");
    }

    #[test]
    fn test_sanitize_ticket_strips_git_forbidden_characters() {
        assert_eq!(sanitize_ticket("PR~O^J:1?*[", DEFAULT_TICKET), "PROJ1");
        assert_eq!(sanitize_ticket("a..b", DEFAULT_TICKET), "a.b");
        assert_eq!(sanitize_ticket("x@{y", DEFAULT_TICKET), "x@y");
        assert_eq!(sanitize_ticket(".-PROJ-1-.", DEFAULT_TICKET), "PROJ-1");
        assert_eq!(sanitize_ticket("PROJ.lock", DEFAULT_TICKET), "PROJ");
    }

    #[test]
    fn test_sanitize_ticket_falls_back_to_placeholder() {
        assert_eq!(sanitize_ticket("", DEFAULT_TICKET), "TICKET");
        assert_eq!(sanitize_ticket(" / ", DEFAULT_TICKET), "TICKET");
        assert_eq!(sanitize_ticket("...", "NONE"), "NONE");
    }

    #[test]
    fn test_sanitize_is_deterministic() {
        let input = "weird / ticket ~ 42";
        assert_eq!(
            sanitize_ticket(input, DEFAULT_TICKET),
            sanitize_ticket(input, DEFAULT_TICKET)
        );
    }

    #[test]
    fn test_release_branch_name() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(
            release_branch_name("PROJ-123", "1.1.0", date),
            "release/PROJ-123-1.1.0-20240615"
        );
    }

    #[test]
    fn test_release_branch_name_keeps_version_verbatim() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(
            release_branch_name("T-1", "2.0.0-rc.1", date),
            "release/T-1-2.0.0-rc.1-20250102"
        );
    }

    #[test]
    fn test_release_branch_names_are_valid_refs() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let ticket = sanitize_ticket("my ticket: ~1", DEFAULT_TICKET);
        let name = release_branch_name(&ticket, "1.0.0", date);
        assert!(git2::Reference::is_valid_name(&format!("refs/heads/{}", name)));
    }

    #[test]
    fn test_release_tag_name() {
        assert_eq!(release_tag_name("1.1.0"), "v1.1.0");
        assert_eq!(release_tag_name("v2.0.0-rc.1"), "v2.0.0-rc.1");
        assert_eq!(release_tag_name("V3.0.0"), "v3.0.0");
    }
}

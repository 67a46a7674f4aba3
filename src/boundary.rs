use std::fmt;

/// Non-fatal conditions met while reading branches and materializing the
/// release branch. They are reported to the user but never change the
/// outcome on their own.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The branch could not be resolved to a commit
    BranchNotFound { branch: String },
    /// A manifest exists but cannot be parsed in its format
    UnparsableManifest {
        branch: String,
        path: String,
        reason: String,
    },
    /// A manifest parsed fine but declares no version
    MissingVersionField { branch: String, path: String },
    /// A version string was found but is not valid semver
    MalformedVersion {
        branch: String,
        version: String,
        reason: String,
    },
    /// The ticket identifier had characters removed to form a branch name
    TicketSanitized { original: String, sanitized: String },
    /// The release branch exists locally but the push was rejected
    PushFailed {
        remote: String,
        branch: String,
        reason: String,
    },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::BranchNotFound { branch } => {
                write!(f, "Branch '{}' could not be resolved", branch)
            }
            BoundaryWarning::UnparsableManifest {
                branch,
                path,
                reason,
            } => {
                write!(f, "Cannot parse '{}' on '{}': {}", path, branch, reason)
            }
            BoundaryWarning::MissingVersionField { branch, path } => {
                write!(f, "'{}' on '{}' declares no version", path, branch)
            }
            BoundaryWarning::MalformedVersion {
                branch,
                version,
                reason,
            } => {
                write!(
                    f,
                    "Version '{}' on '{}' is not a semantic version: {}",
                    version, branch, reason
                )
            }
            BoundaryWarning::TicketSanitized {
                original,
                sanitized,
            } => {
                write!(
                    f,
                    "Ticket '{}' contains characters not allowed in branch names, using '{}'",
                    original, sanitized
                )
            }
            BoundaryWarning::PushFailed {
                remote,
                branch,
                reason,
            } => {
                write!(
                    f,
                    "Could not push '{}' to '{}': {} (local branch kept)",
                    branch, remote, reason
                )
            }
        }
    }
}

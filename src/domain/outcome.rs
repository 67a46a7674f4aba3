use serde::Serialize;
use std::fmt;

/// Why a run ended without creating a release branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    VersionsEqual,
    NotGreater,
    NoVersionFound,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::VersionsEqual => "versions equal",
            SkipReason::NotGreater => "feature version not greater",
            SkipReason::NoVersionFound => "no version found",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SkipReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The single machine-readable value a run produces
///
/// Serialized as one JSON object with an `outcome` discriminator, e.g.
/// `{"outcome":"created","branch":"release/PROJ-1-1.1.0-20240615","version":"1.1.0","stable_version":"1.0.0","pushed":false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReleaseResult {
    Created {
        branch: String,
        version: String,
        stable_version: String,
        pushed: bool,
        /// Release tag, when tagging was requested
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        /// Push failure, if a requested push did not go through
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    AlreadyExists {
        branch: String,
        version: String,
        stable_version: String,
        pushed: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Skipped {
        reason: SkipReason,
        /// Feature version, when one was found
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stable_version: Option<String>,
    },
    Failed {
        reason: String,
    },
}

impl ReleaseResult {
    pub fn skipped(
        reason: SkipReason,
        version: Option<String>,
        stable_version: Option<String>,
    ) -> Self {
        ReleaseResult::Skipped {
            reason,
            version,
            stable_version,
        }
    }

    /// Build a failure naming the operation and the underlying error text
    pub fn failed(operation: &str, error: impl fmt::Display) -> Self {
        ReleaseResult::Failed {
            reason: format!("{}: {}", operation, error),
        }
    }

    /// Outcome discriminator as written in the JSON output
    pub fn outcome(&self) -> &'static str {
        match self {
            ReleaseResult::Created { .. } => "created",
            ReleaseResult::AlreadyExists { .. } => "already_exists",
            ReleaseResult::Skipped { .. } => "skipped",
            ReleaseResult::Failed { .. } => "failed",
        }
    }

    /// Branch the run created or found, if any
    pub fn branch(&self) -> Option<&str> {
        match self {
            ReleaseResult::Created { branch, .. } | ReleaseResult::AlreadyExists { branch, .. } => {
                Some(branch)
            }
            _ => None,
        }
    }

    /// Process exit status: only `failed` is non-zero
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseResult::Failed { .. } => 1,
            _ => 0,
        }
    }

    /// Render as a single-line JSON object
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

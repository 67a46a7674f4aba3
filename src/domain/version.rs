use crate::error::{ReleaseBranchError, Result};
use std::cmp::Ordering;
use std::fmt;

/// Structured semantic version used for comparison only
///
/// Wraps [`semver::Version`] so parsing follows the semver grammar, while
/// ordering follows semver precedence: build metadata is ignored and a
/// pre-release sorts below the same release triple.
#[derive(Debug, Clone)]
pub struct ParsedVersion {
    inner: semver::Version,
}

impl ParsedVersion {
    /// Parse a version string (e.g., "1.2.3", "v2.0.0-rc.1")
    ///
    /// Surrounding whitespace is not accepted: the string is used verbatim
    /// in branch names.
    pub fn parse(version: &str) -> Result<Self> {
        // Tolerate a single 'v' or 'V' prefix
        let clean = version
            .strip_prefix('v')
            .or_else(|| version.strip_prefix('V'))
            .unwrap_or(version);

        let inner = semver::Version::parse(clean).map_err(|e| {
            ReleaseBranchError::version(format!("Invalid version '{}': {}", version, e))
        })?;

        Ok(ParsedVersion { inner })
    }

    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    /// Pre-release tag, if any (e.g., "rc.1")
    pub fn pre_release(&self) -> Option<&str> {
        if self.inner.pre.is_empty() {
            None
        } else {
            Some(self.inner.pre.as_str())
        }
    }

    /// Compare two versions by semver precedence
    pub fn precedence(&self, other: &Self) -> Ordering {
        (self.inner.major, self.inner.minor, self.inner.patch)
            .cmp(&(other.inner.major, other.inner.minor, other.inner.patch))
            .then_with(|| self.inner.pre.cmp(&other.inner.pre))
    }

    /// Compare a candidate version against a baseline
    pub fn compare_to(&self, baseline: &Self) -> Comparison {
        match self.precedence(baseline) {
            Ordering::Greater => Comparison::Greater,
            Ordering::Equal => Comparison::Equal,
            Ordering::Less => Comparison::Lower,
        }
    }
}

impl PartialEq for ParsedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.precedence(other) == Ordering::Equal
    }
}

impl Eq for ParsedVersion {}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence(other)
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Result of comparing the feature version against the stable version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Equal,
    Lower,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ParsedVersion {
        ParsedVersion::parse(s).unwrap()
    }

    #[test]
    fn test_version_parse() {
        let parsed = v("1.2.3");
        assert_eq!(parsed.major(), 1);
        assert_eq!(parsed.minor(), 2);
        assert_eq!(parsed.patch(), 3);
        assert_eq!(parsed.pre_release(), None);
    }

    #[test]
    fn test_version_parse_with_prefix() {
        assert_eq!(v("v1.2.3"), v("1.2.3"));
        assert_eq!(v("V1.2.3"), v("1.2.3"));
    }

    #[test]
    fn test_version_parse_pre_release() {
        let parsed = v("2.0.0-rc.1");
        assert_eq!(parsed.pre_release(), Some("rc.1"));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(ParsedVersion::parse("1.2").is_err());
        assert!(ParsedVersion::parse("1.2.3.4").is_err());
        assert!(ParsedVersion::parse("one.two.three").is_err());
        assert!(ParsedVersion::parse("").is_err());
        assert!(ParsedVersion::parse("vv1.2.3").is_err());
    }

    #[test]
    fn test_version_parse_rejects_padding() {
        assert!(ParsedVersion::parse(" 1.1.0").is_err());
        assert!(ParsedVersion::parse("1.1.0\n").is_err());
        assert!(ParsedVersion::parse("v 1.1.0").is_err());
    }

    #[test]
    fn test_numeric_not_lexical_ordering() {
        assert_eq!(v("1.10.0").compare_to(&v("1.9.0")), Comparison::Greater);
        assert_eq!(v("0.0.10").compare_to(&v("0.0.9")), Comparison::Greater);
    }

    #[test]
    fn test_lexicographic_over_triple() {
        assert_eq!(v("2.0.0").compare_to(&v("1.99.99")), Comparison::Greater);
        assert_eq!(v("1.4.9").compare_to(&v("1.5.0")), Comparison::Lower);
        assert_eq!(v("1.1.0").compare_to(&v("1.0.0")), Comparison::Greater);
    }

    #[test]
    fn test_equal_is_never_greater() {
        for s in ["0.0.0", "1.2.3", "2.0.0-rc.1", "10.20.30"] {
            assert_eq!(v(s).compare_to(&v(s)), Comparison::Equal);
            assert_ne!(v(s).compare_to(&v(s)), Comparison::Greater);
        }
    }

    #[test]
    fn test_pre_release_lower_than_release() {
        assert_eq!(v("1.2.0-rc1").compare_to(&v("1.2.0")), Comparison::Lower);
        assert_eq!(v("1.2.0").compare_to(&v("1.2.0-rc1")), Comparison::Greater);
        assert_eq!(v("1.2.0-rc1").compare_to(&v("1.1.9")), Comparison::Greater);
    }

    #[test]
    fn test_pre_release_identifier_precedence() {
        assert!(v("1.0.0-alpha") < v("1.0.0-alpha.1"));
        assert!(v("1.0.0-alpha.1") < v("1.0.0-beta"));
        assert!(v("1.0.0-beta.2") < v("1.0.0-beta.11"));
        assert!(v("1.0.0-rc.1") < v("1.0.0"));
    }

    #[test]
    fn test_build_metadata_ignored() {
        assert_eq!(v("1.0.0+build.1").compare_to(&v("1.0.0+build.2")), Comparison::Equal);
        assert_eq!(v("1.0.0+abc"), v("1.0.0"));
    }

    #[test]
    fn test_order_is_antisymmetric() {
        let versions = ["0.9.9", "1.0.0-alpha", "1.0.0", "1.0.1", "1.1.0", "2.0.0"];
        for a in versions {
            for b in versions {
                let ab = v(a).compare_to(&v(b));
                let ba = v(b).compare_to(&v(a));
                match ab {
                    Comparison::Greater => assert_eq!(ba, Comparison::Lower),
                    Comparison::Lower => assert_eq!(ba, Comparison::Greater),
                    Comparison::Equal => assert_eq!(a, b),
                }
            }
        }
    }

    #[test]
    fn test_version_display() {
        assert_eq!(v("v1.2.3").to_string(), "1.2.3");
        assert_eq!(v("1.2.3-rc.1+b5").to_string(), "1.2.3-rc.1+b5");
    }
}

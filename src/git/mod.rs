//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the handful of Git
//! operations release-branch needs, allowing the pipeline to run against a
//! real repository or an in-memory mock.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for tests
//!
//! Content is always read from the object database at a branch's commit
//! (the equivalent of `git show <branch>:<path>`), so the working tree and
//! the checked-out branch are never touched.
//!
//! ```rust
//! # use release_branch::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> release_branch::Result<()> {
//! if let Some(bytes) = repo.read_file_at_ref("main", "package.json")? {
//!     println!("{} bytes", bytes.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// Outcome of asking for a new local branch or tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefCreation {
    Created,
    /// A ref with that name was already there; nothing was changed
    AlreadyExists,
}

/// Where an existing branch was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchLocation {
    /// `refs/heads/<name>` exists and can be pushed
    Local,
    /// Only `refs/remotes/<remote>/<name>` exists
    RemoteOnly,
}

/// Git operations used by the release pipeline
///
/// ## Error Handling
///
/// "Not found" conditions (unknown branch, missing file) are values, not
/// errors. An `Err` always means the repository itself could not be
/// consulted or modified and maps to a failed run.
pub trait Repository {
    /// Short name of the checked-out branch
    ///
    /// Returns `Ok(None)` when HEAD is detached or unborn.
    fn current_branch(&self) -> Result<Option<String>>;

    /// Resolve a branch name to the commit at its tip
    ///
    /// Accepts short names, `refs/heads/<name>`, and falls back to the
    /// remote-tracking branch of the configured remote.
    fn resolve_branch(&self, branch: &str) -> Result<Option<Oid>>;

    /// Read a file as it exists on a branch, without checking it out
    ///
    /// # Returns
    /// * `Ok(Some(bytes))` - File content at the branch tip
    /// * `Ok(None)` - The branch or the file does not exist
    /// * `Err` - Repository access failed
    fn read_file_at_ref(&self, branch: &str, path: &str) -> Result<Option<Vec<u8>>>;

    /// Whether a branch exists locally, only as a remote-tracking
    /// branch of the configured remote, or not at all
    fn branch_location(&self, name: &str) -> Result<Option<BranchLocation>>;

    /// Create a local branch pointing at `target`
    ///
    /// Never moves an existing branch.
    fn create_branch(&self, name: &str, target: Oid) -> Result<RefCreation>;

    /// Create a lightweight tag pointing at `target`
    ///
    /// An existing tag is left where it is.
    fn create_tag(&self, name: &str, target: Oid) -> Result<RefCreation>;

    /// Push full ref names (`refs/heads/..`, `refs/tags/..`) to the
    /// configured remote in a single push
    fn push_refs(&self, refs: &[String]) -> Result<()>;
}

//! Domain logic - pure rules independent of git operations

pub mod branch;
pub mod outcome;
pub mod version;

pub use branch::{release_branch_name, release_tag_name, sanitize_ticket, DEFAULT_TICKET};
pub use outcome::{ReleaseResult, SkipReason};
pub use version::{Comparison, ParsedVersion};

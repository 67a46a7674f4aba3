use crate::domain::branch::normalize_branch_name;
use crate::error::{ReleaseBranchError, Result};
use crate::git::{BranchLocation, RefCreation};
use git2::{BranchType, ErrorCode, Oid, Repository as Git2Repo};
use std::cell::Cell;
use std::path::Path;

/// Upper bound on credential callback invocations during one push.
/// libgit2 keeps asking while the remote rejects what it is given.
const MAX_CREDENTIAL_ATTEMPTS: usize = 4;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    remote: String,
}

impl Git2Repository {
    /// Open or discover a git repository, using `origin` as remote
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo,
            remote: "origin".to_string(),
        }
    }

    /// Use a different remote for branch fallback lookups and pushes
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    fn candidate_specs(&self, branch: &str) -> Vec<String> {
        let short = normalize_branch_name(branch);
        vec![
            short.clone(),
            format!("refs/heads/{}", short),
            format!("refs/remotes/{}/{}", self.remote, short),
        ]
    }

    fn find_branch_opt(&self, name: &str, kind: BranchType) -> Result<bool> {
        match self.repo.find_branch(name, kind) {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl super::Repository for Git2Repository {
    fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(None)
            }
            Err(e) => return Err(e.into()),
        };

        if !head.is_branch() {
            return Ok(None);
        }

        Ok(head.shorthand().map(str::to_string))
    }

    fn resolve_branch(&self, branch: &str) -> Result<Option<Oid>> {
        for spec in self.candidate_specs(branch) {
            match self.repo.revparse_single(&spec) {
                Ok(object) => match object.peel_to_commit() {
                    Ok(commit) => {
                        tracing::debug!(branch, spec = %spec, commit = %commit.id(), "resolved branch");
                        return Ok(Some(commit.id()));
                    }
                    Err(e) => {
                        tracing::debug!(spec = %spec, error = %e, "revision is not a commit");
                    }
                },
                Err(e)
                    if matches!(
                        e.code(),
                        ErrorCode::NotFound | ErrorCode::InvalidSpec | ErrorCode::Ambiguous
                    ) =>
                {
                    tracing::trace!(spec = %spec, "no such revision");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(None)
    }

    fn read_file_at_ref(&self, branch: &str, path: &str) -> Result<Option<Vec<u8>>> {
        let oid = match self.resolve_branch(branch)? {
            Some(oid) => oid,
            None => return Ok(None),
        };

        let tree = self.repo.find_commit(oid)?.tree()?;
        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let object = entry.to_object(&self.repo)?;
        Ok(object.as_blob().map(|blob| blob.content().to_vec()))
    }

    fn branch_location(&self, name: &str) -> Result<Option<BranchLocation>> {
        if self.find_branch_opt(name, BranchType::Local)? {
            return Ok(Some(BranchLocation::Local));
        }

        let tracking = format!("{}/{}", self.remote, name);
        if self.find_branch_opt(&tracking, BranchType::Remote)? {
            return Ok(Some(BranchLocation::RemoteOnly));
        }

        Ok(None)
    }

    fn create_branch(&self, name: &str, target: Oid) -> Result<RefCreation> {
        let commit = self.repo.find_commit(target).map_err(|e| {
            ReleaseBranchError::branch(format!("Cannot find commit {}: {}", target, e))
        })?;

        match self.repo.branch(name, &commit, false) {
            Ok(_) => Ok(RefCreation::Created),
            Err(e) if e.code() == ErrorCode::Exists => Ok(RefCreation::AlreadyExists),
            Err(e) => Err(ReleaseBranchError::branch(format!(
                "Cannot create branch '{}': {}",
                name, e
            ))),
        }
    }

    fn create_tag(&self, name: &str, target: Oid) -> Result<RefCreation> {
        let object = self.repo.find_object(target, None).map_err(|e| {
            ReleaseBranchError::tag(format!("Cannot find object {}: {}", target, e))
        })?;

        match self.repo.tag_lightweight(name, &object, false) {
            Ok(_) => Ok(RefCreation::Created),
            Err(e) if e.code() == ErrorCode::Exists => Ok(RefCreation::AlreadyExists),
            Err(e) => Err(ReleaseBranchError::tag(format!(
                "Cannot create tag '{}': {}",
                name, e
            ))),
        }
    }

    fn push_refs(&self, refs: &[String]) -> Result<()> {
        let mut remote = self.repo.find_remote(&self.remote).map_err(|_| {
            ReleaseBranchError::remote(format!("No remote named '{}' found", self.remote))
        })?;

        let git_config = self.repo.config().ok();
        let attempts = Cell::new(0usize);

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|url, username_from_url, allowed_types| {
            attempts.set(attempts.get() + 1);
            if attempts.get() > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str("authentication failed"));
            }

            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if attempts.get() == 1 {
                    if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                        return Ok(cred);
                    }
                }

                let home = dirs::home_dir().unwrap_or_else(|| ".".into());
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(config) = git_config.as_ref() {
                    if let Ok(cred) = git2::Cred::credential_helper(config, url, username_from_url)
                    {
                        return Ok(cred);
                    }
                }
            }

            git2::Cred::default()
        });

        // Rejections arrive per reference, not as a push error
        callbacks.push_update_reference(|refname, status| match status {
            Some(message) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, message
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspecs: Vec<String> = refs.iter().map(|r| format!("{}:{}", r, r)).collect();
        remote
            .push(&refspecs, Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    ReleaseBranchError::remote(format!("Network error during push: {}", e))
                } else if e.class() == git2::ErrorClass::Reference {
                    ReleaseBranchError::remote(format!("Reference error during push: {}", e))
                } else {
                    ReleaseBranchError::remote(format!("Failed to push {}: {}", refs.join(", "), e))
                }
            })
    }
}

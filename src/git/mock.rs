use crate::domain::branch::normalize_branch_name;
use crate::error::{ReleaseBranchError, Result};
use crate::git::{BranchLocation, RefCreation, Repository};
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory repository for testing without actual git operations
pub struct MockRepository {
    current_branch: Option<String>,
    branch_heads: RefCell<HashMap<String, Oid>>,
    remote_branches: HashMap<String, Oid>,
    tags: RefCell<HashMap<String, Oid>>,
    files: HashMap<(String, String), Vec<u8>>,
    push_error: Option<String>,
    read_error: Option<String>,
    pushed: RefCell<Vec<String>>,
    next_oid: Cell<u8>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            current_branch: None,
            branch_heads: RefCell::new(HashMap::new()),
            remote_branches: HashMap::new(),
            tags: RefCell::new(HashMap::new()),
            files: HashMap::new(),
            push_error: None,
            read_error: None,
            pushed: RefCell::new(Vec::new()),
            next_oid: Cell::new(1),
        }
    }

    fn fresh_oid(&self) -> Oid {
        let n = self.next_oid.get();
        self.next_oid.set(n.wrapping_add(1));
        Oid::from_bytes(&[n; 20]).unwrap_or_else(|_| Oid::zero())
    }

    /// Set the checked-out branch
    pub fn set_current_branch(&mut self, branch: impl Into<String>) {
        self.current_branch = Some(branch.into());
    }

    /// Set a branch head
    pub fn set_branch_head(&mut self, branch: impl Into<String>, oid: Oid) {
        self.branch_heads.borrow_mut().insert(branch.into(), oid);
    }

    /// Add a file on a branch, creating the branch if needed
    pub fn add_file(
        &mut self,
        branch: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) {
        let branch = branch.into();
        if !self.branch_heads.borrow().contains_key(&branch) {
            let oid = self.fresh_oid();
            self.branch_heads.borrow_mut().insert(branch.clone(), oid);
        }
        self.files.insert((branch, path.into()), content.into());
    }

    /// Register a branch that only exists on the remote
    pub fn add_remote_branch(&mut self, branch: impl Into<String>) {
        let oid = self.fresh_oid();
        self.remote_branches.insert(branch.into(), oid);
    }

    /// Make every push fail with the given message
    pub fn fail_pushes(&mut self, message: impl Into<String>) {
        self.push_error = Some(message.into());
    }

    /// Make every content read fail with the given message
    pub fn fail_reads(&mut self, message: impl Into<String>) {
        self.read_error = Some(message.into());
    }

    /// Full ref names successfully pushed so far
    pub fn pushed_refs(&self) -> Vec<String> {
        self.pushed.borrow().clone()
    }

    /// Target of a tag, if present
    pub fn tag_target(&self, tag: &str) -> Option<Oid> {
        self.tags.borrow().get(tag).copied()
    }

    /// Head of a local branch, if present
    pub fn branch_head(&self, branch: &str) -> Option<Oid> {
        self.branch_heads.borrow().get(branch).copied()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.current_branch.clone())
    }

    fn resolve_branch(&self, branch: &str) -> Result<Option<Oid>> {
        let name = normalize_branch_name(branch);
        Ok(self
            .branch_head(&name)
            .or_else(|| self.remote_branches.get(&name).copied()))
    }

    fn read_file_at_ref(&self, branch: &str, path: &str) -> Result<Option<Vec<u8>>> {
        if let Some(message) = &self.read_error {
            return Err(ReleaseBranchError::branch(message.clone()));
        }

        let key = (normalize_branch_name(branch), path.to_string());
        Ok(self.files.get(&key).cloned())
    }

    fn branch_location(&self, name: &str) -> Result<Option<BranchLocation>> {
        if self.branch_heads.borrow().contains_key(name) {
            Ok(Some(BranchLocation::Local))
        } else if self.remote_branches.contains_key(name) {
            Ok(Some(BranchLocation::RemoteOnly))
        } else {
            Ok(None)
        }
    }

    fn create_branch(&self, name: &str, target: Oid) -> Result<RefCreation> {
        let mut heads = self.branch_heads.borrow_mut();
        if heads.contains_key(name) {
            return Ok(RefCreation::AlreadyExists);
        }
        heads.insert(name.to_string(), target);
        Ok(RefCreation::Created)
    }

    fn create_tag(&self, name: &str, target: Oid) -> Result<RefCreation> {
        let mut tags = self.tags.borrow_mut();
        if tags.contains_key(name) {
            return Ok(RefCreation::AlreadyExists);
        }
        tags.insert(name.to_string(), target);
        Ok(RefCreation::Created)
    }

    fn push_refs(&self, refs: &[String]) -> Result<()> {
        if let Some(message) = &self.push_error {
            return Err(ReleaseBranchError::remote(message.clone()));
        }
        self.pushed.borrow_mut().extend(refs.iter().cloned());
        Ok(())
    }
}

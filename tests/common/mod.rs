#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

/// A throwaway repository whose branches are built directly in the
/// object database, without a working-tree checkout.
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        TestRepo { dir, repo }
    }

    /// Commit `files` as the full content of `branch`, on top of its tip
    pub fn commit(&self, branch: &str, files: &[(&str, &str)]) -> Oid {
        self.commit_ref(&format!("refs/heads/{}", branch), files)
    }

    /// Commit to an arbitrary ref, e.g. `refs/remotes/origin/<branch>`
    pub fn commit_ref(&self, refname: &str, files: &[(&str, &str)]) -> Oid {
        let mut builder = self.repo.treebuilder(None).unwrap();
        for (name, content) in files {
            let blob = self.repo.blob(content.as_bytes()).unwrap();
            builder.insert(name, blob, 0o100644).unwrap();
        }
        let tree_oid = builder.write().unwrap();
        let tree = self.repo.find_tree(tree_oid).unwrap();

        let sig = Signature::now("Test", "test@example.com").unwrap();
        let parent = self
            .repo
            .find_reference(refname)
            .ok()
            .and_then(|r| r.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some(refname), &sig, &sig, "commit", &tree, &parents)
            .unwrap()
    }

    pub fn checkout_head(&self, branch: &str) {
        self.repo.set_head(&format!("refs/heads/{}", branch)).unwrap();
    }

    pub fn branch_target(&self, branch: &str) -> Option<Oid> {
        self.repo
            .find_branch(branch, git2::BranchType::Local)
            .ok()
            .and_then(|b| b.get().target())
    }

    pub fn add_remote(&self, name: &str, url: &str) {
        self.repo.remote(name, url).unwrap();
    }
}

pub fn package_json(version: &str) -> String {
    format!(r#"{{"name": "app", "version": "{}"}}"#, version)
}

pub fn pyproject(version: &str) -> String {
    format!("[tool.poetry]\nname = \"app\"\nversion = \"{}\"\n", version)
}

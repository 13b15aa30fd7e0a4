//! Branch registry and HEAD
//!
//! Branches are text files under `.twig/refs/heads/` holding a 40-character
//! commit ID; hierarchical names nest as directories. `HEAD` holds
//! `ref: refs/heads/<active branch>`, so the active branch is always a named
//! branch and advancing HEAD means advancing that branch.
//!
//! Every write happens under an exclusive file lock.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing HEAD
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

/// Name of the HEAD file
pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.twig`)
    path: Box<Path>,
}

impl Refs {
    /// Name of the branch HEAD points at
    pub fn active_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        let content = content.trim();

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(content)
            .with_context(|| format!("HEAD is not a branch reference: {:?}", content))?;

        BranchName::try_parse(symref_match[1].to_string())
    }

    pub fn is_active_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.active_branch()? == branch_name)
    }

    /// Point HEAD at a branch
    pub fn set_active(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(
            &self.head_path(),
            format!("ref: refs/heads/{}", branch_name),
        )
    }

    /// Commit the active branch points at
    pub fn read_head(&self) -> anyhow::Result<ObjectId> {
        let active_branch = self.active_branch()?;

        self.read_branch(&active_branch)?
            .with_context(|| format!("HEAD points at missing branch {}", active_branch))
    }

    /// Move the active branch to a new commit
    pub fn advance_active(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let active_branch = self.active_branch()?;

        self.update_branch(&active_branch, oid)
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.branch_path(branch_name);
        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;

        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    pub fn create_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(branch_name) {
            return Err(TwigError::BranchExists(branch_name.to_string()).into());
        }

        self.update_branch(branch_name, oid)
    }

    /// Point a branch at a commit, creating the branch if needed
    pub fn update_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.branch_path(branch_name), oid.to_string())
    }

    /// Delete a branch pointer, leaving its commits in place
    pub fn delete_branch(&self, branch_name: &BranchName) -> anyhow::Result<ObjectId> {
        let oid = self
            .read_branch(branch_name)?
            .ok_or_else(|| TwigError::NoSuchBranch(branch_name.to_string()))?;

        if self.is_active_branch(branch_name)? {
            return Err(TwigError::CannotDeleteActive(branch_name.to_string()).into());
        }

        let branch_path = self.branch_path(branch_name);
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;

        Ok(oid)
    }

    /// Every branch, sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");

                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn update_ref_file(&self, path: &Path, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn branch_path(&self, branch_name: &BranchName) -> Box<Path> {
        self.heads_path()
            .join(branch_name.as_ref())
            .into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn refs() -> (TempDir, Refs) {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        let master = BranchName::default_branch();
        refs.update_branch(&master, &oid("root")).unwrap();
        refs.set_active(&master).unwrap();

        (dir, refs)
    }

    fn oid(seed: &str) -> ObjectId {
        ObjectId::hash_of(seed.as_bytes())
    }

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    fn kind(error: anyhow::Error) -> TwigError {
        error.downcast::<TwigError>().unwrap()
    }

    #[rstest]
    fn head_follows_the_active_branch(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        refs.advance_active(&oid("second")).unwrap();

        assert_eq!(refs.active_branch().unwrap(), branch("master"));
        assert_eq!(refs.read_head().unwrap(), oid("second"));
        assert_eq!(
            refs.read_branch(&branch("master")).unwrap(),
            Some(oid("second"))
        );
    }

    #[rstest]
    fn duplicate_branches_are_rejected(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        refs.create_branch(&branch("topic"), &oid("root")).unwrap();
        let error = refs
            .create_branch(&branch("topic"), &oid("other"))
            .unwrap_err();

        assert_eq!(kind(error), TwigError::BranchExists("topic".to_string()));
        assert_eq!(refs.read_branch(&branch("topic")).unwrap(), Some(oid("root")));
    }

    #[rstest]
    fn active_branch_cannot_be_deleted(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs.delete_branch(&branch("master")).unwrap_err();

        assert_eq!(
            kind(error),
            TwigError::CannotDeleteActive("master".to_string())
        );
        assert!(refs.branch_exists(&branch("master")));
    }

    #[rstest]
    fn deleting_a_missing_branch_fails(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs.delete_branch(&branch("nope")).unwrap_err();

        assert_eq!(kind(error), TwigError::NoSuchBranch("nope".to_string()));
    }

    #[rstest]
    fn hierarchical_branches_are_listed_and_pruned(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        refs.create_branch(&branch("origin/master"), &oid("remote"))
            .unwrap();
        refs.create_branch(&branch("alpha"), &oid("root")).unwrap();

        assert_eq!(
            refs.list_branches().unwrap(),
            vec![branch("alpha"), branch("master"), branch("origin/master")]
        );

        assert_eq!(
            refs.delete_branch(&branch("origin/master")).unwrap(),
            oid("remote")
        );
        assert!(!refs.heads_path().join("origin").exists());
    }
}

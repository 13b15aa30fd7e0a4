//! Checkout migration and untracked file detection
//!
//! Checking out a snapshot involves:
//!
//! 1. Detecting working files the checkout would clobber without them being
//!    tracked by the current commit
//! 2. Planning file system operations (add, modify, delete)
//! 3. Applying them to the workspace
//!
//! All operations are planned before execution, so a conflict is reported
//! before anything on disk has changed.

use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::FileTable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use std::collections::BTreeMap;

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionType {
    /// Delete file
    Delete,
    /// Create new file
    Add,
    /// Overwrite existing file
    Modify,
}

/// Names of working files untracked by `tracked` that `incoming` also holds
pub fn untracked_shadowed_by<'a>(
    workspace: &FileTable,
    tracked: &FileTable,
    incoming: impl IntoIterator<Item = (&'a String, &'a ObjectId)>,
) -> Vec<String> {
    incoming
        .into_iter()
        .filter(|(name, _)| !tracked.contains_key(*name) && workspace.contains_key(*name))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Names of working files that are not tracked by `tracked` and would be
/// overwritten with different contents by `incoming`
pub fn untracked_in_the_way<'a>(
    workspace: &FileTable,
    tracked: &FileTable,
    incoming: impl IntoIterator<Item = (&'a String, &'a ObjectId)>,
) -> Vec<String> {
    incoming
        .into_iter()
        .filter(|(name, oid)| {
            !tracked.contains_key(*name)
                && workspace
                    .get(*name)
                    .is_some_and(|working_oid| working_oid != *oid)
        })
        .map(|(name, _)| name.clone())
        .collect()
}

/// Fail with `UntrackedFileConflict` when any file is in the way
pub fn ensure_no_untracked_in_the_way<'a>(
    workspace: &FileTable,
    tracked: &FileTable,
    incoming: impl IntoIterator<Item = (&'a String, &'a ObjectId)>,
) -> anyhow::Result<()> {
    conflict_unless_empty(untracked_in_the_way(workspace, tracked, incoming))
}

/// Fail with `UntrackedFileConflict` when an untracked working file shares
/// its name with any incoming file, whatever its contents
pub fn ensure_no_untracked_shadowed<'a>(
    workspace: &FileTable,
    tracked: &FileTable,
    incoming: impl IntoIterator<Item = (&'a String, &'a ObjectId)>,
) -> anyhow::Result<()> {
    conflict_unless_empty(untracked_shadowed_by(workspace, tracked, incoming))
}

fn conflict_unless_empty(names: Vec<String>) -> anyhow::Result<()> {
    if names.is_empty() {
        Ok(())
    } else {
        Err(TwigError::UntrackedFileConflict(names).into())
    }
}

/// Checkout migration planner and executor
///
/// Moves the working tree from the `current` snapshot to the `target` one:
/// every target file is written unless the working copy already matches, and
/// every file tracked by `current` but absent from `target` is deleted. Other
/// untracked files are left alone.
pub struct Migration<'r> {
    repository: &'r Repository,
    current: &'r FileTable,
    target: &'r FileTable,
    actions: BTreeMap<ActionType, Vec<(String, Option<ObjectId>)>>,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository, current: &'r FileTable, target: &'r FileTable) -> Self {
        Self {
            repository,
            current,
            target,
            actions: BTreeMap::new(),
        }
    }

    pub fn actions(&self) -> &BTreeMap<ActionType, Vec<(String, Option<ObjectId>)>> {
        &self.actions
    }

    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        let workspace = self.repository.workspace().snapshot()?;

        self.plan_changes(&workspace)?;
        self.update_workspace()
    }

    /// Check for untracked files in the way and plan every action
    pub fn plan_changes(&mut self, workspace: &FileTable) -> anyhow::Result<()> {
        ensure_no_untracked_in_the_way(workspace, self.current, self.target)?;

        self.actions.clear();
        for (name, oid) in self.target {
            match workspace.get(name) {
                Some(working_oid) if working_oid == oid => {}
                Some(_) => self.record_action(ActionType::Modify, name, Some(oid)),
                None => self.record_action(ActionType::Add, name, Some(oid)),
            }
        }
        for name in self.current.keys() {
            if !self.target.contains_key(name) {
                self.record_action(ActionType::Delete, name, None);
            }
        }

        Ok(())
    }

    fn record_action(&mut self, action: ActionType, name: &str, oid: Option<&ObjectId>) {
        self.actions
            .entry(action)
            .or_default()
            .push((name.to_string(), oid.cloned()));
    }

    // deletions run first so a file and a directory of the same name can swap
    fn update_workspace(&self) -> anyhow::Result<()> {
        let workspace = self.repository.workspace();
        let database = self.repository.database();

        for (action, entries) in &self.actions {
            for (name, oid) in entries {
                match (action, oid) {
                    (ActionType::Delete, _) => workspace.remove_file(name)?,
                    (ActionType::Add | ActionType::Modify, Some(oid)) => {
                        let blob = database.parse_blob(oid)?;
                        workspace.write_file(name, blob.content())?;
                    }
                    (_, None) => anyhow::bail!("Invalid action and entry combination"),
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn oid(seed: &str) -> ObjectId {
        ObjectId::hash_of(seed.as_bytes())
    }

    fn table(entries: &[(&str, &str)]) -> FileTable {
        entries
            .iter()
            .map(|(name, seed)| (name.to_string(), oid(seed)))
            .collect()
    }

    #[test]
    fn only_untracked_files_with_different_contents_are_in_the_way() {
        let workspace = table(&[
            ("tracked.txt", "local"),
            ("same.txt", "s"),
            ("other.txt", "o"),
        ]);
        let tracked = table(&[("tracked.txt", "committed")]);
        let incoming = table(&[
            ("tracked.txt", "theirs"),
            ("same.txt", "s"),
            ("other.txt", "theirs"),
        ]);

        assert_eq!(
            untracked_in_the_way(&workspace, &tracked, &incoming),
            vec!["other.txt".to_string()]
        );
    }

    #[test]
    fn shadowing_ignores_contents() {
        let workspace = table(&[("same.txt", "s"), ("mine.txt", "m"), ("tracked.txt", "t")]);
        let tracked = table(&[("tracked.txt", "t")]);
        let incoming = table(&[("same.txt", "s"), ("tracked.txt", "t2"), ("new.txt", "n")]);

        assert_eq!(
            untracked_shadowed_by(&workspace, &tracked, &incoming),
            vec!["same.txt".to_string()]
        );
        assert!(ensure_no_untracked_shadowed(&workspace, &tracked, &incoming).is_err());
    }

    #[test]
    fn conflicts_are_reported_by_kind() {
        let workspace = table(&[("a.txt", "local")]);
        let incoming = table(&[("a.txt", "theirs")]);

        let error =
            ensure_no_untracked_in_the_way(&workspace, &FileTable::new(), &incoming).unwrap_err();

        assert_eq!(
            error.downcast_ref::<TwigError>(),
            Some(&TwigError::UntrackedFileConflict(vec!["a.txt".to_string()]))
        );
    }
}

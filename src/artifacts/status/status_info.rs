use crate::areas::repository::Repository;
use crate::areas::stage::Stage;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::FileTable;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

/// Everything `status` reports, every list sorted by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) active_branch: BranchName,
    pub(crate) branches: Vec<BranchName>,
    pub(crate) staged_files: BTreeSet<String>,
    pub(crate) removed_files: BTreeSet<String>,
    pub(crate) workspace_changeset: BTreeMap<String, WorkspaceChangeType>,
    pub(crate) untracked_files: BTreeSet<String>,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

// Terminology:
// - tracked files: files of the HEAD commit
// - modified files: tracked or staged files whose working copy differs from
//   the version that would be committed
// - deleted files: tracked or staged files missing from the workspace
// - untracked files: working files neither tracked nor staged for addition,
//   plus files staged for removal that were re-created
impl<'r> Status<'r> {
    pub fn initialize(&self, stage: &Stage) -> anyhow::Result<StatusInfo> {
        let (_, head_commit) = self.repository.head_commit()?;
        let workspace = self.repository.workspace().snapshot()?;

        Ok(StatusInfo {
            active_branch: self.repository.refs().active_branch()?,
            branches: self.repository.refs().list_branches()?,
            staged_files: stage.additions().map(|(name, _)| name.clone()).collect(),
            removed_files: stage.removals().map(|(name, _)| name.clone()).collect(),
            workspace_changeset: Self::workspace_changes(head_commit.files(), stage, &workspace),
            untracked_files: Self::untracked_files(head_commit.files(), stage, &workspace),
        })
    }

    fn workspace_changes(
        head_files: &FileTable,
        stage: &Stage,
        workspace: &FileTable,
    ) -> BTreeMap<String, WorkspaceChangeType> {
        let mut changes = BTreeMap::new();

        for (name, head_oid) in head_files {
            if stage.is_staged_for_addition(name) || stage.is_staged_for_removal(name) {
                continue;
            }

            match workspace.get(name) {
                None => {
                    changes.insert(name.clone(), WorkspaceChangeType::Deleted);
                }
                Some(working_oid) if working_oid != head_oid => {
                    changes.insert(name.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        for (name, staged_oid) in stage.additions() {
            match workspace.get(name) {
                None => {
                    changes.insert(name.clone(), WorkspaceChangeType::Deleted);
                }
                Some(working_oid) if working_oid != staged_oid => {
                    changes.insert(name.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        changes
    }

    fn untracked_files(
        head_files: &FileTable,
        stage: &Stage,
        workspace: &FileTable,
    ) -> BTreeSet<String> {
        workspace
            .keys()
            .filter(|name| {
                let tracked = head_files.contains_key(*name) && !stage.is_staged_for_removal(name);
                !tracked && !stage.is_staged_for_addition(name)
            })
            .cloned()
            .collect()
    }
}
